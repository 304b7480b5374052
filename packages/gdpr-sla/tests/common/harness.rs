//! Test harness wiring in-memory collaborators, plus a shared Postgres
//! container for store tests.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gdpr_sla::common::{Clock, ContactId, FixedClock};
use gdpr_sla::kernel::test_dependencies::{MockAcceptanceStore, MockCustomFieldResolver};
use gdpr_sla::kernel::{run_migrations, SessionHandle, SessionStore, SlaDeps};
use gdpr_sla::SlaSettings;
use sqlx::PgPool;
use std::sync::Arc;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Initialize tracing once, respecting RUST_LOG.
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory SLA setup with a clock pinned at `now`.
pub struct TestHarness {
    pub store: Arc<MockAcceptanceStore>,
    pub sessions: SessionStore,
    pub deps: SlaDeps,
    pub now: DateTime<Utc>,
}

impl TestHarness {
    pub fn new(settings: SlaSettings, store: MockAcceptanceStore, now: DateTime<Utc>) -> Self {
        init_tracing();

        let store = Arc::new(store);
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));
        let deps = SlaDeps::new(
            Arc::new(settings),
            store.clone(),
            Arc::new(MockCustomFieldResolver::with_terms_field(1)),
            clock.clone(),
        );

        Self {
            store,
            sessions: SessionStore::with_clock(clock),
            deps,
            now,
        }
    }

    /// Start a new browsing session
    pub async fn visit(&self, contact_id: Option<ContactId>) -> SessionHandle {
        let id = self.sessions.create_session(contact_id).await;
        self.sessions.session(id)
    }
}

/// Postgres container shared by every store test in the run.
struct SharedPostgres {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        run_migrations(&pool).await?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }
}

/// Fresh pool against the shared, migrated test database.
pub async fn test_pool() -> Result<PgPool> {
    let infra = SHARED_POSTGRES
        .get_or_try_init(SharedPostgres::init)
        .await?;

    PgPool::connect(&infra.db_url)
        .await
        .context("Failed to connect to test database")
}
