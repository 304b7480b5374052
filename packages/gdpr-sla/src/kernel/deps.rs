//! SLA dependencies for actions (using traits for testability)
//!
//! `SlaDeps` is built once at startup and passed by reference into every
//! action. External collaborators sit behind the `Base*` traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::common::{Clock, ContactId, SystemClock};
use crate::config::SlaSettings;
use crate::domains::sla::models::{AcceptanceEvent, CustomField, NewAcceptance};
use crate::domains::sla::ACTIVITY_TYPE_NAME;
use crate::kernel::{BaseAcceptanceStore, BaseCustomFieldResolver, BaseSettingsProvider};

// =============================================================================
// Postgres adapters
// =============================================================================

/// Acceptance store backed by the `sla_acceptances` table
#[derive(Clone)]
pub struct PgAcceptanceStore {
    pool: PgPool,
}

impl PgAcceptanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAcceptanceStore for PgAcceptanceStore {
    async fn find_latest_acceptance(
        &self,
        contact_id: ContactId,
    ) -> Result<Option<AcceptanceEvent>> {
        AcceptanceEvent::find_latest_for_contact(contact_id, ACTIVITY_TYPE_NAME, &self.pool).await
    }

    async fn create_acceptance(&self, acceptance: NewAcceptance) -> Result<AcceptanceEvent> {
        acceptance.insert(&self.pool).await
    }
}

/// Custom-field resolver backed by the `custom_fields` tables
#[derive(Clone)]
pub struct PgCustomFieldResolver {
    pool: PgPool,
}

impl PgCustomFieldResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCustomFieldResolver for PgCustomFieldResolver {
    async fn resolve_field(
        &self,
        field_name: &str,
        group_name: &str,
    ) -> Result<Option<CustomField>> {
        CustomField::find_by_name(field_name, group_name, &self.pool).await
    }
}

/// Apply the SLA schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run SLA migrations")
}

// =============================================================================
// SlaDeps
// =============================================================================

/// Dependencies accessible to SLA actions
#[derive(Clone)]
pub struct SlaDeps {
    /// Loaded once per process, read-only afterwards
    pub settings: Arc<SlaSettings>,
    pub acceptance_store: Arc<dyn BaseAcceptanceStore>,
    pub field_resolver: Arc<dyn BaseCustomFieldResolver>,
    pub clock: Arc<dyn Clock>,
}

impl SlaDeps {
    pub fn new(
        settings: Arc<SlaSettings>,
        acceptance_store: Arc<dyn BaseAcceptanceStore>,
        field_resolver: Arc<dyn BaseCustomFieldResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            acceptance_store,
            field_resolver,
            clock,
        }
    }

    /// Load settings from the provider and wire the Postgres adapters
    pub async fn from_pool(pool: PgPool, settings_provider: &dyn BaseSettingsProvider) -> Result<Self> {
        let settings = SlaSettings::load(settings_provider).await?;
        Ok(Self::new(
            Arc::new(settings),
            Arc::new(PgAcceptanceStore::new(pool.clone())),
            Arc::new(PgCustomFieldResolver::new(pool)),
            Arc::new(SystemClock),
        ))
    }
}
