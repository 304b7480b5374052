// TestDependencies - in-memory implementations for testing
//
// Provides mock collaborators that can be injected into SlaDeps for tests
// and for hosts that want to embed the crate without a database.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    BaseAcceptanceStore, BaseCustomFieldResolver, BaseSession, BaseSettingsProvider, SlaDeps,
};
use crate::common::{AcceptanceId, Clock, ContactId, FixedClock};
use crate::config::{RawSlaSettings, SlaSettings};
use crate::domains::sla::models::{AcceptanceEvent, CustomField, NewAcceptance};
use crate::domains::sla::{CUSTOM_GROUP_NAME, TERMS_CONDITIONS_FIELD_NAME};

// =============================================================================
// Mock Acceptance Store
// =============================================================================

pub struct MockAcceptanceStore {
    // Insertion order is preserved; later entries are newer.
    events: Arc<Mutex<Vec<AcceptanceEvent>>>,
    created: Arc<Mutex<Vec<NewAcceptance>>>,
    lookups: Arc<Mutex<Vec<ContactId>>>,
    fail_with: Option<String>,
}

impl MockAcceptanceStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    /// Store that fails every call, simulating an unreachable backend
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Seed an existing acceptance
    pub fn with_acceptance(self, contact_id: ContactId, accepted_at: DateTime<Utc>) -> Self {
        self.events.lock().unwrap().push(AcceptanceEvent {
            id: AcceptanceId::new(),
            contact_id,
            accepted_at,
            document_url: Some("/terms.pdf".to_string()),
        });
        self
    }

    /// Acceptances written through `create_acceptance`
    pub fn created(&self) -> Vec<NewAcceptance> {
        self.created.lock().unwrap().clone()
    }

    /// Contacts looked up through `find_latest_acceptance`
    pub fn lookups(&self) -> Vec<ContactId> {
        self.lookups.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

impl Default for MockAcceptanceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAcceptanceStore for MockAcceptanceStore {
    async fn find_latest_acceptance(
        &self,
        contact_id: ContactId,
    ) -> Result<Option<AcceptanceEvent>> {
        self.lookups.lock().unwrap().push(contact_id);
        self.check_available()?;

        let events = self.events.lock().unwrap();
        // Newest insertion first; only a strictly later timestamp displaces it.
        Ok(events
            .iter()
            .rev()
            .filter(|e| e.contact_id == contact_id)
            .fold(None::<&AcceptanceEvent>, |best, e| match best {
                Some(b) if b.accepted_at >= e.accepted_at => Some(b),
                _ => Some(e),
            })
            .cloned())
    }

    async fn create_acceptance(&self, acceptance: NewAcceptance) -> Result<AcceptanceEvent> {
        self.check_available()?;

        let event = AcceptanceEvent {
            id: AcceptanceId::new(),
            contact_id: acceptance.contact_id,
            accepted_at: acceptance.accepted_at,
            document_url: acceptance.document_url.clone(),
        };
        self.events.lock().unwrap().push(event.clone());
        self.created.lock().unwrap().push(acceptance);
        Ok(event)
    }
}

// =============================================================================
// Mock Custom-Field Resolver
// =============================================================================

pub struct MockCustomFieldResolver {
    fields: Vec<CustomField>,
    fail_with: Option<String>,
}

impl MockCustomFieldResolver {
    /// Resolver that knows no fields
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            fail_with: None,
        }
    }

    /// Resolver whose lookups always fail
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::empty()
        }
    }

    /// Resolver that knows the Terms & Conditions field under the given id
    pub fn with_terms_field(id: i64) -> Self {
        Self {
            fields: vec![CustomField {
                id,
                name: TERMS_CONDITIONS_FIELD_NAME.to_string(),
                group_name: CUSTOM_GROUP_NAME.to_string(),
                label: Some("Terms & Conditions".to_string()),
            }],
            fail_with: None,
        }
    }
}

#[async_trait]
impl BaseCustomFieldResolver for MockCustomFieldResolver {
    async fn resolve_field(
        &self,
        field_name: &str,
        group_name: &str,
    ) -> Result<Option<CustomField>> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!("{}", message));
        }
        Ok(self
            .fields
            .iter()
            .find(|f| f.name == field_name && f.group_name == group_name)
            .cloned())
    }
}

// =============================================================================
// Static Settings Provider
// =============================================================================

/// Settings provider returning a fixed record and counting reads
pub struct StaticSettingsProvider {
    raw: RawSlaSettings,
    reads: Mutex<usize>,
}

impl StaticSettingsProvider {
    pub fn new(raw: RawSlaSettings) -> Self {
        Self {
            raw,
            reads: Mutex::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl BaseSettingsProvider for StaticSettingsProvider {
    async fn get_settings(&self) -> Result<RawSlaSettings> {
        *self.reads.lock().unwrap() += 1;
        Ok(self.raw.clone())
    }
}

// =============================================================================
// Mock Session
// =============================================================================

/// Session held in memory that can be told to refuse one value
pub struct MockSession {
    contact_id: Option<ContactId>,
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<String>>,
    reject_value: Option<String>,
}

impl MockSession {
    pub fn new(contact_id: Option<ContactId>) -> Self {
        Self {
            contact_id,
            values: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            reject_value: None,
        }
    }

    /// Fail every write of `value`, leaving the stored value as it was
    pub fn rejecting_writes_of(self, value: &str) -> Self {
        Self {
            reject_value: Some(value.to_string()),
            ..self
        }
    }

    /// Values successfully written, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseSession for MockSession {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_value.as_deref() == Some(value) {
            return Err(anyhow!("session write failed"));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes.lock().unwrap().push(value.to_string());
        Ok(())
    }

    async fn logged_in_contact_id(&self) -> Result<Option<ContactId>> {
        Ok(self.contact_id)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Settings with prompting enabled and a document configured
pub fn prompting_settings(period_months: f64) -> SlaSettings {
    SlaSettings {
        prompt_enabled: true,
        document_url: Some("/sites/default/files/terms.pdf".to_string()),
        period_months,
        site_base_url: Some("https://crm.example.org/".to_string()),
        ..SlaSettings::default()
    }
}

/// SlaDeps wired with in-memory collaborators and a fixed clock
pub fn test_deps(
    settings: SlaSettings,
    store: Arc<MockAcceptanceStore>,
    now: DateTime<Utc>,
) -> SlaDeps {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));
    SlaDeps::new(
        Arc::new(settings),
        store,
        Arc::new(MockCustomFieldResolver::with_terms_field(7)),
        clock,
    )
}
