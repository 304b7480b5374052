// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The host CRM owns the records, settings and sessions behind them; the SLA
// domain functions only ever talk to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAcceptanceStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::ContactId;
use crate::config::RawSlaSettings;
use crate::domains::sla::models::{AcceptanceEvent, CustomField, NewAcceptance};

// =============================================================================
// Settings Provider
// =============================================================================

#[async_trait]
pub trait BaseSettingsProvider: Send + Sync {
    /// Fetch the raw SLA settings record
    async fn get_settings(&self) -> Result<RawSlaSettings>;
}

// =============================================================================
// Acceptance Record Store
// =============================================================================

#[async_trait]
pub trait BaseAcceptanceStore: Send + Sync {
    /// Most recent acceptance for the contact.
    ///
    /// Latest `accepted_at` wins; ties go to the most recently inserted record.
    /// `Ok(None)` means no record exists; lookup failures must be `Err`.
    async fn find_latest_acceptance(&self, contact_id: ContactId)
        -> Result<Option<AcceptanceEvent>>;

    /// Persist one acceptance atomically and return the stored event
    async fn create_acceptance(&self, acceptance: NewAcceptance) -> Result<AcceptanceEvent>;
}

// =============================================================================
// Custom-Field Resolver
// =============================================================================

#[async_trait]
pub trait BaseCustomFieldResolver: Send + Sync {
    /// Look up a custom field definition by field name and group name
    async fn resolve_field(&self, field_name: &str, group_name: &str)
        -> Result<Option<CustomField>>;
}

// =============================================================================
// Session (one visitor's session)
// =============================================================================

#[async_trait]
pub trait BaseSession: Send + Sync {
    /// Read a value from this session
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value into this session (last writer wins)
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Contact logged in on this session, if any
    async fn logged_in_contact_id(&self) -> Result<Option<ContactId>>;
}
