//! Acceptance query actions
//!
//! Query actions read the store and never touch the prompt flag.

use tracing::{debug, error, info};

use crate::common::ContactId;
use crate::domains::sla::actions::due::is_due;
use crate::domains::sla::models::AcceptanceEvent;
use crate::domains::sla::SlaError;
use crate::kernel::{BaseSession, SlaDeps};

/// Use the explicit contact, or fall back to the session's logged-in contact
pub async fn resolve_contact(
    contact_id: Option<ContactId>,
    session: &dyn BaseSession,
) -> Result<Option<ContactId>, SlaError> {
    match contact_id {
        Some(id) => Ok(Some(id)),
        None => session
            .logged_in_contact_id()
            .await
            .map_err(SlaError::Session),
    }
}

/// Latest acceptance recorded for a contact
///
/// `Ok(None)` only when the store has no record; store failures are `Err`.
pub async fn get_contact_last_acceptance(
    contact_id: ContactId,
    deps: &SlaDeps,
) -> Result<Option<AcceptanceEvent>, SlaError> {
    deps.acceptance_store
        .find_latest_acceptance(contact_id)
        .await
        .map_err(|e| {
            error!(%contact_id, "Failed to load last acceptance: {}", e);
            SlaError::Store(e)
        })
}

/// Whether a known contact is due to accept the terms again
pub async fn is_due_for_contact(contact_id: ContactId, deps: &SlaDeps) -> Result<bool, SlaError> {
    let last_acceptance = get_contact_last_acceptance(contact_id, deps).await?;
    let now = deps.clock.now();
    let due = is_due(last_acceptance.as_ref(), deps.settings.period_months, now)?;

    debug!(
        %contact_id,
        last_accepted_at = ?last_acceptance.as_ref().map(|e| e.accepted_at),
        due,
        "Evaluated acceptance due-ness"
    );
    Ok(due)
}

/// Whether the contact (or the session's logged-in contact) is due
///
/// Returns `Ok(None)` when there is no identity to evaluate, which is
/// distinct from `Ok(Some(false))`.
pub async fn is_contact_due_acceptance(
    contact_id: Option<ContactId>,
    session: &dyn BaseSession,
    deps: &SlaDeps,
) -> Result<Option<bool>, SlaError> {
    let Some(contact_id) = resolve_contact(contact_id, session).await? else {
        debug!("No contact on session; skipping due check");
        return Ok(None);
    };

    info!(%contact_id, "Checking whether contact is due SLA acceptance");
    is_due_for_contact(contact_id, deps).await.map(Some)
}
