//! Record acceptance action - writes one SLA Acceptance activity

use tracing::{debug, error, info};

use crate::common::ContactId;
use crate::domains::sla::actions::queries::resolve_contact;
use crate::domains::sla::models::{AcceptanceEvent, NewAcceptance};
use crate::domains::sla::{
    SlaError, ACTIVITY_TYPE_NAME, CUSTOM_GROUP_NAME, TERMS_CONDITIONS_FIELD_NAME,
};
use crate::kernel::{BaseSession, SlaDeps};

const ACCEPTANCE_SUBJECT: &str = "Terms and Conditions accepted";

const ACCEPTANCE_STATUS: &str = "Completed";

/// Result of a recording attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded(AcceptanceEvent),
    /// No contact to record against (anonymous visitor)
    NotRecorded,
}

impl RecordOutcome {
    pub fn event(&self) -> Option<&AcceptanceEvent> {
        match self {
            RecordOutcome::Recorded(event) => Some(event),
            RecordOutcome::NotRecorded => None,
        }
    }
}

/// Record that a contact accepted the current Terms & Conditions.
///
/// This action:
/// 1. Resolves the custom field that stores the accepted document URL
/// 2. Writes one acceptance stamped with the current time and document URL
///
/// Returns:
/// - `NotRecorded` when no contact is given (nothing is written)
/// - `SlaError::FieldNotResolved` when the document field is not configured
///
/// The prompt flag is left alone; the caller decides what to do with it.
pub async fn record_acceptance(
    contact_id: Option<ContactId>,
    deps: &SlaDeps,
) -> Result<RecordOutcome, SlaError> {
    let Some(contact_id) = contact_id else {
        debug!("No contact given; acceptance not recorded");
        return Ok(RecordOutcome::NotRecorded);
    };

    info!(%contact_id, "Recording SLA acceptance");

    let field = deps
        .field_resolver
        .resolve_field(TERMS_CONDITIONS_FIELD_NAME, CUSTOM_GROUP_NAME)
        .await
        .map_err(SlaError::Resolver)?
        .ok_or_else(|| {
            error!(
                field = TERMS_CONDITIONS_FIELD_NAME,
                group = CUSTOM_GROUP_NAME,
                "Terms & Conditions field is not configured"
            );
            SlaError::FieldNotResolved {
                field: TERMS_CONDITIONS_FIELD_NAME.to_string(),
                group: CUSTOM_GROUP_NAME.to_string(),
            }
        })?;

    let acceptance = NewAcceptance {
        contact_id,
        accepted_at: deps.clock.now(),
        document_url: deps.settings.document_url.clone(),
        document_field_key: field.key(),
        activity_type: ACTIVITY_TYPE_NAME.to_string(),
        subject: ACCEPTANCE_SUBJECT.to_string(),
        status: ACCEPTANCE_STATUS.to_string(),
    };

    let event = deps
        .acceptance_store
        .create_acceptance(acceptance)
        .await
        .map_err(|e| {
            error!(%contact_id, "Failed to record acceptance: {}", e);
            SlaError::Store(e)
        })?;

    info!(%contact_id, acceptance_id = %event.id, "SLA acceptance recorded");
    Ok(RecordOutcome::Recorded(event))
}

/// Record acceptance for the given contact, or the session's logged-in contact
pub async fn record_session_acceptance(
    contact_id: Option<ContactId>,
    session: &dyn BaseSession,
    deps: &SlaDeps,
) -> Result<RecordOutcome, SlaError> {
    let contact_id = resolve_contact(contact_id, session).await?;
    record_acceptance(contact_id, deps).await
}
