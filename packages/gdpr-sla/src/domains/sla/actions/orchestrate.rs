//! Per-request orchestration of the acceptance prompt

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::ContactId;
use crate::domains::sla::actions::presentation::{is_prompt_for_acceptance, show_form, FormPrompt};
use crate::domains::sla::actions::queries::{is_due_for_contact, resolve_contact};
use crate::domains::sla::actions::record_acceptance::{record_acceptance, RecordOutcome};
use crate::domains::sla::machines::PromptStateMachine;
use crate::domains::sla::models::PromptFlag;
use crate::domains::sla::SlaError;
use crate::kernel::{BaseSession, SlaDeps};

/// What the host knows about the current request
#[derive(Debug, Clone, Default)]
pub struct SlaRequest {
    /// Explicit contact; falls back to the session's logged-in contact
    pub contact_id: Option<ContactId>,
    /// Path of the current request
    pub path: String,
    /// The acceptance form was just submitted with the box ticked
    pub accepted: bool,
}

/// Outcome of one request, for the render layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PromptDecision {
    /// Render the acceptance form
    Show(FormPrompt),
    /// Prompt is pending but this request is the form itself
    AlreadyOnForm,
    /// Acceptance was recorded and the prompt suppressed for this session
    Recorded,
    /// Acceptance was submitted without a contact; nothing changed
    NotRecorded,
    /// The prompt was dealt with earlier in this session
    Suppressed,
    /// The contact's acceptance is still current
    NotDue,
    /// No contact to evaluate
    Anonymous,
    /// Prompting is switched off in settings
    Disabled,
}

/// Decide whether the acceptance form should render on this request.
///
/// An unset flag costs one store lookup, after which the session remembers
/// the answer. A pending prompt is re-checked on every request so a recorded
/// acceptance clears it even if the session write after recording was lost.
/// A failed due check propagates and leaves the flag untouched.
pub async fn handle_request(
    request: &SlaRequest,
    session: &dyn BaseSession,
    deps: &SlaDeps,
) -> Result<PromptDecision, SlaError> {
    let prompt = PromptStateMachine::new(session);
    let contact_id = resolve_contact(request.contact_id, session).await?;

    if request.accepted {
        return match record_acceptance(contact_id, deps).await? {
            RecordOutcome::Recorded(event) => {
                suppress(&prompt, event.contact_id).await;
                Ok(PromptDecision::Recorded)
            }
            RecordOutcome::NotRecorded => Ok(PromptDecision::NotRecorded),
        };
    }

    if !is_prompt_for_acceptance(&deps.settings) {
        return Ok(PromptDecision::Disabled);
    }

    match prompt.state().await.map_err(SlaError::Session)? {
        PromptFlag::ShouldShow => {
            if let Some(contact_id) = contact_id {
                if !is_due_for_contact(contact_id, deps).await? {
                    debug!(%contact_id, "SLA acceptance now current; clearing pending form");
                    suppress(&prompt, contact_id).await;
                    return Ok(PromptDecision::NotDue);
                }
            }
            Ok(render(&request.path))
        }
        PromptFlag::Suppressed => Ok(PromptDecision::Suppressed),
        PromptFlag::Unset => {
            let Some(contact_id) = contact_id else {
                return Ok(PromptDecision::Anonymous);
            };

            if is_due_for_contact(contact_id, deps).await? {
                info!(%contact_id, "SLA acceptance due; flagging form");
                prompt.flag_show_form().await.map_err(SlaError::Session)?;
                Ok(render(&request.path))
            } else {
                debug!(%contact_id, "SLA acceptance current; suppressing form");
                suppress(&prompt, contact_id).await;
                Ok(PromptDecision::NotDue)
            }
        }
    }
}

/// Mark the prompt as dealt with. The store already holds the answer, so a
/// failed write only costs another lookup on the next request.
async fn suppress(prompt: &PromptStateMachine<'_>, contact_id: ContactId) {
    if let Err(e) = prompt.unflag_show_form().await {
        warn!(%contact_id, "Failed to suppress SLA prompt for session: {}", e);
    }
}

fn render(path: &str) -> PromptDecision {
    match show_form(path) {
        Some(form) => PromptDecision::Show(form),
        None => PromptDecision::AlreadyOnForm,
    }
}
