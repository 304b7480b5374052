use anyhow::Result;
use tracing::{debug, warn};

use crate::domains::sla::models::{PromptAction, PromptFlag};
use crate::domains::sla::PROMPT_FLAG_SESSION_KEY;
use crate::kernel::BaseSession;

/// Prompt flag state machine over one session's storage slot
///
/// Transitions are decided by `PromptFlag::apply`; this type only reads and
/// writes the encoded value. It never re-derives due-ness itself.
pub struct PromptStateMachine<'a> {
    session: &'a dyn BaseSession,
}

impl<'a> PromptStateMachine<'a> {
    pub fn new(session: &'a dyn BaseSession) -> Self {
        Self { session }
    }

    /// Current flag for the session
    pub async fn state(&self) -> Result<PromptFlag> {
        let stored = self.session.get(PROMPT_FLAG_SESSION_KEY).await?;
        let flag = PromptFlag::decode(stored.as_deref());
        if flag == PromptFlag::Unset {
            if let Some(value) = stored {
                warn!(value = %value, "Ignoring unrecognised prompt flag value");
            }
        }
        Ok(flag)
    }

    /// Show the acceptance form on the next request
    pub async fn flag_show_form(&self) -> Result<PromptFlag> {
        self.transition(PromptAction::Flag).await
    }

    /// Stop showing the acceptance form for this session
    pub async fn unflag_show_form(&self) -> Result<PromptFlag> {
        self.transition(PromptAction::Unflag).await
    }

    pub async fn show_form_is_flagged(&self) -> Result<bool> {
        Ok(self.state().await?.is_flagged())
    }

    pub async fn show_form_is_unflagged(&self) -> Result<bool> {
        Ok(self.state().await?.is_unflagged())
    }

    async fn transition(&self, action: PromptAction) -> Result<PromptFlag> {
        let previous = self.state().await?;
        let next = previous.apply(action);
        if next == previous {
            return Ok(next);
        }
        if let Some(encoded) = next.encode() {
            self.session.set(PROMPT_FLAG_SESSION_KEY, encoded).await?;
        }
        debug!(?action, from = ?previous, to = ?next, "Prompt flag updated");
        Ok(next)
    }
}
