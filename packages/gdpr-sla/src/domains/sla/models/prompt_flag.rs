use serde::{Deserialize, Serialize};

/// Whether the acceptance form should render for the current session
///
/// Stored in the session as `"1"` (ShouldShow), `"-1"` (Suppressed) or not at
/// all (Unset). Only session expiry returns a flag to `Unset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptFlag {
    #[default]
    Unset,
    ShouldShow,
    Suppressed,
}

/// The two transitions the prompt flag supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Flag,
    Unflag,
}

impl PromptFlag {
    /// Pure transition. Both actions are unconditional, including
    /// `Suppressed -> ShouldShow` when a new acceptance period comes due.
    pub fn apply(self, action: PromptAction) -> Self {
        match action {
            PromptAction::Flag => PromptFlag::ShouldShow,
            PromptAction::Unflag => PromptFlag::Suppressed,
        }
    }

    pub fn is_flagged(self) -> bool {
        self == PromptFlag::ShouldShow
    }

    pub fn is_unflagged(self) -> bool {
        self == PromptFlag::Suppressed
    }

    /// Session encoding; `None` means nothing is stored
    pub fn encode(self) -> Option<&'static str> {
        match self {
            PromptFlag::Unset => None,
            PromptFlag::ShouldShow => Some("1"),
            PromptFlag::Suppressed => Some("-1"),
        }
    }

    /// Decode a stored session value. Anything unrecognised reads as `Unset`.
    pub fn decode(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") => PromptFlag::ShouldShow,
            Some("-1") => PromptFlag::Suppressed,
            _ => PromptFlag::Unset,
        }
    }
}
