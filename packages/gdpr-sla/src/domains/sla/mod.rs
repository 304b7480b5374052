//! SLA domain - Terms & Conditions acceptance and the per-session prompt
//!
//! Architecture:
//!   host request → actions::handle_request → due check (actions::due)
//!                → PromptStateMachine (session) → render layer (external)
//!   form submit  → actions::record_acceptance → acceptance store

pub mod actions;
pub mod errors;
pub mod machines;
pub mod models;

// Re-export commonly used types
pub use errors::SlaError;
pub use machines::PromptStateMachine;
pub use models::{AcceptanceEvent, CustomField, NewAcceptance, PromptFlag};

/// Session key holding the encoded prompt flag
pub const PROMPT_FLAG_SESSION_KEY: &str = "Gdpr_SLA_do_prompt";

/// Activity type every acceptance is recorded as
pub const ACTIVITY_TYPE_NAME: &str = "SLA Acceptance";

/// Custom group holding the accepted document field
pub const CUSTOM_GROUP_NAME: &str = "SLA_Acceptance";

/// Custom field storing the URL of the accepted document
pub const TERMS_CONDITIONS_FIELD_NAME: &str = "Terms_Conditions";

/// Path of the acceptance form in the host
pub const ACCEPTANCE_FORM_PATH: &str = "/civicrm/sla/accept";
