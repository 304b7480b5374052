//! SLA domain actions - business logic functions
//!
//! Actions are async functions taking `&SlaDeps` (and a session where one is
//! needed). The due check itself is pure and lives in `due`.

pub mod due;
mod orchestrate;
mod presentation;
mod queries;
mod record_acceptance;

pub use due::{acceptance_due_at, acceptance_period, is_due};
pub use orchestrate::{handle_request, PromptDecision, SlaRequest};
pub use presentation::{
    checkbox_text, is_prompt_for_acceptance, link_label, show_form, terms_conditions_url,
    FormPrompt,
};
pub use queries::{
    get_contact_last_acceptance, is_contact_due_acceptance, is_due_for_contact, resolve_contact,
};
pub use record_acceptance::{record_acceptance, record_session_acceptance, RecordOutcome};
