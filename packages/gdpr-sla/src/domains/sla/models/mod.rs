pub mod acceptance;
pub mod custom_field;
pub mod prompt_flag;

pub use acceptance::{AcceptanceEvent, NewAcceptance};
pub use custom_field::CustomField;
pub use prompt_flag::{PromptAction, PromptFlag};
