mod prompt;

pub use prompt::PromptStateMachine;
