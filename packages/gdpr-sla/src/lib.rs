// GDPR SLA - Terms & Conditions acceptance tracking
//
// Decides when a contact must (re-)accept the Terms & Conditions and keeps a
// per-session prompt flag so the acceptance form shows at most once per visit.
//
// Record storage, settings and sessions are external; they are reached through
// the traits in kernel/ and injected via SlaDeps.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
