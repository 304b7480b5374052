//! Typed ids for the entities this crate tracks.

pub use super::id::Id;

/// Marker for CRM contacts (the person accepting the terms).
pub struct Contact;

/// Marker for recorded acceptance events.
pub struct Acceptance;

/// Marker for host sessions.
pub struct Session;

pub type ContactId = Id<Contact>;

pub type AcceptanceId = Id<Acceptance>;

pub type SessionId = Id<Session>;
