// Common types and utilities shared across the crate

pub mod clock;
pub mod entity_ids;
pub mod id;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity_ids::*;
pub use id::Id;
