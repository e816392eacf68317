//! Shared types for the event-sourced aggregate kernel.
//!
//! Identities that cross aggregate boundaries and the clock capability
//! every aggregate receives at construction.

pub mod clock;
mod types;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use types::{IdentifierError, UserId};
