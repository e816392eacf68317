//! Domain error types.

use common::IdentifierError;
use thiserror::Error;

use crate::meetup::MeetupError;
use crate::stream::StreamError;

/// Errors that can occur during domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A sequence number was built from a negative value.
    #[error("Invalid sequence number: {0} (must be greater than or equal to 0)")]
    InvalidSequenceNumber(i64),

    /// An event history failed validation.
    #[error("Invalid event stream: {0}")]
    Stream(#[from] StreamError),

    /// A meetup rule was violated.
    #[error("Meetup error: {0}")]
    Meetup(#[from] MeetupError),

    /// An identifier could not be built.
    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// The aggregate refused to raise an event.
    #[error("Invalid operation on {aggregate_type} {aggregate_id}: {reason}")]
    InvalidOperation {
        aggregate_type: &'static str,
        aggregate_id: String,
        reason: &'static str,
    },
}

impl DomainError {
    /// Returns true for failed preconditions on input or history,
    /// false for operations refused by the aggregate lifecycle.
    ///
    /// Raising on a terminal aggregate is a lifecycle refusal, so it is
    /// not a validation error.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DomainError::InvalidOperation { .. })
    }
}
