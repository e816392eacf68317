//! Aggregate and event sequence numbers.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Zero-based position of an event within its aggregate's history.
///
/// Never negative. Only the aggregate kernel advances it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct SequenceNumber(i64);

impl SequenceNumber {
    /// Returns sequence number 0.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Creates a sequence number from a raw value.
    pub fn from_int(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::InvalidSequenceNumber(value));
        }
        Ok(Self(value))
    }

    /// Advances by one and returns the new value.
    pub fn increment(&mut self) -> Self {
        self.0 += 1;
        *self
    }

    /// Returns the raw value.
    pub fn to_int(&self) -> i64 {
        self.0
    }

    /// Converts a position in an event list, saturating at `i64::MAX`.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for SequenceNumber {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_int(value)
    }
}

impl From<SequenceNumber> for i64 {
    fn from(sequence: SequenceNumber) -> Self {
        sequence.0
    }
}
