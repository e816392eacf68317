use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when building an identifier from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The nil UUID never identifies anything.
    #[error("Invalid identifier: {0} is the nil UUID")]
    Nil(Uuid),
}

/// Unique identifier for a user taking part in aggregates.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// user IDs with aggregate IDs or other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Uuid", into = "Uuid")]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user ID from an existing UUID.
    ///
    /// Fails for the nil UUID.
    pub fn try_from_uuid(uuid: Uuid) -> Result<Self, IdentifierError> {
        if uuid.is_nil() {
            return Err(IdentifierError::Nil(uuid));
        }
        Ok(Self(uuid))
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Uuid> for UserId {
    type Error = IdentifierError;

    fn try_from(uuid: Uuid) -> Result<Self, Self::Error> {
        Self::try_from_uuid(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}
