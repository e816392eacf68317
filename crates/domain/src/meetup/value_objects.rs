//! Value objects for the meetup domain.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::IdentifierError;

use super::MeetupError;

/// Unique identifier for a meetup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Uuid", into = "Uuid")]
pub struct MeetupId(Uuid);

impl MeetupId {
    /// Creates a new random meetup ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a meetup ID from an existing UUID.
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

impl Default for MeetupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MeetupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Uuid> for MeetupId {
    type Error = IdentifierError;

    fn try_from(uuid: Uuid) -> Result<Self, Self::Error> {
        Self::try_from_uuid(uuid)
    }
}

impl From<MeetupId> for Uuid {
    fn from(id: MeetupId) -> Self {
        id.0
    }
}

/// Display name of a meetup, 2 to 25 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MeetupName(String);

impl MeetupName {
    /// Shortest accepted name, in characters.
    pub const MIN_LENGTH: usize = 2;

    /// Longest accepted name, in characters.
    pub const MAX_LENGTH: usize = 25;

    /// Creates a name, checking its length.
    pub fn new(name: impl Into<String>) -> Result<Self, MeetupError> {
        let name = name.into();
        let length = name.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(MeetupError::NameTooShort {
                length,
                min: Self::MIN_LENGTH,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(MeetupError::NameTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeetupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MeetupName {
    type Error = MeetupError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<&str> for MeetupName {
    type Error = MeetupError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<MeetupName> for String {
    fn from(name: MeetupName) -> Self {
        name.0
    }
}

impl AsRef<str> for MeetupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a meetup was cancelled, 10 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CancellationReason(String);

impl CancellationReason {
    /// Shortest accepted reason, in characters.
    pub const MIN_LENGTH: usize = 10;

    /// Longest accepted reason, in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Creates a reason, checking its length.
    pub fn new(reason: impl Into<String>) -> Result<Self, MeetupError> {
        let reason = reason.into();
        let length = reason.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(MeetupError::ReasonTooShort {
                length,
                min: Self::MIN_LENGTH,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(MeetupError::ReasonTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(reason))
    }

    /// Returns the reason as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CancellationReason {
    type Error = MeetupError;

    fn try_from(reason: String) -> Result<Self, Self::Error> {
        Self::new(reason)
    }
}

impl TryFrom<&str> for CancellationReason {
    type Error = MeetupError;

    fn try_from(reason: &str) -> Result<Self, Self::Error> {
        Self::new(reason)
    }
}

impl From<CancellationReason> for String {
    fn from(reason: CancellationReason) -> Self {
        reason.0
    }
}
