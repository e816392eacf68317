//! Meetup status.

use serde::{Deserialize, Serialize};

use super::CancellationReason;

/// The status of a meetup in its lifecycle.
///
/// ```text
/// Active ──┬──► Cancelled(reason)
/// Planned ─┘
/// ```
///
/// `Cancelled` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MeetupStatus {
    /// Meetup is open for invitations.
    #[default]
    Active,

    /// Meetup is planned.
    Planned,

    /// Meetup was cancelled (terminal state).
    Cancelled(CancellationReason),
}

impl MeetupStatus {
    /// Returns true if this is the terminal state.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MeetupStatus::Cancelled(_))
    }

    /// Returns the cancellation reason, if cancelled.
    pub fn reason(&self) -> Option<&CancellationReason> {
        match self {
            MeetupStatus::Cancelled(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetupStatus::Active => "Active",
            MeetupStatus::Planned => "Planned",
            MeetupStatus::Cancelled(_) => "Cancelled",
        }
    }
}

impl std::fmt::Display for MeetupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetupStatus::Cancelled(reason) => write!(f, "Cancelled: {reason}"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancelled() -> MeetupStatus {
        MeetupStatus::Cancelled(CancellationReason::new("It's raining.").unwrap())
    }

    #[test]
    fn test_default_status_is_active() {
        assert_eq!(MeetupStatus::default(), MeetupStatus::Active);
    }

    #[test]
    fn test_only_cancelled_is_terminal() {
        assert!(!MeetupStatus::Active.is_cancelled());
        assert!(!MeetupStatus::Planned.is_cancelled());
        assert!(cancelled().is_cancelled());
    }

    #[test]
    fn test_reason() {
        assert_eq!(MeetupStatus::Active.reason(), None);
        assert_eq!(cancelled().reason().unwrap().as_str(), "It's raining.");
    }

    #[test]
    fn test_display() {
        assert_eq!(MeetupStatus::Active.to_string(), "Active");
        assert_eq!(MeetupStatus::Planned.to_string(), "Planned");
        assert_eq!(cancelled().to_string(), "Cancelled: It's raining.");
    }

    #[test]
    fn test_serialization() {
        let status = cancelled();
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"Cancelled":"It's raining."}"#);

        let deserialized: MeetupStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, deserialized);
    }
}
