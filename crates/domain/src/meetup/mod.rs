//! Meetup aggregate and related types.

mod aggregate;
mod events;
mod state;
mod value_objects;

pub use aggregate::{Meetup, MeetupEnvelope, MeetupState, MeetupStream};
pub use events::{
    MeetupCancelledData, MeetupCreatedData, MeetupEvent, MeetupRenamedData,
    MeetupRescheduledData, MemberData,
};
pub use state::MeetupStatus;
pub use value_objects::{CancellationReason, MeetupId, MeetupName};

use chrono::{DateTime, Utc};
use common::UserId;
use thiserror::Error;

/// Errors that can occur during meetup operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeetupError {
    /// The requested date is not after the current time.
    #[error("Meetup date must be in the future: {date}")]
    DateNotInFuture { date: DateTime<Utc> },

    /// Name has fewer characters than allowed.
    #[error("Name is too short: {length} characters (minimum {min})")]
    NameTooShort { length: usize, min: usize },

    /// Name has more characters than allowed.
    #[error("Name is too long: {length} characters (maximum {max})")]
    NameTooLong { length: usize, max: usize },

    /// Cancellation reason has fewer characters than allowed.
    #[error("Reason is too short: {length} characters (minimum {min})")]
    ReasonTooShort { length: usize, min: usize },

    /// Cancellation reason has more characters than allowed.
    #[error("Reason is too long: {length} characters (maximum {max})")]
    ReasonTooLong { length: usize, max: usize },

    /// Only invited users can accept.
    #[error("User {user} is not invited")]
    UserNotInvited { user: UserId },

    /// The organiser cannot stop attending.
    #[error("The organiser must be attending: {user} cannot reject")]
    OrganiserMustAttend { user: UserId },

    /// The meetup date has passed.
    #[error("Meetup has already occurred")]
    AlreadyOccurred,
}
