//! Meetup domain events.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

use super::{CancellationReason, MeetupName};

/// Events that can occur on a meetup aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MeetupEvent {
    /// Meetup was created (initial event).
    MeetupCreated(MeetupCreatedData),

    /// Meetup was moved to another date.
    MeetupRescheduled(MeetupRescheduledData),

    /// Meetup was renamed.
    MeetupRenamed(MeetupRenamedData),

    /// Another user became the organiser.
    OrganiserChanged(MemberData),

    /// User was invited.
    UserInvited(MemberData),

    /// User was removed from both invited and attending.
    UserRemoved(MemberData),

    /// Invited user accepted and is now attending.
    UserAccepted(MemberData),

    /// Attending user rejected and is back to invited.
    UserRejected(MemberData),

    /// Meetup was cancelled (terminal).
    MeetupCancelled(MeetupCancelledData),
}

impl DomainEvent for MeetupEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MeetupEvent::MeetupCreated(_) => "MeetupCreated",
            MeetupEvent::MeetupRescheduled(_) => "MeetupRescheduled",
            MeetupEvent::MeetupRenamed(_) => "MeetupRenamed",
            MeetupEvent::OrganiserChanged(_) => "OrganiserChanged",
            MeetupEvent::UserInvited(_) => "UserInvited",
            MeetupEvent::UserRemoved(_) => "UserRemoved",
            MeetupEvent::UserAccepted(_) => "UserAccepted",
            MeetupEvent::UserRejected(_) => "UserRejected",
            MeetupEvent::MeetupCancelled(_) => "MeetupCancelled",
        }
    }

    fn is_initial(&self) -> bool {
        matches!(self, MeetupEvent::MeetupCreated(_))
    }
}

/// Data for MeetupCreated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupCreatedData {
    /// When the meetup takes place.
    pub date: DateTime<Utc>,

    /// Meetup name.
    pub name: MeetupName,

    /// The creator, who also becomes organiser and attends.
    pub created_by: UserId,

    /// Users invited at creation.
    pub invited: BTreeSet<UserId>,
}

/// Data for MeetupRescheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupRescheduledData {
    /// The new date.
    pub date: DateTime<Utc>,
}

/// Data for MeetupRenamed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupRenamedData {
    /// The new name.
    pub name: MeetupName,
}

/// Data for events about a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberData {
    /// The user concerned.
    pub user: UserId,
}

/// Data for MeetupCancelled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupCancelledData {
    /// Reason for cancellation.
    pub reason: CancellationReason,
}

// Convenience constructors for events
impl MeetupEvent {
    /// Creates a MeetupCreated event.
    pub fn meetup_created(
        date: DateTime<Utc>,
        name: MeetupName,
        created_by: UserId,
        invited: BTreeSet<UserId>,
    ) -> Self {
        MeetupEvent::MeetupCreated(MeetupCreatedData {
            date,
            name,
            created_by,
            invited,
        })
    }

    /// Creates a MeetupRescheduled event.
    pub fn meetup_rescheduled(date: DateTime<Utc>) -> Self {
        MeetupEvent::MeetupRescheduled(MeetupRescheduledData { date })
    }

    /// Creates a MeetupRenamed event.
    pub fn meetup_renamed(name: MeetupName) -> Self {
        MeetupEvent::MeetupRenamed(MeetupRenamedData { name })
    }

    /// Creates an OrganiserChanged event.
    pub fn organiser_changed(user: UserId) -> Self {
        MeetupEvent::OrganiserChanged(MemberData { user })
    }

    /// Creates a UserInvited event.
    pub fn user_invited(user: UserId) -> Self {
        MeetupEvent::UserInvited(MemberData { user })
    }

    /// Creates a UserRemoved event.
    pub fn user_removed(user: UserId) -> Self {
        MeetupEvent::UserRemoved(MemberData { user })
    }

    /// Creates a UserAccepted event.
    pub fn user_accepted(user: UserId) -> Self {
        MeetupEvent::UserAccepted(MemberData { user })
    }

    /// Creates a UserRejected event.
    pub fn user_rejected(user: UserId) -> Self {
        MeetupEvent::UserRejected(MemberData { user })
    }

    /// Creates a MeetupCancelled event.
    pub fn meetup_cancelled(reason: CancellationReason) -> Self {
        MeetupEvent::MeetupCancelled(MeetupCancelledData { reason })
    }
}
