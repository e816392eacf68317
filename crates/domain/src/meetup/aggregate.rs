//! Meetup aggregate implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Clock, UserId};

use crate::aggregate::{Aggregate, AggregateRoot, Envelope, Stream};
use crate::error::DomainError;
use crate::sequence::SequenceNumber;

use super::{
    CancellationReason, MeetupError, MeetupEvent, MeetupId, MeetupName, MeetupStatus,
    events::MeetupCreatedData,
};

/// A meetup event as stamped by the kernel.
pub type MeetupEnvelope = Envelope<MeetupState>;

/// A validated meetup history.
pub type MeetupStream = Stream<MeetupState>;

/// State of a meetup, derived from its events.
///
/// `invited` and `attending` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetupState {
    /// When the meetup takes place.
    date: DateTime<Utc>,

    /// Current name.
    name: Option<MeetupName>,

    /// Who created the meetup.
    created_by: Option<UserId>,

    /// Who currently organises it.
    organiser: Option<UserId>,

    /// Invited users who are not attending.
    invited: BTreeSet<UserId>,

    /// Users attending.
    attending: BTreeSet<UserId>,

    /// Lifecycle status.
    status: MeetupStatus,
}

impl Aggregate for MeetupState {
    type Id = MeetupId;
    type Event = MeetupEvent;

    fn aggregate_type() -> &'static str {
        "Meetup"
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MeetupEvent::MeetupCreated(data) => self.apply_meetup_created(data),
            MeetupEvent::MeetupRescheduled(data) => self.date = data.date,
            MeetupEvent::MeetupRenamed(data) => self.name = Some(data.name.clone()),
            MeetupEvent::OrganiserChanged(data) => self.organiser = Some(data.user),
            MeetupEvent::UserInvited(data) => {
                self.invited.insert(data.user);
            }
            MeetupEvent::UserRemoved(data) => {
                self.invited.remove(&data.user);
                self.attending.remove(&data.user);
            }
            MeetupEvent::UserAccepted(data) => {
                self.invited.remove(&data.user);
                self.attending.insert(data.user);
            }
            MeetupEvent::UserRejected(data) => {
                self.attending.remove(&data.user);
                self.invited.insert(data.user);
            }
            MeetupEvent::MeetupCancelled(data) => {
                self.status = MeetupStatus::Cancelled(data.reason.clone());
            }
        }
    }

    fn is_terminal(&self) -> bool {
        self.status.is_cancelled()
    }
}

impl MeetupState {
    fn apply_meetup_created(&mut self, data: &MeetupCreatedData) {
        self.date = data.date;
        self.name = Some(data.name.clone());
        self.created_by = Some(data.created_by);
        self.organiser = Some(data.created_by);
        self.invited.extend(data.invited.iter().copied());
        self.invited.remove(&data.created_by);
        self.attending.insert(data.created_by);
    }

    /// Returns the scheduled date.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the current name.
    pub fn name(&self) -> Option<&MeetupName> {
        self.name.as_ref()
    }

    /// Returns the creator.
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Returns the current organiser.
    pub fn organiser(&self) -> Option<UserId> {
        self.organiser
    }

    /// Returns invited users who are not attending.
    pub fn invited(&self) -> &BTreeSet<UserId> {
        &self.invited
    }

    /// Returns attending users.
    pub fn attending(&self) -> &BTreeSet<UserId> {
        &self.attending
    }

    /// Returns the current status.
    pub fn status(&self) -> &MeetupStatus {
        &self.status
    }
}

/// Meetup aggregate root.
///
/// A scheduled gathering with an invitation and attendance workflow. Each
/// command raises at most one event; commands that would not change
/// anything raise nothing and succeed.
#[derive(Debug)]
pub struct Meetup {
    root: AggregateRoot<MeetupState>,
}

// Construction
impl Meetup {
    /// Creates a new meetup with a generated ID.
    ///
    /// The creator becomes organiser and attends; `invited` become invited.
    pub fn create(
        date: DateTime<Utc>,
        name: MeetupName,
        created_by: UserId,
        invited: impl IntoIterator<Item = UserId>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        Self::create_with_id(MeetupId::new(), date, name, created_by, invited, clock)
    }

    /// Creates a new meetup with the given ID.
    #[tracing::instrument(skip(invited, clock))]
    pub fn create_with_id(
        id: MeetupId,
        date: DateTime<Utc>,
        name: MeetupName,
        created_by: UserId,
        invited: impl IntoIterator<Item = UserId>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        if date <= clock.now() {
            return Err(MeetupError::DateNotInFuture { date }.into());
        }

        let mut invited: BTreeSet<UserId> = invited.into_iter().collect();
        invited.remove(&created_by);

        let mut root = AggregateRoot::new(id, clock);
        root.raise(MeetupEvent::meetup_created(date, name, created_by, invited))?;

        Ok(Self { root })
    }

    /// Rebuilds a meetup from its history.
    pub fn from_stream(stream: &MeetupStream, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: AggregateRoot::from_stream(stream, clock),
        }
    }
}

// Command methods
impl Meetup {
    /// Moves the meetup to another date, which must be in the future.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn reschedule(&mut self, date: DateTime<Utc>) -> Result<(), DomainError> {
        if date <= self.root.now() {
            return Err(MeetupError::DateNotInFuture { date }.into());
        }

        self.root.raise(MeetupEvent::meetup_rescheduled(date))
    }

    /// Renames the meetup.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn rename(&mut self, name: MeetupName) -> Result<(), DomainError> {
        if self.name() == Some(&name) {
            return self.unchanged("rename");
        }

        self.root.raise(MeetupEvent::meetup_renamed(name))
    }

    /// Hands the organiser role to `user`.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn change_organiser(&mut self, user: UserId) -> Result<(), DomainError> {
        if self.organiser() == Some(user) {
            return self.unchanged("change organiser");
        }

        self.root.raise(MeetupEvent::organiser_changed(user))
    }

    /// Invites `user`. Already invited or attending users are left alone.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn invite_user(&mut self, user: UserId) -> Result<(), DomainError> {
        if self.attending().contains(&user) || self.invited().contains(&user) {
            return self.unchanged("invite user");
        }

        self.root.raise(MeetupEvent::user_invited(user))
    }

    /// Removes `user` from both invited and attending.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn remove_user(&mut self, user: UserId) -> Result<(), DomainError> {
        if !self.invited().contains(&user) && !self.attending().contains(&user) {
            return self.unchanged("remove user");
        }

        self.root.raise(MeetupEvent::user_removed(user))
    }

    /// Moves an invited `user` to attending.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn accept(&mut self, user: UserId) -> Result<(), DomainError> {
        if self.attending().contains(&user) {
            return self.unchanged("accept");
        }
        if !self.invited().contains(&user) {
            return Err(MeetupError::UserNotInvited { user }.into());
        }

        self.root.raise(MeetupEvent::user_accepted(user))
    }

    /// Moves an attending `user` back to invited. The organiser cannot reject.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn reject(&mut self, user: UserId) -> Result<(), DomainError> {
        if self.organiser() == Some(user) {
            return Err(MeetupError::OrganiserMustAttend { user }.into());
        }
        if !self.attending().contains(&user) {
            return self.unchanged("reject");
        }

        self.root.raise(MeetupEvent::user_rejected(user))
    }

    /// Cancels the meetup, which must not have occurred yet.
    #[tracing::instrument(skip(self), fields(meetup_id = %self.id()))]
    pub fn cancel(&mut self, reason: CancellationReason) -> Result<(), DomainError> {
        if self.has_occurred() {
            return Err(MeetupError::AlreadyOccurred.into());
        }
        if self.is_cancelled() {
            return self.unchanged("cancel");
        }

        self.root.raise(MeetupEvent::meetup_cancelled(reason))
    }

    fn unchanged(&self, command: &'static str) -> Result<(), DomainError> {
        tracing::trace!(command, meetup_id = %self.id(), "nothing to change, no event raised");
        Ok(())
    }
}

// Query methods
impl Meetup {
    /// Returns the meetup ID.
    pub fn id(&self) -> MeetupId {
        self.root.id()
    }

    /// Returns the current version.
    pub fn version(&self) -> SequenceNumber {
        self.root.version()
    }

    /// Returns the derived state.
    pub fn state(&self) -> &MeetupState {
        self.root.state()
    }

    /// Returns the scheduled date.
    pub fn date(&self) -> DateTime<Utc> {
        self.state().date()
    }

    /// Returns the current name.
    pub fn name(&self) -> Option<&MeetupName> {
        self.state().name()
    }

    /// Returns the creator.
    pub fn created_by(&self) -> Option<UserId> {
        self.state().created_by()
    }

    /// Returns the current organiser.
    pub fn organiser(&self) -> Option<UserId> {
        self.state().organiser()
    }

    /// Returns invited users who are not attending.
    pub fn invited(&self) -> &BTreeSet<UserId> {
        self.state().invited()
    }

    /// Returns attending users.
    pub fn attending(&self) -> &BTreeSet<UserId> {
        self.state().attending()
    }

    /// Returns the current status.
    pub fn status(&self) -> &MeetupStatus {
        self.state().status()
    }

    /// Returns true once the scheduled date is in the past.
    pub fn has_occurred(&self) -> bool {
        self.date() < self.root.now()
    }

    /// Returns true if the meetup was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.root.is_terminal()
    }

    /// Returns events raised since the last reset, in raise order.
    pub fn changes(&self) -> &[MeetupEnvelope] {
        self.root.changes()
    }

    /// Clears pending changes after they were persisted.
    pub fn reset_changes(&mut self) {
        self.root.reset_changes();
    }

    /// Drains pending changes.
    pub fn take_changes(&mut self) -> Vec<MeetupEnvelope> {
        self.root.take_changes()
    }
}
