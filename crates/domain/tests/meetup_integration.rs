//! Integration tests for the Meetup aggregate.
//!
//! These tests drive the full lifecycle through the public API: creation,
//! commands and their no-ops, persistence of pending changes, and
//! reconstruction from a stored history.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::{Clock, FixedClock, ManualClock, UserId};
use domain::{
    CancellationReason, DomainError, DomainEvent, EventEnvelope, EventStream, Meetup,
    MeetupEnvelope, MeetupError, MeetupEvent, MeetupId, MeetupName, MeetupStatus, MeetupStream,
    SequenceNumber, StreamViolation,
};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-01T18:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

fn name(value: &str) -> MeetupName {
    MeetupName::new(value).unwrap()
}

fn reason(value: &str) -> CancellationReason {
    CancellationReason::new(value).unwrap()
}

/// Creates a meetup tomorrow with one invited guest.
fn default_meetup() -> (Meetup, UserId, UserId) {
    let organiser = UserId::new();
    let guest = UserId::new();
    let meetup = Meetup::create(
        now() + Duration::days(1),
        name("Rooftop Party"),
        organiser,
        [guest],
        clock(),
    )
    .unwrap();
    (meetup, organiser, guest)
}

/// Stands in for the persistence collaborator: stores pending changes and
/// resets them, then hands the stored history back as a stream.
#[derive(Default)]
struct InMemoryLog {
    events: Vec<MeetupEnvelope>,
}

impl InMemoryLog {
    fn persist(&mut self, meetup: &mut Meetup) {
        self.events.extend(meetup.changes().iter().cloned());
        meetup.reset_changes();
    }

    fn load(&self) -> MeetupStream {
        let mut reversed = self.events.clone();
        reversed.reverse();
        EventStream::create(reversed).unwrap()
    }
}

fn sequence_numbers(events: &[MeetupEnvelope]) -> Vec<i64> {
    events.iter().map(|e| e.sequence_number.to_int()).collect()
}

mod creation {
    use super::*;

    #[test]
    fn rooftop_party_example() {
        let u1 = UserId::new();
        let u2 = UserId::new();

        let mut meetup = Meetup::create(
            now() + Duration::days(1),
            name("Rooftop Party"),
            u1,
            [u2],
            clock(),
        )
        .unwrap();

        assert_eq!(meetup.organiser(), Some(u1));
        assert_eq!(meetup.attending(), &BTreeSet::from([u1]));
        assert_eq!(meetup.invited(), &BTreeSet::from([u2]));
        assert_eq!(meetup.status(), &MeetupStatus::Active);
        assert_eq!(meetup.changes().len(), 1);
        assert_eq!(meetup.changes()[0].event_type(), "MeetupCreated");

        meetup.invite_user(u2).unwrap();

        assert_eq!(meetup.changes().len(), 1);
        assert_eq!(meetup.invited(), &BTreeSet::from([u2]));
    }

    #[test]
    fn fresh_meetup_has_exactly_one_initial_event() {
        let (meetup, _, _) = default_meetup();

        let created = &meetup.changes()[0];
        assert_eq!(meetup.changes().len(), 1);
        assert!(created.is_initial);
        assert_eq!(created.sequence_number, SequenceNumber::zero());
        assert_eq!(created.aggregate_id, meetup.id());
        assert_eq!(created.timestamp, now());
        assert_eq!(meetup.version(), SequenceNumber::zero());
    }

    #[test]
    fn create_with_given_id() {
        let id = MeetupId::new();
        let meetup = Meetup::create_with_id(
            id,
            now() + Duration::hours(1),
            name("Standup"),
            UserId::new(),
            [],
            clock(),
        )
        .unwrap();

        assert_eq!(meetup.id(), id);
    }

    #[test]
    fn create_in_the_past_fails() {
        let result = Meetup::create(now(), name("Too late"), UserId::new(), [], clock());

        let err = result.unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            DomainError::Meetup(MeetupError::DateNotInFuture { .. })
        ));
    }
}

mod commands {
    use super::*;

    #[test]
    fn sequence_numbers_are_contiguous() {
        let (mut meetup, _, guest) = default_meetup();
        let newcomer = UserId::new();

        meetup.reschedule(now() + Duration::days(7)).unwrap();
        meetup.rename(name("New meetup name")).unwrap();
        meetup.invite_user(newcomer).unwrap();
        meetup.accept(guest).unwrap();

        assert_eq!(sequence_numbers(meetup.changes()), vec![0, 1, 2, 3, 4]);
        assert_eq!(meetup.version().to_int(), 4);
    }

    #[test]
    fn remove_invited_user() {
        let (mut meetup, _, _) = default_meetup();
        let newcomer = UserId::new();

        meetup.invite_user(newcomer).unwrap();
        meetup.remove_user(newcomer).unwrap();

        assert_eq!(meetup.invited().len(), 1);
        assert!(!meetup.invited().contains(&newcomer));
        assert_eq!(meetup.changes().len(), 3);
        assert_eq!(meetup.changes()[2].event_type(), "UserRemoved");
    }

    #[test]
    fn remove_attending_user() {
        let (mut meetup, _, _) = default_meetup();
        let newcomer = UserId::new();

        meetup.invite_user(newcomer).unwrap();
        meetup.accept(newcomer).unwrap();
        meetup.remove_user(newcomer).unwrap();

        assert_eq!(meetup.invited().len(), 1);
        assert_eq!(meetup.attending().len(), 1);
        assert!(!meetup.attending().contains(&newcomer));
        assert!(!meetup.invited().contains(&newcomer));
        assert_eq!(meetup.changes().len(), 4);
    }

    #[test]
    fn accept_without_invitation_fails() {
        let (mut meetup, _, _) = default_meetup();
        let stranger = UserId::new();

        let err = meetup.accept(stranger).unwrap_err();

        assert_eq!(
            err,
            DomainError::Meetup(MeetupError::UserNotInvited { user: stranger })
        );
        assert_eq!(meetup.changes().len(), 1);
    }

    #[test]
    fn reject_as_organiser_fails_even_after_handover() {
        let (mut meetup, creator, guest) = default_meetup();
        meetup.accept(guest).unwrap();
        meetup.change_organiser(guest).unwrap();

        assert!(meetup.reject(guest).is_err());
        meetup.reject(creator).unwrap();

        assert!(meetup.invited().contains(&creator));
        assert_eq!(meetup.attending(), &BTreeSet::from([guest]));
    }

    #[test]
    fn invite_attending_user_is_ignored() {
        let (mut meetup, organiser, guest) = default_meetup();
        meetup.accept(guest).unwrap();

        meetup.invite_user(organiser).unwrap();
        meetup.invite_user(guest).unwrap();

        assert_eq!(meetup.changes().len(), 2);
        assert!(meetup.invited().is_empty());
    }

    #[test]
    fn no_op_commands_raise_nothing() {
        let (mut meetup, organiser, guest) = default_meetup();
        let stranger = UserId::new();
        let version = meetup.version();

        meetup.rename(name("Rooftop Party")).unwrap();
        meetup.change_organiser(organiser).unwrap();
        meetup.invite_user(organiser).unwrap();
        meetup.invite_user(guest).unwrap();
        meetup.remove_user(stranger).unwrap();
        meetup.accept(organiser).unwrap();
        meetup.reject(guest).unwrap();
        meetup.reject(stranger).unwrap();

        assert_eq!(meetup.changes().len(), 1);
        assert_eq!(meetup.version(), version);
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn cancel_twice_is_a_no_op() {
        let (mut meetup, _, _) = default_meetup();
        let reason = reason("It's raining.");

        meetup.cancel(reason.clone()).unwrap();
        meetup.cancel(reason.clone()).unwrap();

        assert!(meetup.is_cancelled());
        assert_eq!(meetup.status().reason(), Some(&reason));
        assert_eq!(meetup.changes().len(), 2);
    }

    #[test]
    fn cancel_after_occurrence_fails() {
        let clock = ManualClock::at(now() - Duration::days(7));
        let mut meetup = Meetup::create(
            now() - Duration::days(6),
            name("Last week"),
            UserId::new(),
            [],
            Arc::new(clock.clone()),
        )
        .unwrap();
        assert!(!meetup.has_occurred());

        clock.reset();

        assert!(meetup.has_occurred());
        let err = meetup.cancel(reason("It's raining.")).unwrap_err();
        assert_eq!(err, DomainError::Meetup(MeetupError::AlreadyOccurred));
        assert!(!meetup.is_cancelled());
    }

    #[test]
    fn cancelled_meetup_is_frozen() {
        let (mut meetup, _, guest) = default_meetup();
        meetup.cancel(reason("Venue flooded")).unwrap();
        let changes = meetup.changes().to_vec();

        assert!(meetup.reschedule(now() + Duration::days(3)).is_err());
        assert!(meetup.rename(name("Another name")).is_err());
        assert!(meetup.remove_user(guest).is_err());
        assert!(matches!(
            meetup.change_organiser(guest),
            Err(DomainError::InvalidOperation { .. })
        ));

        assert_eq!(meetup.changes(), changes.as_slice());
    }
}

mod reconstruction {
    use super::*;

    #[test]
    fn restore_from_handwritten_history() {
        let id = MeetupId::new();
        let creator = UserId::new();
        let new_date = now() + Duration::days(7);
        let cancellation = reason("It's raining.");

        let events = vec![
            EventEnvelope::new(
                id,
                SequenceNumber::from_int(2).unwrap(),
                now(),
                MeetupEvent::meetup_cancelled(cancellation.clone()),
            ),
            EventEnvelope::new(
                id,
                SequenceNumber::from_int(0).unwrap(),
                now(),
                MeetupEvent::meetup_created(now(), name("Rooftop Party"), creator, BTreeSet::new()),
            ),
            EventEnvelope::new(
                id,
                SequenceNumber::from_int(1).unwrap(),
                now(),
                MeetupEvent::meetup_rescheduled(new_date),
            ),
        ];

        let stream = EventStream::create(events).unwrap();
        let meetup = Meetup::from_stream(&stream, clock());

        assert_eq!(meetup.id(), id);
        assert_eq!(meetup.date(), new_date);
        assert_eq!(meetup.status(), &MeetupStatus::Cancelled(cancellation));
        assert!(meetup.is_cancelled());
        assert_eq!(meetup.version().to_int(), 2);
        assert!(meetup.changes().is_empty());
    }

    #[test]
    fn round_trip_through_persistence() {
        let (mut meetup, _, guest) = default_meetup();
        let newcomer = UserId::new();
        let mut log = InMemoryLog::default();

        meetup.reschedule(now() + Duration::days(2)).unwrap();
        meetup.invite_user(newcomer).unwrap();
        meetup.accept(guest).unwrap();
        log.persist(&mut meetup);
        assert!(meetup.changes().is_empty());

        meetup.change_organiser(guest).unwrap();
        meetup.rename(name("Garden Party")).unwrap();
        log.persist(&mut meetup);

        let restored = Meetup::from_stream(&log.load(), clock());

        assert_eq!(restored.id(), meetup.id());
        assert_eq!(restored.state(), meetup.state());
        assert_eq!(restored.version(), meetup.version());
        assert!(restored.changes().is_empty());
    }

    #[test]
    fn restored_meetup_continues_history() {
        let (mut meetup, _, guest) = default_meetup();
        meetup.accept(guest).unwrap();
        let stream = EventStream::create(meetup.take_changes()).unwrap();

        let mut restored = Meetup::from_stream(&stream, clock());
        restored.reject(guest).unwrap();

        assert_eq!(sequence_numbers(restored.changes()), vec![2]);
        assert!(!restored.changes()[0].is_initial);
    }

    #[test]
    fn round_trip_through_json() {
        let (mut meetup, _, guest) = default_meetup();
        meetup.accept(guest).unwrap();
        meetup.cancel(reason("Speaker is ill")).unwrap();

        let json = serde_json::to_string(meetup.changes()).unwrap();
        let stored: Vec<MeetupEnvelope> = serde_json::from_str(&json).unwrap();
        assert_eq!(stored.as_slice(), meetup.changes());

        let restored = Meetup::from_stream(&EventStream::create(stored).unwrap(), clock());
        assert_eq!(restored.state(), meetup.state());
        assert!(restored.is_cancelled());
    }

    #[test]
    fn stored_event_shape() {
        let (meetup, organiser, guest) = default_meetup();

        let json = serde_json::to_value(&meetup.changes()[0]).unwrap();

        assert_eq!(json["aggregate_id"], serde_json::json!(meetup.id().as_uuid()));
        assert_eq!(json["sequence_number"], serde_json::json!(0));
        assert_eq!(json["is_initial"], serde_json::json!(true));
        assert_eq!(json["payload"]["type"], serde_json::json!("MeetupCreated"));
        assert_eq!(
            json["payload"]["data"]["created_by"],
            serde_json::json!(organiser.as_uuid())
        );
        assert_eq!(
            json["payload"]["data"]["invited"],
            serde_json::json!([guest.as_uuid()])
        );
    }

    #[test]
    fn stream_from_another_meetup_is_rejected() {
        let (mut first, _, _) = default_meetup();
        let (mut second, _, _) = default_meetup();
        second.rename(name("Other party")).unwrap();

        let mut events = first.take_changes();
        events.push(second.take_changes().pop().unwrap());

        let err = EventStream::create(events).unwrap_err();
        assert!(err.contains(StreamViolation::MultipleAggregates));
        assert!(DomainError::from(err).is_validation());
    }

    #[test]
    fn initial_flag_must_match_event_kind() {
        let id = MeetupId::new();
        let created = |creator| {
            MeetupEvent::meetup_created(now(), name("Rooftop Party"), creator, BTreeSet::new())
        };

        let second_creation = vec![
            EventEnvelope::new(id, SequenceNumber::zero(), now(), created(UserId::new())),
            EventEnvelope::new(
                id,
                SequenceNumber::from_int(1).unwrap(),
                now(),
                created(UserId::new()),
            )
            .with_initial(false),
        ];
        let err = EventStream::create(second_creation).unwrap_err();
        assert!(err.contains(StreamViolation::InitialFlagMismatch));

        let invite_as_origin = vec![
            EventEnvelope::new(
                id,
                SequenceNumber::zero(),
                now(),
                MeetupEvent::user_invited(UserId::new()),
            )
            .with_initial(true),
        ];
        let err = EventStream::create(invite_as_origin).unwrap_err();
        assert_eq!(err.violations(), &[StreamViolation::InitialFlagMismatch]);
    }

    #[test]
    fn replayed_payloads_are_the_raised_payloads() {
        let (mut meetup, _, guest) = default_meetup();
        meetup.accept(guest).unwrap();
        let raised: Vec<MeetupEvent> = meetup.changes().iter().map(|e| e.payload.clone()).collect();

        let stream = EventStream::create(meetup.take_changes()).unwrap();
        let replayed: Vec<MeetupEvent> = stream.iter().map(|e| e.payload.clone()).collect();

        assert_eq!(raised, replayed);
        assert!(replayed[0].is_initial());
    }
}
