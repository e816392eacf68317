//! Validated event histories, the unit of replay.

use std::fmt::Debug;

use thiserror::Error;

use crate::event::{DomainEvent, EventEnvelope};
use crate::sequence::SequenceNumber;

/// A rule an event history can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StreamViolation {
    /// There are no events at all.
    #[error("cannot create empty event stream")]
    Empty,

    /// The lowest sequence number does not carry the initial event.
    #[error("first event is not the initial event")]
    InitialEventNotFirst,

    /// A sequence number falls outside `0..len`, leaving a gap.
    #[error("missing sequence numbers in event stream")]
    MissingSequenceNumbers,

    /// Two events share a sequence number.
    #[error("duplicate sequence numbers in event stream")]
    DuplicateSequenceNumbers,

    /// Events belong to different aggregates.
    #[error("multiple aggregates in event stream")]
    MultipleAggregates,

    /// More than one event claims to originate the aggregate.
    #[error("multiple initial events in event stream")]
    MultipleInitialEvents,

    /// An envelope's initial flag disagrees with the kind of its payload.
    #[error("initial flag does not match event kind in event stream")]
    InitialFlagMismatch,
}

/// Every rule a rejected history broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.violations))]
pub struct StreamError {
    violations: Vec<StreamViolation>,
}

fn describe(violations: &[StreamViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl StreamError {
    /// Returns the broken rules in check order.
    pub fn violations(&self) -> &[StreamViolation] {
        &self.violations
    }

    /// Returns true if `violation` was among the broken rules.
    pub fn contains(&self, violation: StreamViolation) -> bool {
        self.violations.contains(&violation)
    }
}

/// An ordered, gap-free, duplicate-free history of one aggregate.
///
/// Invariants hold from construction on:
/// - at least one event;
/// - the event at sequence 0 is the initial event, and it is the only one;
/// - every initial flag matches its payload's kind;
/// - sequence numbers are exactly `0..len`;
/// - every event references the same aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStream<I, E> {
    events: Vec<EventEnvelope<I, E>>,
}

impl<I, E> EventStream<I, E>
where
    I: PartialEq + Debug,
    E: DomainEvent,
{
    /// Sorts `events` by sequence number and validates the result.
    ///
    /// Input order is irrelevant. Every rule is checked, and the error
    /// lists all of those that failed.
    pub fn create(
        events: impl IntoIterator<Item = EventEnvelope<I, E>>,
    ) -> Result<Self, StreamError> {
        let mut events: Vec<_> = events.into_iter().collect();
        events.sort_by_key(|event| event.sequence_number);

        let violations = validate(&events);
        if !violations.is_empty() {
            tracing::debug!(
                events = events.len(),
                ?violations,
                "rejected event stream"
            );
            return Err(StreamError { violations });
        }

        Ok(Self { events })
    }
}

impl<I, E> EventStream<I, E> {
    /// Returns the sequence number of the last event.
    pub fn version(&self) -> SequenceNumber {
        SequenceNumber::from_index(self.events.len() - 1)
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns the aggregate every event belongs to.
    pub fn aggregate_id(&self) -> &I {
        &self.events[0].aggregate_id
    }

    /// Iterates the events in ascending sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, EventEnvelope<I, E>> {
        self.events.iter()
    }

    /// Visits every event in ascending sequence order.
    pub fn for_each(&self, visitor: impl FnMut(&EventEnvelope<I, E>)) {
        self.events.iter().for_each(visitor);
    }

    /// Returns the events, consuming the stream.
    pub fn into_events(self) -> Vec<EventEnvelope<I, E>> {
        self.events
    }
}

impl<I, E> IntoIterator for EventStream<I, E> {
    type Item = EventEnvelope<I, E>;
    type IntoIter = std::vec::IntoIter<EventEnvelope<I, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a, I, E> IntoIterator for &'a EventStream<I, E> {
    type Item = &'a EventEnvelope<I, E>;
    type IntoIter = std::slice::Iter<'a, EventEnvelope<I, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Runs every check against events already sorted by sequence number.
fn validate<I: PartialEq, E: DomainEvent>(events: &[EventEnvelope<I, E>]) -> Vec<StreamViolation> {
    let mut violations = Vec::new();

    if events.is_empty() {
        violations.push(StreamViolation::Empty);
    }

    if events.first().is_some_and(|first| !first.is_initial) {
        violations.push(StreamViolation::InitialEventNotFirst);
    }

    let len = events.len();
    if events
        .iter()
        .any(|event| event.sequence_number >= SequenceNumber::from_index(len))
    {
        violations.push(StreamViolation::MissingSequenceNumbers);
    }

    if events
        .windows(2)
        .any(|pair| pair[0].sequence_number == pair[1].sequence_number)
    {
        violations.push(StreamViolation::DuplicateSequenceNumbers);
    }

    if let Some(first) = events.first() {
        if events
            .iter()
            .any(|event| event.aggregate_id != first.aggregate_id)
        {
            violations.push(StreamViolation::MultipleAggregates);
        }
    }

    if events.iter().filter(|event| event.is_initial).count() > 1 {
        violations.push(StreamViolation::MultipleInitialEvents);
    }

    if events
        .iter()
        .any(|event| event.is_initial != event.payload.is_initial())
    {
        violations.push(StreamViolation::InitialFlagMismatch);
    }

    violations
}
