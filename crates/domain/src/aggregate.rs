//! Core aggregate trait and the generic raise/replay driver.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::Clock;

use crate::error::DomainError;
use crate::event::{DomainEvent, EventEnvelope};
use crate::sequence::SequenceNumber;
use crate::stream::EventStream;

/// An event as raised by, or replayed into, aggregate `A`.
pub type Envelope<A> = EventEnvelope<<A as Aggregate>::Id, <A as Aggregate>::Event>;

/// A validated history of aggregate `A`.
pub type Stream<A> = EventStream<<A as Aggregate>::Id, <A as Aggregate>::Event>;

/// Trait for the state of an event-sourced aggregate.
///
/// The state is never stored. It is derived by folding events through
/// [`apply`](Aggregate::apply), starting from `Default`. The same function
/// drives live mutation and historical replay.
pub trait Aggregate: Default + Debug + Send + Sync + Sized {
    /// The identity type of this aggregate.
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync;

    /// The closed set of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Applies an event to the state.
    ///
    /// This method must be pure and deterministic:
    /// - It must be total over every event variant
    /// - It must not fail or validate (validation happens before raising)
    /// - It must not raise further events
    fn apply(&mut self, event: &Self::Event);

    /// Returns true once no further events may be raised.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Lifecycle driver shared by every aggregate type.
///
/// Owns the identity, the version counter, the derived state and the queue
/// of pending changes. All mutation goes through [`raise`](Self::raise).
pub struct AggregateRoot<A: Aggregate> {
    id: A::Id,
    version: SequenceNumber,
    initialized: bool,
    state: A,
    changes: Vec<Envelope<A>>,
    clock: Arc<dyn Clock>,
}

impl<A: Aggregate> AggregateRoot<A> {
    /// Creates an empty root. The first raised event must be the initial one.
    pub fn new(id: A::Id, clock: Arc<dyn Clock>) -> Self {
        Self {
            id,
            version: SequenceNumber::zero(),
            initialized: false,
            state: A::default(),
            changes: Vec::new(),
            clock,
        }
    }

    /// Rebuilds a root by replaying a validated history.
    ///
    /// No events are queued; the version becomes the stream's version.
    pub fn from_stream(stream: &Stream<A>, clock: Arc<dyn Clock>) -> Self {
        let mut state = A::default();
        stream.for_each(|event| state.apply(&event.payload));

        let root = Self {
            id: *stream.aggregate_id(),
            version: stream.version(),
            initialized: true,
            state,
            changes: Vec::new(),
            clock,
        };

        tracing::debug!(
            aggregate_type = A::aggregate_type(),
            aggregate_id = %root.id,
            events = stream.len(),
            version = root.version.to_int(),
            terminal = root.is_terminal(),
            "aggregate reconstructed"
        );
        metrics::counter!("aggregate_replays_total", "aggregate_type" => A::aggregate_type())
            .increment(1);

        root
    }

    /// Applies `event` and queues it as a pending change.
    ///
    /// The initial event takes sequence number 0 without advancing the
    /// version; every other event advances the version and takes the new
    /// value. Fails without any change if the aggregate is terminal, or if
    /// the event's initial flag does not fit the aggregate's lifecycle.
    pub fn raise(&mut self, event: A::Event) -> Result<(), DomainError> {
        if self.is_terminal() {
            tracing::warn!(
                aggregate_type = A::aggregate_type(),
                aggregate_id = %self.id,
                event_type = event.event_type(),
                "refused to raise event on terminal aggregate"
            );
            return Err(self.invalid_operation("aggregate is terminal"));
        }

        let is_initial = event.is_initial();
        if is_initial && self.initialized {
            return Err(self.invalid_operation("aggregate already has an initial event"));
        }
        if !is_initial && !self.initialized {
            return Err(self.invalid_operation("aggregate has no initial event"));
        }

        self.state.apply(&event);

        let sequence_number = if is_initial {
            self.initialized = true;
            self.version
        } else {
            self.version.increment()
        };
        let envelope = EventEnvelope::new(self.id, sequence_number, self.clock.now(), event);

        tracing::debug!(
            aggregate_type = A::aggregate_type(),
            aggregate_id = %self.id,
            event_type = envelope.event_type(),
            sequence_number = sequence_number.to_int(),
            "event raised"
        );
        metrics::counter!("aggregate_events_raised_total", "aggregate_type" => A::aggregate_type())
            .increment(1);

        self.changes.push(envelope);
        Ok(())
    }

    /// Clears pending changes. State and version are untouched.
    pub fn reset_changes(&mut self) {
        self.changes.clear();
    }

    /// Drains and returns pending changes in raise order.
    pub fn take_changes(&mut self) -> Vec<Envelope<A>> {
        std::mem::take(&mut self.changes)
    }

    /// Returns pending changes in raise order.
    pub fn changes(&self) -> &[Envelope<A>] {
        &self.changes
    }

    /// Returns the aggregate identifier.
    pub fn id(&self) -> A::Id {
        self.id
    }

    /// Returns the current version.
    pub fn version(&self) -> SequenceNumber {
        self.version
    }

    /// Returns the derived state.
    pub fn state(&self) -> &A {
        &self.state
    }

    /// Returns true once no further events may be raised.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns the current time of the aggregate's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn invalid_operation(&self, reason: &'static str) -> DomainError {
        DomainError::InvalidOperation {
            aggregate_type: A::aggregate_type(),
            aggregate_id: self.id.to_string(),
            reason,
        }
    }
}

impl<A: Aggregate> Debug for AggregateRoot<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateRoot")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("state", &self.state)
            .field("changes", &self.changes)
            .finish_non_exhaustive()
    }
}
