//! Domain events and the envelope the kernel stamps around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::sequence::SequenceNumber;

/// Trait for domain events.
///
/// Implemented by each aggregate's closed set of event variants. Events are
/// facts about one aggregate instance, named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + std::fmt::Debug + Send + Sync + Clone {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns true for the variant that originates an aggregate.
    fn is_initial(&self) -> bool {
        false
    }
}

/// A domain event together with the data the kernel assigns when raising it.
///
/// This is the shape a persistence collaborator stores and hands back for
/// reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<I, E> {
    /// The aggregate this event belongs to.
    pub aggregate_id: I,

    /// Position of the event in the aggregate's history.
    pub sequence_number: SequenceNumber,

    /// When the event was raised.
    pub timestamp: DateTime<Utc>,

    /// True only for the event that originates the aggregate.
    pub is_initial: bool,

    /// The event itself.
    pub payload: E,
}

impl<I, E: DomainEvent> EventEnvelope<I, E> {
    /// Creates an envelope, taking the initial flag from the payload.
    pub fn new(
        aggregate_id: I,
        sequence_number: SequenceNumber,
        timestamp: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            aggregate_id,
            sequence_number,
            timestamp,
            is_initial: payload.is_initial(),
            payload,
        }
    }

    /// Overrides the initial flag.
    pub fn with_initial(mut self, is_initial: bool) -> Self {
        self.is_initial = is_initial;
        self
    }

    /// Returns the payload's event type name.
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
