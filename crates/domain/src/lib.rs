//! Event-sourced aggregate kernel.
//!
//! This crate provides the core abstractions including:
//! - SequenceNumber for monotonic versions
//! - DomainEvent trait and the EventEnvelope the kernel stamps
//! - EventStream, the validated unit of replay
//! - Aggregate trait and the AggregateRoot raise/replay driver
//! - Meetup reference aggregate with an invitation workflow

pub mod aggregate;
pub mod error;
pub mod event;
pub mod meetup;
pub mod sequence;
pub mod stream;

pub use aggregate::{Aggregate, AggregateRoot, Envelope, Stream};
pub use error::DomainError;
pub use event::{DomainEvent, EventEnvelope};
pub use meetup::{
    CancellationReason, Meetup, MeetupEnvelope, MeetupError, MeetupEvent, MeetupId, MeetupName,
    MeetupState, MeetupStatus, MeetupStream,
};
pub use sequence::SequenceNumber;
pub use stream::{EventStream, StreamError, StreamViolation};
