//! Event transport - publishing events to message brokers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 EventPublisher::publish_event                │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       AmqpPublisher                          │
//! │  config check ─► converter ─► router ─► MessagePublication   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │     AmqpDriver::publish(publication, exchange, routing_key)  │
//! │     InMemoryDriver (included) / broker clients (external)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures surface as a single [`PublishError`] that keeps the original
//! conversion or driver error as its source.

pub mod amqp;
mod error;
mod subscription;

pub use error::PublishError;
pub use subscription::PublishEventSubscription;

use std::sync::Arc;

/// Publishes events to a broker.
///
/// A call that returns `Ok` means the broker client accepted the message,
/// not that it was stored or delivered. Nothing is retried or deduplicated:
/// publishing the same event twice sends it twice.
pub trait EventPublisher<E: ?Sized>: Send + Sync {
    fn publish_event(&self, event: &E) -> Result<(), PublishError>;
}

impl<E: ?Sized, P: EventPublisher<E> + ?Sized> EventPublisher<E> for Arc<P> {
    fn publish_event(&self, event: &E) -> Result<(), PublishError> {
        (**self).publish_event(event)
    }
}

impl<E: ?Sized, P: EventPublisher<E> + ?Sized> EventPublisher<E> for Box<P> {
    fn publish_event(&self, event: &E) -> Result<(), PublishError> {
        (**self).publish_event(event)
    }
}
