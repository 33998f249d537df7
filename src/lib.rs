//! Event dispatching and AMQP publishing.
//!
//! - [`dispatch`]: synchronous, in-process delivery of events to
//!   subscriptions registered by event name.
//! - [`transport`]: turning events into broker messages and handing them to
//!   a driver, with one error type for every publish failure.
//! - [`routing`]: routing-key derivation for brokers.
//!
//! ```
//! use std::sync::Arc;
//!
//! use eventband::dispatch::{BandDispatcher, EventDispatcher};
//! use eventband::routing::PatternRouter;
//! use eventband::transport::amqp::{
//!     AmqpPublisher, InMemoryDriver, JsonEventConverter, PublisherConfig,
//! };
//! use eventband::transport::PublishEventSubscription;
//! use eventband::BandEvent;
//!
//! let driver = InMemoryDriver::new();
//! let publisher = AmqpPublisher::new(
//!     driver.clone(),
//!     JsonEventConverter::<BandEvent>::new(),
//!     PublisherConfig::exchange("events"),
//! )
//! .with_router(PatternRouter::new("app.{name}"));
//!
//! let dispatcher: BandDispatcher<BandEvent> = BandDispatcher::new();
//! dispatcher
//!     .subscribe(Arc::new(PublishEventSubscription::<BandEvent, _>::new(
//!         "user.registered",
//!         publisher,
//!     )))
//!     .unwrap();
//!
//! dispatcher.dispatch(&BandEvent::new("user.registered")).unwrap();
//! assert_eq!(driver.published()[0].routing_key, "app.user.registered");
//! ```

pub mod dispatch;
mod event;
pub mod routing;
pub mod transport;

pub use dispatch::{
    BandDispatcher, CallbackSubscription, DispatchError, EventDispatcher, Subscription,
};
pub use event::{BandEvent, Event};
pub use routing::{EventNameRouter, EventRouter, PatternRouter};
pub use transport::{EventPublisher, PublishError, PublishEventSubscription};

#[cfg(feature = "derive")]
pub use eventband_macros::Event;
