//! AMQP publishing.
//!
//! [`AmqpPublisher`] drives one publish: it checks its [`PublisherConfig`],
//! converts the event with a [`MessageEventConverter`], derives a routing
//! key, wraps the message in a [`MessagePublication`] carrying the delivery
//! flags and hands it to an [`AmqpDriver`].
//!
//! The driver is the only part that talks to a broker; this module ships an
//! [`InMemoryDriver`] for tests and single-process setups.

mod config;
mod converter;
mod driver;
mod message;
mod publication;
mod publisher;

pub use config::{ConfigurationError, PublishTarget, PublisherConfig};
#[cfg(feature = "bitcode")]
pub use converter::BitcodeEventConverter;
pub use converter::{ConversionError, JsonEventConverter, MessageEventConverter};
pub use driver::{AmqpDriver, DriverError, InMemoryDriver, PublishedMessage};
pub use message::{AmqpMessage, MessageProperties};
pub use publication::{DeliveryOptions, MessagePublication};
pub use publisher::AmqpPublisher;
