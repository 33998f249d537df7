use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::message::AmqpMessage;
use crate::event::Event;

/// Converts between events and AMQP messages.
pub trait MessageEventConverter<E>: Send + Sync {
    /// Build the message to publish for `event`.
    fn event_to_message(&self, event: &E) -> Result<AmqpMessage, ConversionError>;

    /// Rebuild an event from a consumed message.
    fn message_to_event(&self, message: &AmqpMessage) -> Result<E, ConversionError>;
}

impl<E, C: MessageEventConverter<E> + ?Sized> MessageEventConverter<E> for Arc<C> {
    fn event_to_message(&self, event: &E) -> Result<AmqpMessage, ConversionError> {
        (**self).event_to_message(event)
    }

    fn message_to_event(&self, message: &AmqpMessage) -> Result<E, ConversionError> {
        (**self).message_to_event(message)
    }
}

/// An event that cannot be represented as a message, or the reverse.
///
/// `event` is the event name; for inbound messages it is the message `type`
/// property (empty when absent).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot convert event `{event}`: {reason}")]
pub struct ConversionError {
    event: String,
    reason: String,
}

impl ConversionError {
    pub fn new(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            reason: reason.into(),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn inbound(message: &AmqpMessage, reason: impl Into<String>) -> Self {
        Self::new(message.message_type().unwrap_or_default(), reason)
    }
}

fn check_content_type(
    message: &AmqpMessage,
    expected: &'static str,
) -> Result<(), ConversionError> {
    match message.content_type() {
        Some(found) if found != expected => Err(ConversionError::inbound(
            message,
            format!("unsupported content type `{}`, expected `{}`", found, expected),
        )),
        _ => Ok(()),
    }
}

/// Serializes events as JSON message bodies.
///
/// The event name goes into the message `type` property.
pub struct JsonEventConverter<E> {
    _event: PhantomData<fn() -> E>,
}

impl<E> JsonEventConverter<E> {
    pub const CONTENT_TYPE: &'static str = "application/json";

    pub fn new() -> Self {
        Self {
            _event: PhantomData,
        }
    }
}

impl<E> Default for JsonEventConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for JsonEventConverter<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for JsonEventConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonEventConverter")
    }
}

impl<E> MessageEventConverter<E> for JsonEventConverter<E>
where
    E: Event + Serialize + DeserializeOwned,
{
    fn event_to_message(&self, event: &E) -> Result<AmqpMessage, ConversionError> {
        let body = serde_json::to_vec(event)
            .map_err(|err| ConversionError::new(event.name(), err.to_string()))?;

        Ok(AmqpMessage::new(body)
            .with_content_type(Self::CONTENT_TYPE)
            .with_type(event.name()))
    }

    fn message_to_event(&self, message: &AmqpMessage) -> Result<E, ConversionError> {
        check_content_type(message, Self::CONTENT_TYPE)?;
        serde_json::from_slice(&message.body)
            .map_err(|err| ConversionError::inbound(message, err.to_string()))
    }
}

/// Serializes events with `bitcode` for compact binary bodies.
///
/// bitcode is not self-describing, so events holding `serde_json::Value`
/// (such as [`BandEvent`](crate::BandEvent)) cannot be decoded; use concrete
/// payload types.
#[cfg(feature = "bitcode")]
pub struct BitcodeEventConverter<E> {
    _event: PhantomData<fn() -> E>,
}

#[cfg(feature = "bitcode")]
impl<E> BitcodeEventConverter<E> {
    pub const CONTENT_TYPE: &'static str = "application/x-bitcode";

    pub fn new() -> Self {
        Self {
            _event: PhantomData,
        }
    }
}

#[cfg(feature = "bitcode")]
impl<E> Default for BitcodeEventConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "bitcode")]
impl<E> fmt::Debug for BitcodeEventConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BitcodeEventConverter")
    }
}

#[cfg(feature = "bitcode")]
impl<E> MessageEventConverter<E> for BitcodeEventConverter<E>
where
    E: Event + Serialize + DeserializeOwned,
{
    fn event_to_message(&self, event: &E) -> Result<AmqpMessage, ConversionError> {
        let body = bitcode::serialize(event)
            .map_err(|err| ConversionError::new(event.name(), err.to_string()))?;

        Ok(AmqpMessage::new(body)
            .with_content_type(Self::CONTENT_TYPE)
            .with_type(event.name()))
    }

    fn message_to_event(&self, message: &AmqpMessage) -> Result<E, ConversionError> {
        check_content_type(message, Self::CONTENT_TYPE)?;
        bitcode::deserialize(&message.body)
            .map_err(|err| ConversionError::inbound(message, err.to_string()))
    }
}
