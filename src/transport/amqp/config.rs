use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::publication::DeliveryOptions;

/// The publisher cannot publish anything as configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("neither exchange nor queue is set for the publisher")]
    MissingTarget,
}

/// Publisher settings.
///
/// Deserializable so it can be embedded in a host application's config
/// tree; every field is optional there.
///
/// ```
/// use eventband::transport::amqp::PublisherConfig;
///
/// let config: PublisherConfig =
///     serde_json::from_str(r#"{ "exchange": "events", "mandatory": true }"#).unwrap();
///
/// assert_eq!(config.exchange.as_deref(), Some("events"));
/// assert!(config.persistent);
/// assert!(config.mandatory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Exchange to publish to.
    pub exchange: Option<String>,
    /// Queue to publish to, used when no exchange is set.
    pub queue: Option<String>,
    pub persistent: bool,
    pub mandatory: bool,
    pub immediate: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        let options = DeliveryOptions::default();
        Self {
            exchange: None,
            queue: None,
            persistent: options.persistent,
            mandatory: options.mandatory,
            immediate: options.immediate,
        }
    }
}

/// Where a publish goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget<'a> {
    /// A named exchange.
    Exchange(&'a str),
    /// A queue, for publishers configured without an exchange.
    Queue(&'a str),
}

impl<'a> PublishTarget<'a> {
    /// Name handed to [`AmqpDriver::publish`](super::AmqpDriver::publish)
    /// as the exchange target.
    pub fn name(&self) -> &'a str {
        match *self {
            PublishTarget::Exchange(name) | PublishTarget::Queue(name) => name,
        }
    }
}

impl PublisherConfig {
    /// Config targeting an exchange.
    pub fn exchange(name: impl Into<String>) -> Self {
        Self {
            exchange: Some(name.into()),
            ..Default::default()
        }
    }

    /// Config targeting a queue.
    pub fn queue(name: impl Into<String>) -> Self {
        Self {
            queue: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn delivery_options(&self) -> DeliveryOptions {
        DeliveryOptions {
            persistent: self.persistent,
            mandatory: self.mandatory,
            immediate: self.immediate,
        }
    }

    /// Resolve the publish target. An exchange wins over a queue.
    pub fn target(&self) -> Result<PublishTarget<'_>, ConfigurationError> {
        match (&self.exchange, &self.queue) {
            (Some(exchange), _) => Ok(PublishTarget::Exchange(exchange)),
            (None, Some(queue)) => Ok(PublishTarget::Queue(queue)),
            (None, None) => Err(ConfigurationError::MissingTarget),
        }
    }
}
