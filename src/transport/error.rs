use std::error::Error as StdError;

use thiserror::Error;

use super::amqp::{ConfigurationError, ConversionError, DriverError};

/// Error returned by [`EventPublisher::publish_event`](super::EventPublisher::publish_event).
///
/// Conversion and driver failures are wrapped exactly once; the original
/// error is kept in `cause` and returned by [`StdError::source`].
#[derive(Debug, Error)]
pub enum PublishError {
    /// The publisher can never publish as configured.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The event could not be turned into a message.
    #[error("failed to publish event `{event}`: conversion failed")]
    Conversion {
        event: String,
        #[source]
        cause: ConversionError,
    },

    /// The broker driver failed to publish the message.
    #[error("failed to publish event `{event}`: driver failed")]
    Driver {
        event: String,
        #[source]
        cause: DriverError,
    },
}

impl PublishError {
    pub fn conversion(event: impl Into<String>, cause: ConversionError) -> Self {
        PublishError::Conversion {
            event: event.into(),
            cause,
        }
    }

    pub fn driver(event: impl Into<String>, cause: DriverError) -> Self {
        PublishError::Driver {
            event: event.into(),
            cause,
        }
    }

    /// Name of the event that failed, unless the publisher is misconfigured.
    pub fn event_name(&self) -> Option<&str> {
        match self {
            PublishError::Configuration(_) => None,
            PublishError::Conversion { event, .. } | PublishError::Driver { event, .. } => {
                Some(event)
            }
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, PublishError::Configuration(_))
    }

    /// The wrapped conversion or driver error.
    pub fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PublishError::Configuration(_) => None,
            PublishError::Conversion { cause, .. } => Some(cause),
            PublishError::Driver { cause, .. } => Some(cause),
        }
    }
}
