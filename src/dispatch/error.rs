use std::error::Error as StdError;

use thiserror::Error;

use crate::transport::PublishError;

/// Errors raised while dispatching an event to its subscriptions.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A thread panicked while holding the subscription registry lock.
    #[error("subscription registry lock poisoned during {0}")]
    RegistryPoisoned(&'static str),

    /// A subscription refused the event.
    #[error("subscription for `{event}` rejected the event: {reason}")]
    Rejected { event: String, reason: String },

    /// A subscription failed with an underlying error.
    #[error("subscription for `{event}` failed")]
    Handler {
        event: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A publishing subscription could not hand the event to its broker.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl DispatchError {
    pub fn rejected(event: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::Rejected {
            event: event.into(),
            reason: reason.into(),
        }
    }

    pub fn handler(
        event: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        DispatchError::Handler {
            event: event.into(),
            source: source.into(),
        }
    }
}

/// Result returned by subscriptions and dispatchers.
pub type DispatchResult<T = bool> = Result<T, DispatchError>;
