use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use super::publication::MessagePublication;

/// Broker client performing the actual publish.
///
/// Implementations might include:
/// - `InMemoryDriver` - For testing and single-process scenarios
/// - A `lapin` channel wrapper - For RabbitMQ
/// - Any other AMQP 0-9-1 client
pub trait AmqpDriver: Send + Sync {
    /// Publish a message to `exchange` with `routing_key`.
    ///
    /// `exchange` is the publisher's configured exchange, or its queue name
    /// when only a queue is configured. An empty exchange name is the
    /// broker's default exchange.
    fn publish(
        &self,
        publication: &MessagePublication,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), DriverError>;
}

impl<D: AmqpDriver + ?Sized> AmqpDriver for Arc<D> {
    fn publish(
        &self,
        publication: &MessagePublication,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), DriverError> {
        (**self).publish(publication, exchange, routing_key)
    }
}

impl<D: AmqpDriver + ?Sized> AmqpDriver for Box<D> {
    fn publish(
        &self,
        publication: &MessagePublication,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), DriverError> {
        (**self).publish(publication, exchange, routing_key)
    }
}

/// Transport failure reported by a driver.
///
/// Cloning shares the underlying source; two errors are equal when their
/// messages match and they carry the same source instance (or none).
#[derive(Clone, Error)]
#[error("amqp driver error: {message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverError")
            .field("message", &self.message)
            .field("source", &self.source.as_ref().map(|s| s.to_string()))
            .finish()
    }
}

impl PartialEq for DriverError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && match (&self.source, &other.source) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

/// One publish recorded by [`InMemoryDriver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedMessage {
    pub exchange: String,
    pub routing_key: String,
    pub publication: MessagePublication,
}

/// Driver that keeps every publication in memory instead of talking to a
/// broker.
///
/// Clones append to and read from one log, so a test can keep a clone and
/// inspect what a publisher sent. Publishing only fails if a thread panicked
/// while holding the log.
///
/// ## Example
///
/// ```
/// use eventband::transport::amqp::{
///     AmqpDriver, AmqpMessage, DeliveryOptions, InMemoryDriver, MessagePublication,
/// };
///
/// let driver = InMemoryDriver::new();
/// let publication = MessagePublication::new(AmqpMessage::new("{}"), DeliveryOptions::default());
///
/// driver.publish(&publication, "events", "order.placed").unwrap();
///
/// assert_eq!(driver.len(), 1);
/// assert_eq!(driver.published()[0].routing_key, "order.placed");
/// ```
#[derive(Clone, Default)]
pub struct InMemoryDriver {
    log: Arc<RwLock<Vec<PublishedMessage>>>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All publishes, in order.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publishes sent with the given routing key, in order.
    pub fn find_by_routing_key(&self, routing_key: &str) -> Vec<PublishedMessage> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| p.routing_key == routing_key)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything published so far.
    pub fn clear(&self) {
        self.log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for InMemoryDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryDriver")
            .field("published", &self.len())
            .finish()
    }
}

impl AmqpDriver for InMemoryDriver {
    fn publish(
        &self,
        publication: &MessagePublication,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), DriverError> {
        self.log
            .write()
            .map_err(|_| DriverError::new("in-memory driver log poisoned"))?
            .push(PublishedMessage {
                exchange: exchange.to_string(),
                routing_key: routing_key.to_string(),
                publication: publication.clone(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::amqp::{AmqpMessage, DeliveryOptions};
    use std::io;
    use std::thread;

    fn publication(body: &str) -> MessagePublication {
        MessagePublication::new(AmqpMessage::new(body), DeliveryOptions::default())
    }

    #[test]
    fn records_publishes_in_order() {
        let driver = InMemoryDriver::new();
        driver.publish(&publication("1"), "events", "a").unwrap();
        driver.publish(&publication("2"), "", "jobs").unwrap();

        let published = driver.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].exchange, "events");
        assert_eq!(published[1].exchange, "");
        assert_eq!(published[1].publication.message().body_str(), Some("2"));
        assert_eq!(driver.find_by_routing_key("jobs").len(), 1);

        driver.clear();
        assert!(driver.is_empty());
    }

    #[test]
    fn clones_share_log_across_threads() {
        let driver = InMemoryDriver::new();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let driver = driver.clone();
                thread::spawn(move || {
                    driver
                        .publish(&publication(&i.to_string()), "events", "k")
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(driver.len(), 4);
    }

    #[test]
    fn driver_error_equality_tracks_source_identity() {
        let plain = DriverError::new("connection lost");
        assert_eq!(plain, plain.clone());
        assert_eq!(plain, DriverError::new("connection lost"));

        let with_source = DriverError::with_source("connection lost", io::Error::other("reset"));
        assert_eq!(with_source, with_source.clone());
        assert_ne!(
            with_source,
            DriverError::with_source("connection lost", io::Error::other("reset"))
        );
        assert_ne!(with_source, plain);
        assert_eq!(with_source.source().unwrap().to_string(), "reset");
    }
}
