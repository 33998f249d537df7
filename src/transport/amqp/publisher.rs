use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, error, warn};

use super::config::PublisherConfig;
use super::converter::MessageEventConverter;
use super::driver::AmqpDriver;
use super::publication::MessagePublication;
use crate::event::Event;
use crate::routing::EventRouter;
use crate::transport::{EventPublisher, PublishError};

/// Publishes events through an [`AmqpDriver`].
///
/// ## Example
///
/// ```
/// use eventband::routing::EventNameRouter;
/// use eventband::transport::amqp::{
///     AmqpPublisher, InMemoryDriver, JsonEventConverter, PublisherConfig,
/// };
/// use eventband::transport::EventPublisher;
/// use eventband::BandEvent;
///
/// let driver = InMemoryDriver::new();
/// let publisher = AmqpPublisher::new(
///     driver.clone(),
///     JsonEventConverter::<BandEvent>::new(),
///     PublisherConfig::exchange("events"),
/// )
/// .with_router(EventNameRouter);
///
/// publisher.publish_event(&BandEvent::new("order.placed")).unwrap();
///
/// let published = driver.published();
/// assert_eq!(published[0].exchange, "events");
/// assert_eq!(published[0].routing_key, "order.placed");
/// assert!(published[0].publication.is_persistent());
/// ```
pub struct AmqpPublisher<E, D, C> {
    driver: D,
    converter: C,
    router: Option<Box<dyn EventRouter<E>>>,
    config: PublisherConfig,
    _event: PhantomData<fn(&E)>,
}

impl<E, D, C> AmqpPublisher<E, D, C> {
    /// Create a publisher without a router (empty routing keys).
    ///
    /// The configuration is not validated here; a publisher with neither
    /// exchange nor queue fails on every publish.
    pub fn new(driver: D, converter: C, config: PublisherConfig) -> Self {
        Self {
            driver,
            converter,
            router: None,
            config,
            _event: PhantomData,
        }
    }

    /// Derive routing keys with `router` when publishing to an exchange.
    pub fn with_router<R>(mut self, router: R) -> Self
    where
        R: EventRouter<E> + 'static,
    {
        self.router = Some(Box::new(router));
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn has_router(&self) -> bool {
        self.router.is_some()
    }

    fn routing_key(&self, event: &E) -> String {
        self.router
            .as_ref()
            .map(|router| router.route_event(event))
            .unwrap_or_default()
    }
}

impl<E, D: fmt::Debug, C: fmt::Debug> fmt::Debug for AmqpPublisher<E, D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmqpPublisher")
            .field("driver", &self.driver)
            .field("converter", &self.converter)
            .field("router", &self.router.as_ref().map(|_| ".."))
            .field("config", &self.config)
            .finish()
    }
}

impl<E, D, C> EventPublisher<E> for AmqpPublisher<E, D, C>
where
    E: Event,
    D: AmqpDriver,
    C: MessageEventConverter<E>,
{
    #[tracing::instrument(name = "amqp.publish", skip_all, fields(event = %event.name()))]
    fn publish_event(&self, event: &E) -> Result<(), PublishError> {
        let target = self.config.target().map_err(|err| {
            error!(error = %err, "Publisher has no target");
            err
        })?;

        let message = self.converter.event_to_message(event).map_err(|cause| {
            warn!(error = %cause, "Event conversion failed");
            PublishError::conversion(event.name(), cause)
        })?;

        let routing_key = self.routing_key(event);
        let exchange = target.name();

        let publication = MessagePublication::new(message, self.config.delivery_options());

        self.driver
            .publish(&publication, exchange, &routing_key)
            .map_err(|cause| {
                warn!(
                    exchange = %exchange,
                    routing_key = %routing_key,
                    error = %cause,
                    "Driver publish failed"
                );
                PublishError::driver(event.name(), cause)
            })?;

        debug!(
            exchange = %exchange,
            routing_key = %routing_key,
            persistent = publication.is_persistent(),
            mandatory = publication.is_mandatory(),
            immediate = publication.is_immediate(),
            "Published event"
        );
        Ok(())
    }
}
