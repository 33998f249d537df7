use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use super::EventPublisher;
use crate::dispatch::{DispatchResult, EventDispatcher, Subscription};
use crate::event::Event;

/// Subscription that forwards dispatched events to a publisher.
///
/// Registering one with a dispatcher sends every matching in-process event
/// to the broker as well. A failed publish aborts the dispatch with
/// [`DispatchError::Publish`](crate::dispatch::DispatchError::Publish).
pub struct PublishEventSubscription<E, P> {
    event_name: String,
    band: Option<String>,
    publisher: P,
    _event: PhantomData<fn(&E)>,
}

impl<E, P> PublishEventSubscription<E, P> {
    pub fn new(event_name: impl Into<String>, publisher: P) -> Self {
        Self {
            event_name: event_name.into(),
            band: None,
            publisher,
            _event: PhantomData,
        }
    }

    pub fn in_band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<E, P> Subscription<E> for PublishEventSubscription<E, P>
where
    E: Event,
    P: EventPublisher<E>,
{
    fn event_name(&self) -> &str {
        &self.event_name
    }

    fn band(&self) -> Option<&str> {
        self.band.as_deref()
    }

    fn dispatch(&self, event: &E, _dispatcher: &dyn EventDispatcher<E>) -> DispatchResult {
        trace!(event = event.name(), "Forwarding event to publisher");
        self.publisher.publish_event(event)?;
        Ok(true)
    }
}

impl<E, P: fmt::Debug> fmt::Debug for PublishEventSubscription<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishEventSubscription")
            .field("event_name", &self.event_name)
            .field("band", &self.band)
            .field("publisher", &self.publisher)
            .finish()
    }
}
