use std::fmt;

use super::dispatcher::EventDispatcher;
use super::error::DispatchResult;
use crate::event::Event;

/// A handler registered with a dispatcher for one event name.
///
/// `dispatch` receives the event together with the dispatcher that is
/// delivering it, so a subscription can inspect the registry or raise
/// follow-up events.
pub trait Subscription<E: Event>: Send + Sync {
    /// Name of the events this subscription receives.
    fn event_name(&self) -> &str;

    /// Band this subscription belongs to, if any.
    fn band(&self) -> Option<&str> {
        None
    }

    /// Handle one event.
    fn dispatch(&self, event: &E, dispatcher: &dyn EventDispatcher<E>) -> DispatchResult;
}

type Handler<E> = dyn Fn(&E, &dyn EventDispatcher<E>) -> DispatchResult + Send + Sync;

/// Subscription backed by a closure.
///
/// The closure is called with exactly the event and dispatcher passed to
/// [`Subscription::dispatch`], and its result is returned as-is.
///
/// ## Example
///
/// ```
/// use eventband::dispatch::{BandDispatcher, CallbackSubscription, Subscription};
/// use eventband::BandEvent;
///
/// let subscription = CallbackSubscription::new("order.placed", |event: &BandEvent, _| {
///     Ok(event.payload.is_object())
/// });
///
/// let dispatcher: BandDispatcher<BandEvent> = BandDispatcher::new();
/// let handled = subscription
///     .dispatch(&BandEvent::new("order.placed"), &dispatcher)
///     .unwrap();
/// assert!(!handled);
/// ```
pub struct CallbackSubscription<E> {
    event_name: String,
    band: Option<String>,
    handler: Box<Handler<E>>,
}

impl<E: Event> CallbackSubscription<E> {
    pub fn new<F>(event_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&E, &dyn EventDispatcher<E>) -> DispatchResult + Send + Sync + 'static,
    {
        Self {
            event_name: event_name.into(),
            band: None,
            handler: Box::new(handler),
        }
    }

    /// Place the subscription in a band.
    pub fn in_band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }
}

impl<E: Event> Subscription<E> for CallbackSubscription<E> {
    fn event_name(&self) -> &str {
        &self.event_name
    }

    fn band(&self) -> Option<&str> {
        self.band.as_deref()
    }

    fn dispatch(&self, event: &E, dispatcher: &dyn EventDispatcher<E>) -> DispatchResult {
        (self.handler)(event, dispatcher)
    }
}

impl<E> fmt::Debug for CallbackSubscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSubscription")
            .field("event_name", &self.event_name)
            .field("band", &self.band)
            .finish_non_exhaustive()
    }
}
