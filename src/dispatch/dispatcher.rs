use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use super::error::{DispatchError, DispatchResult};
use super::subscription::{CallbackSubscription, Subscription};
use crate::event::Event;

/// Registry of subscriptions that can deliver events to them.
///
/// Subscriptions receive the dispatcher as `&dyn EventDispatcher<E>`, so the
/// trait is object safe.
pub trait EventDispatcher<E: Event>: Send + Sync {
    /// Register a subscription. It is appended after the existing
    /// subscriptions for the same event name.
    fn subscribe(&self, subscription: Arc<dyn Subscription<E>>) -> DispatchResult<()>;

    /// Remove a previously registered subscription.
    ///
    /// Returns `false` if it was not registered.
    fn unsubscribe(&self, subscription: &Arc<dyn Subscription<E>>) -> DispatchResult<bool>;

    /// Subscriptions for `event_name` in `band`, in registration order.
    fn subscriptions(
        &self,
        event_name: &str,
        band: Option<&str>,
    ) -> DispatchResult<Vec<Arc<dyn Subscription<E>>>>;

    /// Deliver `event` to every matching subscription, in order.
    ///
    /// Returns each subscription's result in the same order. The first
    /// error stops delivery and is returned unchanged.
    fn dispatch_event(&self, event: &E, band: Option<&str>) -> DispatchResult<Vec<bool>>;
}

type Registry<E> = HashMap<String, Vec<Arc<dyn Subscription<E>>>>;

/// Synchronous, in-process [`EventDispatcher`].
///
/// Clones share the same registry. The registry lock is released before any
/// subscription runs, so subscriptions may dispatch further events or
/// (un)subscribe while being dispatched; such changes apply from the next
/// dispatch on.
pub struct BandDispatcher<E> {
    registry: Arc<RwLock<Registry<E>>>,
}

impl<E: Event> BandDispatcher<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe a closure to `event_name`.
    ///
    /// Returns the registered subscription, which can be passed to
    /// [`EventDispatcher::unsubscribe`].
    pub fn on<F>(
        &self,
        event_name: impl Into<String>,
        handler: F,
    ) -> DispatchResult<Arc<dyn Subscription<E>>>
    where
        E: 'static,
        F: Fn(&E, &dyn EventDispatcher<E>) -> DispatchResult + Send + Sync + 'static,
    {
        let subscription: Arc<dyn Subscription<E>> =
            Arc::new(CallbackSubscription::new(event_name, handler));
        self.subscribe(Arc::clone(&subscription))?;
        Ok(subscription)
    }

    /// Dispatch to subscriptions outside any band.
    pub fn dispatch(&self, event: &E) -> DispatchResult<Vec<bool>> {
        self.dispatch_event(event, None)
    }

    /// Dispatch to the subscriptions of one band.
    pub fn dispatch_to(&self, event: &E, band: &str) -> DispatchResult<Vec<bool>> {
        self.dispatch_event(event, Some(band))
    }

    /// Whether anything, in any band, is subscribed to `event_name`.
    pub fn has_subscriptions(&self, event_name: &str) -> DispatchResult<bool> {
        let registry = self
            .registry
            .read()
            .map_err(|_| DispatchError::RegistryPoisoned("has_subscriptions"))?;
        Ok(registry.get(event_name).is_some_and(|subs| !subs.is_empty()))
    }

    /// Event names with at least one subscription, sorted.
    pub fn event_names(&self) -> DispatchResult<Vec<String>> {
        let registry = self
            .registry
            .read()
            .map_err(|_| DispatchError::RegistryPoisoned("event_names"))?;
        let mut names: Vec<String> = registry.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl<E: Event> Default for BandDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for BandDispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> fmt::Debug for BandDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("BandDispatcher");
        match self.registry.read() {
            Ok(registry) => out.field("event_names", &registry.keys().collect::<Vec<_>>()),
            Err(_) => out.field("registry", &"<poisoned>"),
        };
        out.finish()
    }
}

impl<E: Event> EventDispatcher<E> for BandDispatcher<E> {
    fn subscribe(&self, subscription: Arc<dyn Subscription<E>>) -> DispatchResult<()> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| DispatchError::RegistryPoisoned("subscribe"))?;

        let event_name = subscription.event_name().to_string();
        debug!(
            event = %event_name,
            band = ?subscription.band(),
            "Registering subscription"
        );
        registry.entry(event_name).or_default().push(subscription);
        Ok(())
    }

    fn unsubscribe(&self, subscription: &Arc<dyn Subscription<E>>) -> DispatchResult<bool> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| DispatchError::RegistryPoisoned("unsubscribe"))?;

        let event_name = subscription.event_name();
        let Some(subscriptions) = registry.get_mut(event_name) else {
            return Ok(false);
        };

        let before = subscriptions.len();
        subscriptions.retain(|registered| !Arc::ptr_eq(registered, subscription));
        let removed = subscriptions.len() != before;

        if subscriptions.is_empty() {
            registry.remove(event_name);
        }

        if removed {
            debug!(event = %event_name, "Removed subscription");
        }
        Ok(removed)
    }

    fn subscriptions(
        &self,
        event_name: &str,
        band: Option<&str>,
    ) -> DispatchResult<Vec<Arc<dyn Subscription<E>>>> {
        let registry = self
            .registry
            .read()
            .map_err(|_| DispatchError::RegistryPoisoned("subscriptions"))?;

        Ok(registry
            .get(event_name)
            .map(|subscriptions| {
                subscriptions
                    .iter()
                    .filter(|subscription| subscription.band() == band)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn dispatch_event(&self, event: &E, band: Option<&str>) -> DispatchResult<Vec<bool>> {
        // Snapshot so the lock is not held while subscriptions run.
        let subscriptions = self.subscriptions(event.name(), band)?;

        debug!(
            event = event.name(),
            band = ?band,
            subscriptions = subscriptions.len(),
            "Dispatching event"
        );

        let mut results = Vec::with_capacity(subscriptions.len());
        for (position, subscription) in subscriptions.iter().enumerate() {
            trace!(event = event.name(), position, "Invoking subscription");

            match subscription.dispatch(event, self) {
                Ok(result) => results.push(result),
                Err(err) => {
                    warn!(
                        event = event.name(),
                        position,
                        remaining = subscriptions.len() - position - 1,
                        error = %err,
                        "Subscription failed, aborting dispatch"
                    );
                    return Err(err);
                }
            }
        }

        Ok(results)
    }
}
