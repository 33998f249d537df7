//! Routing-key derivation.
//!
//! An [`EventRouter`] turns an event into the routing key a broker uses to
//! pick destination queues. Routers are pure and total: every event gets a
//! key, possibly an empty one.

mod pattern;

pub use pattern::PatternRouter;

use crate::event::Event;

/// Derives a routing key for an event.
///
/// Any `Fn(&E) -> String` closure is a router:
///
/// ```
/// use eventband::routing::EventRouter;
/// use eventband::{BandEvent, Event};
///
/// let router = |event: &BandEvent| format!("app.{}", event.name());
/// assert_eq!(router.route_event(&BandEvent::new("signup")), "app.signup");
/// ```
pub trait EventRouter<E: ?Sized>: Send + Sync {
    fn route_event(&self, event: &E) -> String;
}

impl<E: ?Sized, F> EventRouter<E> for F
where
    F: Fn(&E) -> String + Send + Sync,
{
    fn route_event(&self, event: &E) -> String {
        self(event)
    }
}

/// Uses the event name as the routing key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventNameRouter;

impl<E: Event + ?Sized> EventRouter<E> for EventNameRouter {
    fn route_event(&self, event: &E) -> String {
        event.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BandEvent;

    #[test]
    fn name_router_uses_event_name() {
        let event = BandEvent::new("order.placed");
        assert_eq!(EventNameRouter.route_event(&event), "order.placed");
    }

    #[test]
    fn closures_are_routers() {
        let router = |event: &BandEvent| event.name().replace('.', "/");
        let boxed: Box<dyn EventRouter<BandEvent>> = Box::new(router);

        assert_eq!(boxed.route_event(&BandEvent::new("order.placed")), "order/placed");
    }
}
