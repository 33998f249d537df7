//! In-process event dispatch.
//!
//! A [`BandDispatcher`] keeps an ordered list of [`Subscription`]s per event
//! name and invokes them synchronously, on the caller's thread, whenever an
//! event with that name is dispatched.
//!
//! ```text
//! dispatch(event) ──► registry[event.name()] ──► sub₁.dispatch(event, dispatcher)
//!                                              ├► sub₂.dispatch(event, dispatcher)
//!                                              └► ...  (stops at the first error)
//! ```
//!
//! Subscriptions may belong to a *band*, a named channel. Dispatching to a
//! band reaches only the subscriptions registered in that band; a plain
//! dispatch reaches only subscriptions without one.
//!
//! ## Example
//!
//! ```
//! use eventband::dispatch::BandDispatcher;
//! use eventband::BandEvent;
//!
//! let dispatcher: BandDispatcher<BandEvent> = BandDispatcher::new();
//! dispatcher
//!     .on("user.registered", |_event: &BandEvent, _dispatcher| Ok(true))
//!     .unwrap();
//!
//! let results = dispatcher.dispatch(&BandEvent::new("user.registered")).unwrap();
//! assert_eq!(results, vec![true]);
//! ```

mod dispatcher;
mod error;
mod subscription;

pub use dispatcher::{BandDispatcher, EventDispatcher};
pub use error::{DispatchError, DispatchResult};
pub use subscription::{CallbackSubscription, Subscription};
