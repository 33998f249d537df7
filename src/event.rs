use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A domain event, identified by its name.
///
/// Dispatchers look subscriptions up by [`Event::name`], and converters
/// stamp it into outgoing messages. Implement it by hand or with
/// `#[derive(Event)]`.
pub trait Event: Send + Sync {
    fn name(&self) -> &str;
}

impl<E: Event + ?Sized> Event for &E {
    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<E: Event + ?Sized> Event for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<E: Event + ?Sized> Event for Arc<E> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// General-purpose event: a name plus a JSON payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandEvent {
    pub name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl BandEvent {
    /// Create an event with an empty (`null`) payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: serde_json::Value::Null,
        }
    }

    /// Create an event whose payload is the JSON form of `payload`.
    pub fn with_payload<T: Serialize>(
        name: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: name.into(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Decode the payload into a concrete type.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

impl Event for BandEvent {
    fn name(&self) -> &str {
        &self.name
    }
}
