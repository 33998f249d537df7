use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use eventband::transport::amqp::{
    AmqpDriver, AmqpMessage, ConversionError, DriverError, MessageEventConverter,
    MessagePublication,
};
use eventband::{BandEvent, Event, EventRouter};

/// One call received by [`RecordingDriver`].
#[derive(Clone, Debug, PartialEq)]
pub struct DriverCall {
    pub publication: MessagePublication,
    pub exchange: String,
    pub routing_key: String,
}

/// Driver that records calls and optionally fails each of them.
#[derive(Default)]
pub struct RecordingDriver {
    calls: Mutex<Vec<DriverCall>>,
    failure: Option<DriverError>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publish fails with (a clone of) `error`.
    pub fn failing(error: DriverError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn single_call(&self) -> DriverCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one driver call");
        calls.into_iter().next().unwrap()
    }
}

impl AmqpDriver for RecordingDriver {
    fn publish(
        &self,
        publication: &MessagePublication,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push(DriverCall {
            publication: publication.clone(),
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
        });

        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Converter returning a fixed message or a fixed error.
pub struct StubConverter {
    outcome: Result<AmqpMessage, ConversionError>,
    seen: Mutex<Vec<BandEvent>>,
}

impl StubConverter {
    pub fn returning(message: AmqpMessage) -> Self {
        Self {
            outcome: Ok(message),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ConversionError) -> Self {
        Self {
            outcome: Err(error),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Events passed to `event_to_message`, in order.
    pub fn seen(&self) -> Vec<BandEvent> {
        self.seen.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl MessageEventConverter<BandEvent> for StubConverter {
    fn event_to_message(&self, event: &BandEvent) -> Result<AmqpMessage, ConversionError> {
        self.seen.lock().unwrap().push(event.clone());
        self.outcome.clone()
    }

    fn message_to_event(&self, message: &AmqpMessage) -> Result<BandEvent, ConversionError> {
        Err(ConversionError::new(
            message.message_type().unwrap_or_default(),
            "stub converter is outbound only",
        ))
    }
}

/// Router returning a fixed key and counting calls.
///
/// Clones share their counters, so a test can keep one clone and hand the
/// other to the publisher.
#[derive(Clone)]
pub struct StubRouter {
    key: String,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl StubRouter {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Names of the routed events, in order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl EventRouter<BandEvent> for StubRouter {
    fn route_event(&self, event: &BandEvent) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(event.name().to_string());
        self.key.clone()
    }
}
