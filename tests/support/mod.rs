//! Test doubles for the publish pipeline.
//!
//! Each double implements the collaborator trait directly and records how it
//! was called, so tests can assert on call counts and arguments.

#![allow(dead_code)]

mod doubles;
pub mod orders;

#[allow(unused_imports)]
pub use doubles::{DriverCall, RecordingDriver, StubConverter, StubRouter};

use eventband::transport::amqp::AmqpMessage;
use eventband::BandEvent;

pub fn order_placed() -> BandEvent {
    BandEvent::with_payload(
        "order.placed",
        &serde_json::json!({ "order_id": "o-1", "region": "eu" }),
    )
    .unwrap()
}

pub fn order_message() -> AmqpMessage {
    AmqpMessage::new(br#"{"order_id":"o-1"}"#.to_vec())
        .with_content_type("application/json")
        .with_message_id("msg-o-1")
}
