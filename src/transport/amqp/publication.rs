use serde::{Deserialize, Serialize};

use super::message::AmqpMessage;

/// Delivery flags for one broker send.
///
/// Each flag is passed through to the driver unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Ask the broker to store the message durably.
    pub persistent: bool,
    /// Return the message if no queue is bound for its routing key.
    pub mandatory: bool,
    /// Return the message if no consumer can take it immediately.
    pub immediate: bool,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            persistent: true,
            mandatory: false,
            immediate: false,
        }
    }
}

/// A message together with its delivery flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagePublication {
    message: AmqpMessage,
    options: DeliveryOptions,
}

impl MessagePublication {
    pub fn new(message: AmqpMessage, options: DeliveryOptions) -> Self {
        Self { message, options }
    }

    pub fn message(&self) -> &AmqpMessage {
        &self.message
    }

    pub fn into_message(self) -> AmqpMessage {
        self.message
    }

    pub fn options(&self) -> DeliveryOptions {
        self.options
    }

    pub fn is_persistent(&self) -> bool {
        self.options.persistent
    }

    pub fn is_mandatory(&self) -> bool {
        self.options.mandatory
    }

    pub fn is_immediate(&self) -> bool {
        self.options.immediate
    }

    /// AMQP `delivery-mode` property: 2 for persistent, 1 for transient.
    pub fn delivery_mode(&self) -> u8 {
        if self.options.persistent {
            2
        } else {
            1
        }
    }
}
