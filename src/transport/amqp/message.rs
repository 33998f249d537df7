use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// AMQP basic properties carried with a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageProperties {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub message_id: Option<String>,
    pub app_id: Option<String>,
    pub user_id: Option<String>,
    pub priority: Option<u8>,
    /// Seconds since the Unix epoch.
    pub timestamp: Option<u64>,
    pub expiration: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub reply_to: Option<String>,
    pub correlation_id: Option<String>,
}

/// Transport-level representation of an event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmqpMessage {
    pub body: Vec<u8>,
    #[serde(default)]
    pub properties: MessageProperties,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl AmqpMessage {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.properties.content_type = Some(content_type.into());
        self
    }

    pub fn with_type(mut self, message_type: impl Into<String>) -> Self {
        self.properties.message_type = Some(message_type.into());
        self
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.properties.message_id = Some(id.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.properties.content_type.as_deref()
    }

    pub fn message_type(&self) -> Option<&str> {
        self.properties.message_type.as_deref()
    }

    /// Get the body as a string (if valid UTF-8).
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}
