use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message as the broker sees it: an opaque body plus routing metadata.
///
/// # Fields
///
/// - `message_id` - Unique id assigned at creation (UUID v4).
/// - `exchange` - Exchange the message was published to; set by the broker on publish.
/// - `routing_key` - Key used to match bindings; set by the broker on publish.
/// - `content_type` - MIME type of `body`, e.g. `application/json`.
/// - `body` - Encoded payload. The broker never looks inside.
/// - `timestamp` - Milliseconds since UNIX epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub message_id: String,
    pub exchange: String,
    pub routing_key: String,
    pub content_type: String,
    pub body: Vec<u8>,
    pub timestamp: i64,
}

impl Delivery {
    pub fn new(content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            exchange: String::new(),
            routing_key: String::new(),
            content_type: content_type.into(),
            body,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
