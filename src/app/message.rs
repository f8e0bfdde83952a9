use std::fmt;

use serde::{Deserialize, Serialize};

/// The application payload: a short text with a priority and a secrecy flag.
///
/// Immutable once built; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMessage {
    text: String,
    priority: i32,
    secret: bool,
}

impl CustomMessage {
    pub fn new(text: impl Into<String>, priority: i32, secret: bool) -> Self {
        Self {
            text: text.into(),
            priority,
            secret,
        }
    }

    pub fn builder() -> CustomMessageBuilder {
        CustomMessageBuilder::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn secret(&self) -> bool {
        self.secret
    }
}

impl fmt::Display for CustomMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CustomMessage(text={}, priority={}, secret={})",
            self.text, self.priority, self.secret
        )
    }
}

/// Unset fields default to empty text, priority 0 and `secret = false`.
#[derive(Debug, Default)]
pub struct CustomMessageBuilder {
    text: String,
    priority: i32,
    secret: bool,
}

impl CustomMessageBuilder {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    pub fn build(self) -> CustomMessage {
        CustomMessage::new(self.text, self.priority, self.secret)
    }
}
