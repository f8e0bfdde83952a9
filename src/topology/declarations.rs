//! Broker entity declarations
//!
//! Plain values describing what the broker should create: a queue, a topic
//! exchange and the binding between them. They carry no behavior; the broker
//! interprets them in `Broker::declare_*`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    /// Whether the queue survives a broker restart.
    pub durable: bool,
}

impl Queue {
    pub fn new(name: impl Into<String>, durable: bool) -> Self {
        Self {
            name: name.into(),
            durable,
        }
    }
}

/// A topic-style exchange: routes on hierarchical, `.`-separated keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicExchange {
    pub name: String,
}

impl TopicExchange {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub queue: String,
    pub exchange: String,
    pub pattern: String,
}

impl Binding {
    /// Start a binding for `queue`; finish it with `.to(exchange).with(pattern)`.
    pub fn bind(queue: &Queue) -> BindingBuilder {
        BindingBuilder {
            queue: queue.name.clone(),
        }
    }
}

pub struct BindingBuilder {
    queue: String,
}

impl BindingBuilder {
    pub fn to(self, exchange: &TopicExchange) -> BoundBindingBuilder {
        BoundBindingBuilder {
            queue: self.queue,
            exchange: exchange.name.clone(),
        }
    }
}

pub struct BoundBindingBuilder {
    queue: String,
    exchange: String,
}

impl BoundBindingBuilder {
    pub fn with(self, pattern: impl Into<String>) -> Binding {
        Binding {
            queue: self.queue,
            exchange: self.exchange,
            pattern: pattern.into(),
        }
    }
}
