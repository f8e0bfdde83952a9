//! Messaging topology
//!
//! The queue, exchange and binding the application declares at startup,
//! together with the routing key the runner publishes under. A `Topology` is
//! built once and handed explicitly to both the publishing and the
//! subscribing side so the routing key and binding pattern cannot drift apart
//! unnoticed: `validate` refuses a key the binding would never route.

pub mod declarations;
pub mod topic;

pub use declarations::{Binding, Queue, TopicExchange};

use crate::config::TopologySettings;
use crate::utils::error::AppError;

pub const QUEUE_NAME: &str = "spring";
pub const EXCHANGE_NAME: &str = "spring-ex";
pub const BINDING_PATTERN: &str = "foo.bar.#";
pub const ROUTING_KEY: &str = "foo.bar.baz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub queue: Queue,
    pub exchange: TopicExchange,
    pub binding: Binding,
    /// Key the runner publishes under.
    pub routing_key: String,
}

impl Topology {
    pub fn new(
        queue: Queue,
        exchange: TopicExchange,
        pattern: &str,
        routing_key: impl Into<String>,
    ) -> Self {
        let binding = Binding::bind(&queue).to(&exchange).with(pattern);
        Self {
            queue,
            exchange,
            binding,
            routing_key: routing_key.into(),
        }
    }

    pub fn from_settings(settings: &TopologySettings) -> Result<Self, AppError> {
        let topology = Self::new(
            Queue::new(settings.queue_name.clone(), settings.queue_durable),
            TopicExchange::new(settings.exchange_name.clone()),
            &settings.binding_pattern,
            settings.routing_key.clone(),
        );
        topology.validate()?;
        Ok(topology)
    }

    /// Fails when the publish routing key would not be routed by the binding.
    pub fn validate(&self) -> Result<(), AppError> {
        if topic::matches(&self.binding.pattern, &self.routing_key) {
            Ok(())
        } else {
            Err(AppError::UnroutableKey {
                routing_key: self.routing_key.clone(),
                pattern: self.binding.pattern.clone(),
            })
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new(
            Queue::new(QUEUE_NAME, false),
            TopicExchange::new(EXCHANGE_NAME),
            BINDING_PATTERN,
            ROUTING_KEY,
        )
    }
}
