//! In-process message broker
//!
//! Stands in for an external AMQP broker: it holds declared queues, topic
//! exchanges and bindings, routes published deliveries to matching queues and
//! hands them to registered consumers. Nothing is persisted.
//!
//! The broker is synchronous and meant to be shared behind a lock
//! (`SharedBroker`). Delivery to consumers goes through unbounded channels, so
//! no caller ever waits on a consumer while holding the lock.

pub mod engine;
pub mod message;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::utils::error::BrokerError;

pub use engine::Broker;
pub use message::Delivery;

pub type SharedBroker = Arc<Mutex<Broker>>;

pub fn shared(broker: Broker) -> SharedBroker {
    Arc::new(Mutex::new(broker))
}

/// Lock the broker, turning a poisoned lock into `BrokerError::Poisoned`.
pub fn lock(broker: &SharedBroker) -> Result<MutexGuard<'_, Broker>, BrokerError> {
    broker.lock().map_err(|_| BrokerError::Poisoned)
}

#[cfg(test)]
mod tests;
