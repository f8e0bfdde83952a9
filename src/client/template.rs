use serde::Serialize;
use tracing::debug;

use crate::broker::{self, SharedBroker};
use crate::client::converter;
use crate::utils::error::ClientError;

/// Publishing helper: converts a value and sends it to an exchange.
#[derive(Debug, Clone)]
pub struct Template {
    broker: SharedBroker,
}

impl Template {
    pub fn new(broker: SharedBroker) -> Self {
        Self { broker }
    }

    /// Encode `payload` and publish it under `routing_key`.
    ///
    /// Returns the number of queues the message was routed to; `0` means the
    /// broker dropped it as unroutable.
    pub fn convert_and_send<T: Serialize>(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &T,
    ) -> Result<usize, ClientError> {
        let delivery = converter::to_delivery(payload)?;
        let message_id = delivery.message_id.clone();

        let routed = broker::lock(&self.broker)?.publish(exchange, routing_key, delivery)?;
        debug!(exchange, routing_key, %message_id, routed, "Published message");
        Ok(routed)
    }
}
