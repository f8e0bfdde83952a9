use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::app::message::CustomMessage;
use crate::app::receiver::Receiver;
use crate::client::Template;
use crate::topology::Topology;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The receiver confirmed delivery within the wait bound.
    Received,
    /// The wait bound elapsed first.
    TimedOut,
}

/// The message published by the demonstration run.
pub fn demo_message() -> CustomMessage {
    CustomMessage::builder()
        .text("Hello custom message :)")
        .priority(1)
        .secret(true)
        .build()
}

/// Publishes one message and waits for the receiver to see it.
#[derive(Debug)]
pub struct Runner {
    template: Template,
    receiver: Arc<Receiver>,
    topology: Topology,
    wait_timeout: Duration,
}

impl Runner {
    pub fn new(
        template: Template,
        receiver: Arc<Receiver>,
        topology: Topology,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            template,
            receiver,
            topology,
            wait_timeout,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome, AppError> {
        self.send(&demo_message()).await
    }

    /// Publish `message` under the topology's routing key, then wait.
    ///
    /// Publish failures are returned as errors. A timeout is not an error; it
    /// is reported as `RunOutcome::TimedOut` and logged at WARN.
    pub async fn send(&self, message: &CustomMessage) -> Result<RunOutcome, AppError> {
        info!("Sending Message ...");
        let routed = self.template.convert_and_send(
            &self.topology.exchange.name,
            &self.topology.routing_key,
            message,
        )?;
        info!(
            exchange = %self.topology.exchange.name,
            routing_key = %self.topology.routing_key,
            routed,
            "Message published"
        );

        if self.receiver.wait_for_message(self.wait_timeout).await {
            info!("Receipt confirmed");
            Ok(RunOutcome::Received)
        } else {
            let timeout_ms = self.wait_timeout.as_millis();
            warn!(%timeout_ms, "No receipt before timeout");
            Ok(RunOutcome::TimedOut)
        }
    }
}
