//! Listener container
//!
//! Registers a consumer on a queue and runs a tokio task that decodes each
//! delivery and passes it to a `MessageListener`. The listener therefore runs
//! on the runtime's worker pool, never on the task that started the container.
//!
//! `start` must be called from within a tokio runtime.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::broker::{self, Delivery, SharedBroker};
use crate::client::consumer::{Consumer, ConsumerTag};
use crate::client::converter;
use crate::utils::error::{BrokerError, ClientError};

/// Receives decoded messages from a listener container.
pub trait MessageListener: Send + Sync + 'static {
    type Message: DeserializeOwned + Send + 'static;

    fn on_message(&self, message: Self::Message);
}

#[derive(Debug)]
pub struct ListenerContainer {
    broker: SharedBroker,
    queue: String,
    consumer_tag: Option<ConsumerTag>,
    task: Option<JoinHandle<()>>,
}

impl ListenerContainer {
    pub fn new(broker: SharedBroker, queue: impl Into<String>) -> Self {
        Self {
            broker,
            queue: queue.into(),
            consumer_tag: None,
            task: None,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn consumer_tag(&self) -> Option<&str> {
        self.consumer_tag.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.consumer_tag.is_some()
    }

    /// Register a consumer on the queue and start dispatching to `listener`.
    pub fn start<L: MessageListener>(&mut self, listener: Arc<L>) -> Result<(), ClientError> {
        if self.is_running() {
            return Err(ClientError::AlreadyRunning {
                queue: self.queue.clone(),
            });
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
        let consumer = Consumer::new(self.queue.clone(), tx);
        let tag = consumer.tag.clone();

        broker::lock(&self.broker)?.register_consumer(consumer)?;

        let task_tag = tag.clone();
        let queue = self.queue.clone();
        let task = tokio::spawn(async move {
            while let Some(delivery) = rx.recv().await {
                match converter::from_delivery::<L::Message>(&delivery) {
                    Ok(message) => listener.on_message(message),
                    Err(e) => warn!(
                        consumer = %task_tag,
                        message_id = %delivery.message_id,
                        error = %e,
                        "Skipping delivery that could not be converted"
                    ),
                }
            }
            debug!(consumer = %task_tag, queue = %queue, "Listener loop closed");
        });

        info!(consumer = %tag, queue = %self.queue, "Listener container started");
        self.consumer_tag = Some(tag);
        self.task = Some(task);
        Ok(())
    }

    /// Cancel the consumer. Deliveries already handed over are still
    /// dispatched before the background task ends.
    pub fn stop(&mut self) -> Result<(), ClientError> {
        let Some(tag) = self.consumer_tag.take() else {
            return Ok(());
        };
        self.task = None;

        match broker::lock(&self.broker)?.cancel_consumer(&tag) {
            // the broker already evicted it after its channel closed
            Ok(()) | Err(BrokerError::ConsumerNotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        info!(consumer = %tag, queue = %self.queue, "Listener container stopped");
        Ok(())
    }

    /// Stop and wait for the background task to drain.
    pub async fn shutdown(&mut self) -> Result<(), ClientError> {
        let task = self.task.take();
        self.stop()?;
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(queue = %self.queue, error = %e, "Listener task ended abnormally");
            }
        }
        Ok(())
    }
}

impl Drop for ListenerContainer {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(queue = %self.queue, error = %e, "Failed to stop listener container");
        }
    }
}
