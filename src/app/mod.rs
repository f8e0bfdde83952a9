//! The demonstration application
//!
//! `Application::bootstrap` wires everything explicitly: it builds the broker,
//! declares the topology, starts a listener container that feeds the
//! `Receiver`, and hands a `Template` to the `Runner`. `run` then performs the
//! single publish/consume round trip.

pub mod message;
pub mod receiver;
pub mod runner;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::broker::{self, Broker, SharedBroker};
use crate::client::{ListenerContainer, Template};
use crate::config::Settings;
use crate::topology::Topology;
use crate::utils::error::AppError;

pub use message::{CustomMessage, CustomMessageBuilder};
pub use receiver::{Receiver, ReceiverState};
pub use runner::{RunOutcome, Runner, demo_message};

#[derive(Debug)]
pub struct Application {
    broker: SharedBroker,
    topology: Topology,
    receiver: Arc<Receiver>,
    container: ListenerContainer,
    runner: Runner,
}

impl Application {
    /// Compose the application from settings. Must run inside a tokio runtime.
    pub fn bootstrap(settings: &Settings) -> Result<Self, AppError> {
        let topology = Topology::from_settings(&settings.topology)?;

        let broker = broker::shared(Broker::new());
        broker::lock(&broker)?.declare(&topology)?;

        let receiver = Arc::new(Receiver::new());
        let mut container = ListenerContainer::new(broker.clone(), topology.queue.name.clone());
        container.start(receiver.clone())?;

        let runner = Runner::new(
            Template::new(broker.clone()),
            receiver.clone(),
            topology.clone(),
            Duration::from_millis(settings.runner.wait_timeout_ms),
        );

        info!(
            queue = %topology.queue.name,
            exchange = %topology.exchange.name,
            pattern = %topology.binding.pattern,
            "Application started"
        );

        Ok(Self {
            broker,
            topology,
            receiver,
            container,
            runner,
        })
    }

    pub async fn run(&self) -> Result<RunOutcome, AppError> {
        self.runner.run().await
    }

    /// Stop consuming and let in-flight deliveries drain.
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        self.container.shutdown().await?;
        info!("Application stopped");
        Ok(())
    }

    pub fn broker(&self) -> &SharedBroker {
        &self.broker
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn receiver(&self) -> &Arc<Receiver> {
        &self.receiver
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }
}
