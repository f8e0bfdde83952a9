use serde::Deserialize;

use crate::topology::{BINDING_PATTERN, EXCHANGE_NAME, QUEUE_NAME, ROUTING_KEY};

/// Top-level configuration settings for the application.
///
/// Includes the messaging topology, the runner's wait bound and logging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub topology: TopologySettings,
    pub runner: RunnerSettings,
    pub logging: LoggingSettings,
}

/// Names of the queue, exchange and binding, plus the key the runner
/// publishes under.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TopologySettings {
    pub queue_name: String,
    pub queue_durable: bool,
    pub exchange_name: String,
    pub binding_pattern: String,
    pub routing_key: String,
}

/// How long the runner waits for the receiver to confirm delivery.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    pub wait_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub topology: Option<PartialTopologySettings>,
    pub runner: Option<PartialRunnerSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialTopologySettings {
    pub queue_name: Option<String>,
    pub queue_durable: Option<bool>,
    pub exchange_name: Option<String>,
    pub binding_pattern: Option<String>,
    pub routing_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRunnerSettings {
    pub wait_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            topology: TopologySettings {
                queue_name: QUEUE_NAME.to_string(),
                queue_durable: false,
                exchange_name: EXCHANGE_NAME.to_string(),
                binding_pattern: BINDING_PATTERN.to_string(),
                routing_key: ROUTING_KEY.to_string(),
            },
            runner: RunnerSettings {
                wait_timeout_ms: 10_000,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Fill every missing value from `defaults`.
    pub fn merge(self, defaults: Settings) -> Settings {
        let topology = self.topology;
        let topology = TopologySettings {
            queue_name: topology
                .as_ref()
                .and_then(|t| t.queue_name.clone())
                .unwrap_or(defaults.topology.queue_name),
            queue_durable: topology
                .as_ref()
                .and_then(|t| t.queue_durable)
                .unwrap_or(defaults.topology.queue_durable),
            exchange_name: topology
                .as_ref()
                .and_then(|t| t.exchange_name.clone())
                .unwrap_or(defaults.topology.exchange_name),
            binding_pattern: topology
                .as_ref()
                .and_then(|t| t.binding_pattern.clone())
                .unwrap_or(defaults.topology.binding_pattern),
            routing_key: topology
                .as_ref()
                .and_then(|t| t.routing_key.clone())
                .unwrap_or(defaults.topology.routing_key),
        };

        Settings {
            topology,
            runner: RunnerSettings {
                wait_timeout_ms: self
                    .runner
                    .and_then(|r| r.wait_timeout_ms)
                    .unwrap_or(defaults.runner.wait_timeout_ms),
            },
            logging: LoggingSettings {
                level: self
                    .logging
                    .and_then(|l| l.level)
                    .unwrap_or(defaults.logging.level),
            },
        }
    }
}
