//! Error types shared across the broker, the client layer and the application.
//!
//! Broker errors mirror the channel-level failures an AMQP broker reports
//! (unknown entity, conflicting redeclaration). Client and application errors
//! wrap them so `?` carries a failure from the broker all the way to `main`.

use config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("no exchange '{name}'")]
    ExchangeNotFound { name: String },

    #[error("no queue '{name}'")]
    QueueNotFound { name: String },

    #[error("no consumer with tag '{tag}'")]
    ConsumerNotFound { tag: String },

    #[error("queue '{name}' already declared with durable={existing}")]
    PreconditionFailed { name: String, existing: bool },

    #[error("broker state lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("message conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),

    #[error("unsupported content type '{content_type}'")]
    UnsupportedContentType { content_type: String },

    #[error("listener container for queue '{queue}' is already running")]
    AlreadyRunning { queue: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("routing key '{routing_key}' does not match binding pattern '{pattern}'")]
    UnroutableKey { routing_key: String, pattern: String },
}

/// Result type for application-level operations
pub type AppResult<T> = Result<T, AppError>;
