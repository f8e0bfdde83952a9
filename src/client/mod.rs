//! The `client` module is the application's side of the broker: the API it
//! uses to publish and to consume.
//!
//! - `Consumer`: a registration handed to the broker, holding the sending
//!   side of a per-consumer channel.
//! - `converter`: encodes application values into deliveries and back (JSON).
//! - `Template`: converts and publishes in one call.
//! - `ListenerContainer`: consumes a queue on a background task and dispatches
//!   decoded messages to a `MessageListener`.

pub mod consumer;
pub mod converter;
pub mod listener;
pub mod template;

pub use consumer::{Consumer, ConsumerTag};
pub use listener::{ListenerContainer, MessageListener};
pub use template::Template;
