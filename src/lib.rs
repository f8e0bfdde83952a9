//! # TopicSub
//!
//! `topicsub` demonstrates publish/subscribe over a topic exchange: it declares
//! a queue, a topic exchange and a binding, publishes one message and consumes
//! it through a registered listener, signalling receipt through a one-shot
//! latch.
//!
//! ## Core Modules
//!
//! - `broker`: In-process broker that routes deliveries from exchanges to queues and consumers.
//! - `client`: Publishing template, message conversion and the listener container.
//! - `topology`: Queue, exchange and binding declarations plus topic-pattern matching.
//! - `app`: The message type, the receiver, the runner and the composed `Application`.
//! - `config`: Loads settings from an optional file and the environment.
//! - `utils`: Error types, logging setup and the count-down latch.

pub mod app;
pub mod broker;
pub mod client;
pub mod config;
pub mod topology;
pub mod utils;
