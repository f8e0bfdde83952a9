//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `topicsub` application.
//!
//! It holds the crate-wide error types, logging setup and the count-down
//! latch used to signal message receipt.

pub mod error;
pub mod latch;
pub mod logging;
