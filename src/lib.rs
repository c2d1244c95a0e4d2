//! bookwire - integration harness for the book service WebSocket API
//!
//! Drives a running book service over a single WebSocket conversation,
//! issuing JSON commands and validating each response before moving on.

pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod mock;
pub mod scenario;
pub mod wire;

// Re-export commonly used types for tests
pub use common::{Error, FaultKind, Result};
pub use wire::{Book, BookClient, Command, Response};
