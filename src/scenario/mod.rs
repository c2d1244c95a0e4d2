//! YAML scenario runner
//!
//! Reads scenario files describing a conversation with the service and
//! executes them through the wire client, checking per-step expectations
//! against structured responses.

mod config;
mod runner;

pub use config::*;
pub use runner::{run_scenario, TestResult};
