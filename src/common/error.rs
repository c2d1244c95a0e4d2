//! Error types for the harness
//!
//! Every failure is terminal for a run. Instead of distinguishing faults by
//! catch-all handling, each error maps to one of three [`FaultKind`]s so the
//! harness can report a precise cause before exiting non-zero.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes a run can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The channel could not be opened, closed early, or a wait expired.
    Connectivity,
    /// A response did not match what the step expected.
    Contract,
    /// Anything else: send/receive/parse faults, IO, bad inputs.
    Other,
}

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Connectivity ===
    #[error("Could not connect to {url}: {reason}. Is the server running?")]
    ServerUnreachable { url: String, reason: String },

    #[error("Connection closed before the conversation finished. Is the server still running?")]
    ConnectionClosed,

    #[error("No response within {0} seconds")]
    ResponseTimeout(u64),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    // === Contract violations ===
    #[error("Step '{step}' expected {expected}, got {actual}")]
    UnexpectedOutcome {
        step: String,
        expected: String,
        actual: String,
    },

    #[error("Step '{step}': {field} expected '{expected}', got '{actual}'")]
    FieldMismatch {
        step: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Step '{step}': response carried no usable {what}")]
    MissingData { step: String, what: String },

    // === Command errors ===
    #[error("Server returned an error for '{action}': {message}")]
    ServerError { action: String, message: String },

    // === Configuration / scenario errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Test scenario failed: {0}")]
    ScenarioFailed(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error into one of the three fault kinds.
    pub fn kind(&self) -> FaultKind {
        match self {
            Error::ServerUnreachable { .. }
            | Error::ConnectionClosed
            | Error::ResponseTimeout(_)
            | Error::WebSocket(_) => FaultKind::Connectivity,
            Error::UnexpectedOutcome { .. }
            | Error::FieldMismatch { .. }
            | Error::MissingData { .. } => FaultKind::Contract,
            _ => FaultKind::Other,
        }
    }

    /// Create an outcome mismatch error for a step
    pub fn unexpected_outcome(step: &str, expected: &str, actual: &str) -> Self {
        Self::UnexpectedOutcome {
            step: step.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a field mismatch error for a step
    pub fn field_mismatch(step: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::FieldMismatch {
            step: step.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a missing-data error for a step
    pub fn missing_data(step: &str, what: &str) -> Self {
        Self::MissingData {
            step: step.to_string(),
            what: what.to_string(),
        }
    }

    /// Create a server error for a one-shot command
    pub fn server_error(action: &str, message: Option<String>) -> Self {
        Self::ServerError {
            action: action.to_string(),
            message: message.unwrap_or_else(|| "no detail given".to_string()),
        }
    }
}
