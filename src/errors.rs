// ABOUTME: Error taxonomy for the command harness dispatch layer
// ABOUTME: Separates caller misconfiguration (raised) from agent-triggered failures (folded)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Error Handling
//!
//! Two error families exist at this layer:
//!
//! - [`AdapterError`] — programming errors from a misconfigured embedding
//!   caller (unsupported wire format, malformed tool-call payload). These are
//!   the only errors allowed to surface as `Err` past the public API.
//! - [`HandlerError`] — failures raised by command/tool handlers. The bus and
//!   adapter always catch these and fold them into structured failure
//!   responses; they never propagate to the caller.
//!
//! Parse errors are not represented here at all: the parser communicates
//! failure through `ParsedCommand { valid: false, error: Some(..) }`.

use thiserror::Error;

/// Result alias for handler execution
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors indicating caller misconfiguration of the tool adapter.
///
/// Unlike agent input errors, these are appropriate to raise: they signal a
/// bug in the embedding code, not bad model output.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The requested wire format is not one of the supported conventions
    #[error("Unsupported wire format: {format}")]
    UnsupportedFormat {
        /// Format string that was requested
        format: String,
    },

    /// A tool-call payload did not match the expected wire shape
    #[error("Malformed tool call payload: {reason}")]
    MalformedCall {
        /// Reason why the payload could not be parsed
        reason: String,
    },

    /// Serialization failed while transforming a payload
    #[error("Serialization failed for {context}")]
    Serialization {
        /// Context where serialization failed
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by command or tool handlers during execution.
///
/// Handlers report failure with a descriptive message; the dispatch core
/// converts the message into a failure response and keeps running.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Generic handler failure with a descriptive message
    #[error("{message}")]
    Failed {
        /// Human-readable failure description
        message: String,
    },

    /// The handler declares no generic handling for this command
    #[error("Handler for '{command}' not implemented")]
    Unimplemented {
        /// Command that has no handling implementation
        command: String,
    },
}

impl HandlerError {
    /// Create a generic failure with the given message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed {
            message: err.to_string(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::Failed { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::Failed {
            message: message.to_owned(),
        }
    }
}
