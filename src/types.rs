// ABOUTME: Shared data model for the command harness dispatch layer
// ABOUTME: Defines flag values, parsed commands, and command-oriented result views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Core Types
//!
//! The data model shared by the parser, tool adapter, and command bus:
//!
//! - [`FlagValue`] — the four-kinded tagged union flag values coerce into
//! - [`ParsedCommand`] — the result of parsing one textual invocation
//! - [`CommandResult`] — the command-oriented view of an execution outcome

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed command flag value.
///
/// Flag values arrive as raw strings and are coerced through an explicit
/// ordered chain: boolean keywords first, then integer, then float, then the
/// raw string unchanged. There is no silent truncation between kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Boolean flag (`true`/`yes`/`1` or `false`/`no`/`0`, or a bare flag)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Raw string, preserved unchanged when nothing else matches
    Str(String),
}

impl FlagValue {
    /// Coerce a raw token into a typed flag value.
    ///
    /// Boolean keywords win over numeric parses, so `"1"` is `Bool(true)`,
    /// not `Int(1)`.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => return Self::Bool(true),
            "false" | "no" | "0" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Str(raw.to_owned())
    }

    /// Convert a JSON value into a flag value, if it fits the four kinds.
    ///
    /// Arrays and objects are carried as their JSON text; `null` has no
    /// flag representation.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Array(_) | Value::Object(_) => Some(Self::Str(value.to_string())),
        }
    }

    /// Render as a JSON value
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::Number((*n).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Str(s) => Value::String(s.clone()),
        }
    }

    /// Boolean accessor
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer accessor
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float accessor
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String accessor
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// A parsed text command.
///
/// Created fresh per parse call and consumed immediately by the bus. The
/// parser never raises for malformed input: all failure is communicated
/// through `valid == false` plus `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// The original raw text, including the leading `/`
    pub raw: String,
    /// Resolved command name; empty string when unparseable
    pub command: String,
    /// Resolved subcommand, when the grammar declares one and it matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<String>,
    /// Positional arguments in encountered order
    pub args: Vec<String>,
    /// Flag name to typed value
    pub flags: HashMap<String, FlagValue>,
    /// Whether the parse succeeded
    pub valid: bool,
    /// Human-readable parse error; present exactly when `valid` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedCommand {
    /// Construct a failed parse result carrying the error message
    #[must_use]
    pub fn invalid(
        raw: impl Into<String>,
        command: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            raw: raw.into(),
            command: command.into(),
            subcommand: None,
            args: Vec::new(),
            flags: HashMap::new(),
            valid: false,
            error: Some(error.into()),
        }
    }

    /// Look up a flag by name
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }
}

/// Result of executing a text command, for text-mode LLM turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// The command that was executed (raw form)
    pub command: String,
    /// Whether execution succeeded
    pub success: bool,
    /// Result payload on success
    pub output: Value,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: f64,
    /// Echoed dispatch metadata (command, serving handler)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl CommandResult {
    /// Format the result as plain text for non-tool LLMs.
    ///
    /// Strings pass through unchanged, structured values render as pretty
    /// JSON, and failures render as `ERROR: <message>`.
    #[must_use]
    pub fn as_text(&self) -> String {
        if self.success {
            match &self.output {
                Value::String(s) => s.clone(),
                Value::Array(_) | Value::Object(_) => {
                    serde_json::to_string_pretty(&self.output).unwrap_or_else(|_| "{}".into())
                }
                other => other.to_string(),
            }
        } else {
            format!(
                "ERROR: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}
