// ABOUTME: Result type for tool execution with timing and structured failure
// ABOUTME: Bridges handler outcomes to the tool-oriented response shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Tool Execution Results

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Outcome of one tool execution.
///
/// Success or failure, elapsed wall-clock time is always recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecution {
    /// Name of the executed tool
    pub tool_name: String,
    /// Whether execution succeeded
    pub success: bool,
    /// Result payload on success
    pub result: Value,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: f64,
    /// Dispatch metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl ToolExecution {
    /// Create a successful execution result
    #[must_use]
    pub fn ok(tool_name: impl Into<String>, result: Value, execution_time_ms: f64) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            result,
            error: None,
            execution_time_ms,
            metadata: HashMap::new(),
        }
    }

    /// Create a failed execution result
    #[must_use]
    pub fn fail(
        tool_name: impl Into<String>,
        error: impl Into<String>,
        execution_time_ms: f64,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            result: Value::Null,
            error: Some(error.into()),
            execution_time_ms,
            metadata: HashMap::new(),
        }
    }

    /// Format for a tool-using LLM reply turn
    #[must_use]
    pub fn to_tool_response(&self) -> Value {
        json!({
            "tool": self.tool_name,
            "success": self.success,
            "result": self.result,
            "error": self.error,
        })
    }
}
