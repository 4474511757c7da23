// ABOUTME: Execution request and response envelopes carried through the bus
// ABOUTME: One request shape covers both text commands and structured tool calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Request and Response Envelopes
//!
//! Every invocation, whether it arrived as a `/command` line or a structured
//! tool call, travels through the bus as an [`ExecutionRequest`] and comes
//! back as an [`ExecutionResponse`]. The request records which surface it
//! entered through so middleware and history consumers can tell them apart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tools::ToolExecution;
use crate::types::{CommandResult, ParsedCommand};

/// Which surface a request entered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// A `/command` text line
    TextCommand,
    /// A structured tool call
    ToolCall,
}

/// One invocation travelling through the bus.
///
/// Exactly one of the two payload pairs is populated, matching `kind`:
/// text requests carry `raw_text` and `parsed_command`, tool requests carry
/// `tool_name` and `tool_args`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Unique request identifier
    pub request_id: String,
    /// Which surface the request entered through
    pub kind: RequestKind,
    /// Agent that issued the request
    pub agent_id: String,
    /// Original command text, for text requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Parsed command, for text requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_command: Option<ParsedCommand>,
    /// Tool name, for tool requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Tool arguments, for tool requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_args: Option<Map<String, Value>>,
    /// When the request entered the bus
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied context metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl ExecutionRequest {
    /// Create a text-command request
    #[must_use]
    pub fn text(
        request_id: impl Into<String>,
        agent_id: impl Into<String>,
        raw_text: impl Into<String>,
        parsed_command: ParsedCommand,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            kind: RequestKind::TextCommand,
            agent_id: agent_id.into(),
            raw_text: Some(raw_text.into()),
            parsed_command: Some(parsed_command),
            tool_name: None,
            tool_args: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Create a tool-call request
    #[must_use]
    pub fn tool(
        request_id: impl Into<String>,
        agent_id: impl Into<String>,
        tool_name: impl Into<String>,
        tool_args: Map<String, Value>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            kind: RequestKind::ToolCall,
            agent_id: agent_id.into(),
            raw_text: None,
            parsed_command: None,
            tool_name: Some(tool_name.into()),
            tool_args: Some(tool_args),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Attach caller context metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Outcome of one bus dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResponse {
    /// Identifier of the request this answers
    pub request_id: String,
    /// Whether dispatch and handling succeeded
    pub success: bool,
    /// Result payload on success
    pub result: Value,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// End-to-end time in milliseconds, middleware included
    pub execution_time_ms: f64,
    /// Dispatch metadata (command name, handler, tool name)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl ExecutionResponse {
    /// Create a successful response
    #[must_use]
    pub fn success(request_id: impl Into<String>, result: Value) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            result,
            error: None,
            execution_time_ms: 0.0,
            metadata: HashMap::new(),
        }
    }

    /// Create a failure response
    #[must_use]
    pub fn failure(request_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            result: Value::Null,
            error: Some(error.into()),
            execution_time_ms: 0.0,
            metadata: HashMap::new(),
        }
    }

    /// Attach one metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// View the response as a command result
    #[must_use]
    pub fn to_command_result(&self, command: impl Into<String>) -> CommandResult {
        CommandResult {
            command: command.into(),
            success: self.success,
            output: self.result.clone(),
            error: self.error.clone(),
            execution_time_ms: self.execution_time_ms,
            metadata: self.metadata.clone(),
        }
    }

    /// View the response as a tool execution result
    #[must_use]
    pub fn to_tool_result(&self, tool_name: impl Into<String>) -> ToolExecution {
        let mut execution = if self.success {
            ToolExecution::ok(tool_name, self.result.clone(), self.execution_time_ms)
        } else {
            ToolExecution::fail(
                tool_name,
                self.error.clone().unwrap_or_default(),
                self.execution_time_ms,
            )
        };
        execution.metadata = self.metadata.clone();
        execution
    }
}
