// ABOUTME: Tool schema catalog and wire-format transforms for tool-using LLMs
// ABOUTME: Renders one capability catalog into function-call or tool-use conventions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Tool Schemas
//!
//! Each [`ToolSchema`] describes one tool: name, description, a JSON-schema
//! parameter map, and the required-parameter set. Schemas transform into
//! either supported wire convention:
//!
//! - **Function-call style** (`WireFormat::OpenAi`):
//!   `{"type":"function","function":{"name",...,"parameters":{...}}}`
//! - **Tool-use style** (`WireFormat::Anthropic`):
//!   `{"name",...,"input_schema":{...}}`
//!
//! The built-in catalog mirrors the command grammar: tool parameter sets
//! correspond to command flag sets, so both entry conventions expose one
//! capability surface.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::errors::AdapterError;
use crate::tools::adapter::ToolHandler;

/// The two supported tool wire conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Function-call style (`{"type":"function","function":{...}}`)
    OpenAi,
    /// Tool-use style (`{"name":...,"input_schema":{...}}`)
    Anthropic,
}

impl FromStr for WireFormat {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(AdapterError::UnsupportedFormat {
                format: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Schema for a tool that can be exposed to LLMs.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Unique tool name within the adapter's catalog
    pub name: String,
    /// Human-readable description for LLM consumption
    pub description: String,
    /// Parameter name to JSON-schema type descriptor
    pub parameters: Map<String, Value>,
    /// Names of required parameters
    pub required: Vec<String>,
    /// Handler bound to the schema itself; adapter-level registrations
    /// take precedence over it
    pub handler: Option<ToolHandler>,
}

impl ToolSchema {
    /// Create a schema with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Map::new(),
            required: Vec::new(),
            handler: None,
        }
    }

    /// Add a parameter descriptor
    #[must_use]
    pub fn parameter(mut self, name: &str, descriptor: Value) -> Self {
        self.parameters.insert(name.to_owned(), descriptor);
        self
    }

    /// Mark a parameter as required
    #[must_use]
    pub fn require(mut self, name: &str) -> Self {
        self.required.push(name.to_owned());
        self
    }

    /// Bind a handler to the schema
    #[must_use]
    pub fn with_handler(mut self, handler: ToolHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Convert to the function-call wire shape
    #[must_use]
    pub fn to_openai_format(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": self.parameters,
                    "required": self.required,
                }
            }
        })
    }

    /// Convert to the tool-use wire shape
    #[must_use]
    pub fn to_anthropic_format(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "input_schema": {
                "type": "object",
                "properties": self.parameters,
                "required": self.required,
            }
        })
    }

    /// Convert to the chosen wire convention
    #[must_use]
    pub fn to_wire(&self, format: WireFormat) -> Value {
        match format {
            WireFormat::OpenAi => self.to_openai_format(),
            WireFormat::Anthropic => self.to_anthropic_format(),
        }
    }
}

/// Build the core harness tool catalog.
///
/// These tools map one-to-one onto the command system: subcommand-style
/// commands take an `action` parameter, flag sets mirror command flags.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_tool_catalog() -> Vec<ToolSchema> {
    vec![
        // Shell & files
        ToolSchema::new("harness_shell", "Execute a shell command in the sandbox")
            .parameter(
                "command",
                json!({"type": "string", "description": "The shell command to execute"}),
            )
            .parameter(
                "timeout",
                json!({"type": "integer", "description": "Timeout in seconds (default: 30)"}),
            )
            .require("command"),
        ToolSchema::new("harness_read", "Read a file or directory listing")
            .parameter(
                "path",
                json!({"type": "string", "description": "Path to file or directory"}),
            )
            .parameter(
                "lines",
                json!({"type": "integer", "description": "Maximum lines to read"}),
            )
            .parameter(
                "offset",
                json!({"type": "integer", "description": "Line offset to start from"}),
            )
            .require("path"),
        ToolSchema::new("harness_write", "Write content to a file")
            .parameter("path", json!({"type": "string", "description": "Path to file"}))
            .parameter(
                "content",
                json!({"type": "string", "description": "Content to write"}),
            )
            .parameter(
                "append",
                json!({"type": "boolean", "description": "Append instead of overwrite"}),
            )
            .require("path")
            .require("content"),
        ToolSchema::new("harness_edit", "Edit a file by replacing text")
            .parameter("path", json!({"type": "string", "description": "Path to file"}))
            .parameter(
                "old_text",
                json!({"type": "string", "description": "Text to find and replace"}),
            )
            .parameter(
                "new_text",
                json!({"type": "string", "description": "Replacement text"}),
            )
            .parameter(
                "replace_all",
                json!({"type": "boolean", "description": "Replace all occurrences"}),
            )
            .require("path")
            .require("old_text")
            .require("new_text"),
        ToolSchema::new("harness_search", "Search for files or content")
            .parameter(
                "pattern",
                json!({"type": "string", "description": "Search pattern (regex or glob)"}),
            )
            .parameter(
                "path",
                json!({"type": "string", "description": "Path to search in"}),
            )
            .parameter(
                "file_type",
                json!({"type": "string", "description": "Filter by file type"}),
            )
            .parameter(
                "limit",
                json!({"type": "integer", "description": "Maximum results"}),
            )
            .require("pattern"),
        // Sandbox management
        ToolSchema::new("harness_sandbox", "Manage sandbox environments")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["list", "create", "switch", "share", "delete", "env", "state"],
                    "description": "Action to perform"
                }),
            )
            .parameter("name", json!({"type": "string", "description": "Sandbox name"}))
            .parameter(
                "agents",
                json!({
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Agent IDs for sharing"
                }),
            )
            .parameter(
                "sandbox_type",
                json!({
                    "type": "string",
                    "enum": ["personal", "shared", "ephemeral"],
                    "description": "Type of sandbox to create"
                }),
            )
            .parameter(
                "key",
                json!({"type": "string", "description": "Environment or state key"}),
            )
            .parameter(
                "value",
                json!({"type": "string", "description": "Environment or state value"}),
            )
            .require("action"),
        // Skills
        ToolSchema::new("harness_skill", "Work with skills")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["list", "info", "invoke", "install", "create", "remove"],
                    "description": "Action to perform"
                }),
            )
            .parameter("name", json!({"type": "string", "description": "Skill name"}))
            .parameter(
                "args",
                json!({"type": "object", "description": "Arguments for skill invocation"}),
            )
            .parameter(
                "category",
                json!({"type": "string", "description": "Filter by category"}),
            )
            .require("action"),
        // Agent communication
        ToolSchema::new("harness_agent", "Communicate with other agents")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["list", "message", "broadcast", "query", "subscribe", "unsubscribe"],
                    "description": "Action to perform"
                }),
            )
            .parameter(
                "target",
                json!({"type": "string", "description": "Target agent ID"}),
            )
            .parameter(
                "content",
                json!({"type": "string", "description": "Message content"}),
            )
            .parameter(
                "pattern",
                json!({"type": "string", "description": "Subscription pattern"}),
            )
            .parameter(
                "timeout",
                json!({"type": "integer", "description": "Query timeout in seconds"}),
            )
            .require("action"),
        // Evaluation
        ToolSchema::new("harness_eval", "Self-evaluation and improvement")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["start", "record", "assess", "gaps", "improve", "report", "status", "history"],
                    "description": "Action to perform"
                }),
            )
            .parameter(
                "task",
                json!({"type": "string", "description": "Task description to record"}),
            )
            .parameter(
                "eval_type",
                json!({
                    "type": "string",
                    "enum": ["task", "session", "periodic"],
                    "description": "Type of evaluation cycle"
                }),
            )
            .parameter(
                "format",
                json!({
                    "type": "string",
                    "enum": ["text", "json", "markdown"],
                    "description": "Report format"
                }),
            )
            .require("action"),
        // Q&A
        ToolSchema::new("harness_qa", "Question and answer system for learning")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["generate", "pending", "answer", "review", "learn", "export"],
                    "description": "Action to perform"
                }),
            )
            .parameter(
                "topic",
                json!({"type": "string", "description": "Topic for question generation"}),
            )
            .parameter(
                "question_id",
                json!({"type": "string", "description": "Question ID for answer/review"}),
            )
            .parameter(
                "answer",
                json!({"type": "string", "description": "Answer to submit"}),
            )
            .parameter(
                "count",
                json!({"type": "integer", "description": "Number of questions to generate"}),
            )
            .require("action"),
        // Marketplace
        ToolSchema::new("harness_market", "Marketplace for skills, agents, and resources")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["search", "info", "install", "publish", "rate", "my"],
                    "description": "Action to perform"
                }),
            )
            .parameter("query", json!({"type": "string", "description": "Search query"}))
            .parameter(
                "entry_id",
                json!({"type": "string", "description": "Marketplace entry ID"}),
            )
            .parameter(
                "path",
                json!({"type": "string", "description": "Path for publishing"}),
            )
            .parameter(
                "rating",
                json!({"type": "integer", "description": "Rating (1-5)"}),
            )
            .parameter(
                "review",
                json!({"type": "string", "description": "Review text"}),
            )
            .parameter(
                "entry_type",
                json!({
                    "type": "string",
                    "enum": ["skill", "agent", "template", "dataset", "model"],
                    "description": "Filter by type"
                }),
            )
            .require("action"),
        // Meta
        ToolSchema::new("harness_status", "Get harness and agent status").parameter(
            "include",
            json!({
                "type": "array",
                "items": {"type": "string"},
                "description": "What to include: sandbox, skills, agents, eval, qa"
            }),
        ),
        ToolSchema::new("harness_config", "Get or set configuration")
            .parameter(
                "action",
                json!({
                    "type": "string",
                    "enum": ["get", "set", "list"],
                    "description": "Action to perform"
                }),
            )
            .parameter("key", json!({"type": "string", "description": "Config key"}))
            .parameter("value", json!({"type": "string", "description": "Config value"}))
            .require("action"),
    ]
}
