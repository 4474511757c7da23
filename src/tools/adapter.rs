// ABOUTME: Adapter executing structured tool calls and bridging them to commands
// ABOUTME: Owns the schema catalog, handler registry, and wire-format parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Tool Adapter
//!
//! Handles tool calls from tool-using LLMs: parses incoming payloads in
//! either wire convention, executes registered handlers with timing and
//! per-call error capture, and maps tool calls into the equivalent command
//! shape so both entry conventions share handler logic.
//!
//! [`ToolAdapter::execute`] is total: unknown tools, missing handlers, and
//! handler failures all become failure results — the adapter never
//! propagates an error to its caller from execution. Only misconfiguration
//! (an unsupported wire format, a malformed payload) raises, via
//! [`AdapterError`].

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{AdapterError, HandlerResult};
use crate::tools::result::ToolExecution;
use crate::tools::schema::{default_tool_catalog, ToolSchema, WireFormat};
use crate::types::{FlagValue, ParsedCommand};

/// JSON object alias used for tool arguments
pub type ToolArgs = Map<String, Value>;

type HandlerFn = dyn Fn(ToolArgs) -> BoxFuture<'static, HandlerResult<Value>> + Send + Sync;

/// An asynchronous tool handler.
///
/// All handlers conform to one asynchronous contract; synchronous functions
/// are lifted at registration time via [`ToolHandler::from_sync_fn`] rather
/// than branched on at call time.
#[derive(Clone)]
pub struct ToolHandler(Arc<HandlerFn>);

impl ToolHandler {
    /// Wrap an async function as a tool handler
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        Self(Arc::new(move |args| Box::pin(f(args))))
    }

    /// Lift a synchronous function into the asynchronous handler contract
    pub fn from_sync_fn<F>(f: F) -> Self
    where
        F: Fn(ToolArgs) -> HandlerResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(move |args| {
            let result = f(args);
            Box::pin(async move { result })
        }))
    }

    /// Invoke the handler
    pub fn call(&self, args: ToolArgs) -> BoxFuture<'static, HandlerResult<Value>> {
        (self.0)(args)
    }
}

impl fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToolHandler(..)")
    }
}

/// Adapter that handles tool calls from LLMs and routes them to handlers.
#[derive(Debug, Default)]
pub struct ToolAdapter {
    schemas: HashMap<String, ToolSchema>,
    handlers: HashMap<String, ToolHandler>,
}

impl ToolAdapter {
    /// Create an adapter over the built-in harness tool catalog
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(default_tool_catalog())
    }

    /// Create an adapter over a custom schema catalog
    #[must_use]
    pub fn with_catalog(catalog: Vec<ToolSchema>) -> Self {
        let schemas = catalog
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();
        Self {
            schemas,
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) a handler for a tool
    pub fn register_handler(&mut self, tool_name: &str, handler: ToolHandler) {
        if self
            .handlers
            .insert(tool_name.to_owned(), handler)
            .is_some()
        {
            warn!("Replacing handler for tool '{tool_name}'");
        } else {
            debug!("Registered handler for tool '{tool_name}'");
        }
    }

    /// Register an additional tool schema
    pub fn register_schema(&mut self, schema: ToolSchema) {
        self.schemas.insert(schema.name.clone(), schema);
    }

    /// Look up a schema by tool name
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&ToolSchema> {
        self.schemas.get(name)
    }

    /// Whether a handler is registered for a tool
    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// All registered tool names, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render every registered schema in the chosen wire convention
    #[must_use]
    pub fn all_tools(&self, format: WireFormat) -> Vec<Value> {
        self.tool_names()
            .into_iter()
            .filter_map(|name| self.schemas.get(name))
            .map(|schema| schema.to_wire(format))
            .collect()
    }

    /// Parse a tool-call payload into `(tool_name, arguments)`.
    ///
    /// Function-call style reads the nested `function.name` and an
    /// `arguments` blob that may be JSON text or an already-structured
    /// object; tool-use style reads a flat `name` and `input` mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MalformedCall`] if the payload does not match
    /// the expected shape for the format, or if text arguments are not
    /// valid JSON.
    pub fn parse_tool_call(
        &self,
        payload: &Value,
        format: WireFormat,
    ) -> Result<(String, ToolArgs), AdapterError> {
        match format {
            WireFormat::OpenAi => {
                let function =
                    payload
                        .get("function")
                        .ok_or_else(|| AdapterError::MalformedCall {
                            reason: "missing 'function' object".into(),
                        })?;
                let name = function
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| AdapterError::MalformedCall {
                        reason: "missing function name".into(),
                    })?
                    .to_owned();

                let args = match function.get("arguments") {
                    None | Some(Value::Null) => Map::new(),
                    Some(Value::String(text)) => {
                        let decoded: Value = serde_json::from_str(text).map_err(|source| {
                            AdapterError::Serialization {
                                context: "tool call arguments",
                                source,
                            }
                        })?;
                        as_object(decoded)?
                    }
                    Some(other) => as_object(other.clone())?,
                };

                Ok((name, args))
            }
            WireFormat::Anthropic => {
                let name = payload
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| AdapterError::MalformedCall {
                        reason: "missing tool name".into(),
                    })?
                    .to_owned();

                let args = match payload.get("input") {
                    None | Some(Value::Null) => Map::new(),
                    Some(other) => as_object(other.clone())?,
                };

                Ok((name, args))
            }
        }
    }

    /// Execute a tool call.
    ///
    /// Total over its inputs: unknown tools, missing handlers, and handler
    /// failures are all captured as failure results with elapsed time.
    pub async fn execute(&self, tool_name: &str, arguments: ToolArgs) -> ToolExecution {
        let start = Instant::now();

        if !self.schemas.contains_key(tool_name) && !self.handlers.contains_key(tool_name) {
            return ToolExecution::fail(
                tool_name,
                format!("Unknown tool: {tool_name}"),
                elapsed_ms(start),
            );
        }

        // Adapter-level registrations shadow handlers bound on the schema
        let handler = self.handlers.get(tool_name).or_else(|| {
            self.schemas
                .get(tool_name)
                .and_then(|schema| schema.handler.as_ref())
        });
        let Some(handler) = handler else {
            return ToolExecution::fail(
                tool_name,
                format!("No handler for tool: {tool_name}"),
                elapsed_ms(start),
            );
        };

        match handler.call(arguments).await {
            Ok(result) => ToolExecution::ok(tool_name, result, elapsed_ms(start)),
            Err(err) => {
                debug!("Tool '{tool_name}' failed: {err}");
                ToolExecution::fail(tool_name, err.to_string(), elapsed_ms(start))
            }
        }
    }

    /// Convert a tool call into the equivalent command shape.
    ///
    /// Known `harness_*` tools map onto their command names; unmapped names
    /// have the conventional prefix stripped. An `action` argument becomes
    /// the subcommand; boolean-true arguments become boolean flags, other
    /// non-null arguments become value flags. The result is always valid.
    #[must_use]
    pub fn tool_to_command(tool_name: &str, arguments: ToolArgs, prefix: &str) -> ParsedCommand {
        let command = match tool_name {
            "harness_shell" => "cmd",
            "harness_read" => "read",
            "harness_write" => "write",
            "harness_edit" => "edit",
            "harness_search" => "search",
            "harness_sandbox" => "sandbox",
            "harness_skill" => "skill",
            "harness_agent" => "agent",
            "harness_eval" => "eval",
            "harness_qa" => "qa",
            "harness_market" => "market",
            "harness_status" => "status",
            "harness_config" => "config",
            other => other.strip_prefix(prefix).unwrap_or(other),
        }
        .to_owned();

        let mut rest = arguments;
        let subcommand = rest
            .remove("action")
            .and_then(|v| v.as_str().map(ToOwned::to_owned));

        let raw = format!(
            "/{command} {} {}",
            subcommand.as_deref().unwrap_or(""),
            Value::Object(rest.clone())
        );

        let mut flags = HashMap::new();
        for (key, value) in rest {
            match &value {
                // Boolean flags appear only when set
                Value::Bool(true) => {
                    flags.insert(key, FlagValue::Bool(true));
                }
                Value::Bool(false) | Value::Null => {}
                _ => {
                    if let Some(flag) = FlagValue::from_json(&value) {
                        flags.insert(key, flag);
                    }
                }
            }
        }

        ParsedCommand {
            raw,
            command,
            subcommand,
            args: Vec::new(),
            flags,
            valid: true,
            error: None,
        }
    }

    /// Human-readable descriptions of all tools, for system prompts.
    #[must_use]
    pub fn describe_for_prompt(&self) -> String {
        let mut lines = vec!["# Available Harness Tools\n".to_owned()];

        for name in self.tool_names() {
            let Some(schema) = self.schemas.get(name) else {
                continue;
            };
            lines.push(format!("## {name}"));
            lines.push(format!("{}\n", schema.description));
            lines.push("Parameters:".to_owned());
            for (param, descriptor) in &schema.parameters {
                let required = if schema.required.iter().any(|r| r == param) {
                    " (required)"
                } else {
                    ""
                };
                let description = descriptor
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                lines.push(format!("  - {param}: {description}{required}"));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn as_object(value: Value) -> Result<ToolArgs, AdapterError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AdapterError::MalformedCall {
            reason: format!("arguments must be a JSON object, got {other}"),
        }),
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
