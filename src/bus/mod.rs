// ABOUTME: Unified command bus dispatching both text commands and tool calls
// ABOUTME: Owns the parser, adapter, handler registry, middleware chain, and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Unified Command Bus
//!
//! The bus is the single dispatch point for agent capability invocations.
//! Text output containing `/commands` and structured tool calls both land
//! here, are normalized into [`ExecutionRequest`]s, run through the
//! middleware chain, and are dispatched to the same registered
//! [`CommandHandler`]s. Every request is recorded in a bounded history
//! before dispatch, so failed invocations are visible too.
//!
//! Dispatch never raises for agent input: parse failures, unknown commands,
//! and handler errors all come back as failure [`ExecutionResponse`]s. The
//! only `Err` surface is [`CommandBus::execute_tool`], which rejects
//! malformed payloads from the embedding caller.

/// Command handler trait and execution context
pub mod handler;
/// Middleware chain
pub mod middleware;
/// Request and response envelopes
pub mod request;

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures_util::future::BoxFuture;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::commands::{CommandGrammar, CommandParser};
use crate::config::BusConfig;
use crate::errors::AdapterError;
use crate::tools::{ToolAdapter, ToolHandler, WireFormat};

pub use handler::{CallSource, CommandHandler, HandlerContext, SubcommandRouter};
pub use middleware::{Middleware, Next, TracingMiddleware};
pub use request::{ExecutionRequest, ExecutionResponse, RequestKind};

/// Unified dispatch point for text commands and tool calls.
pub struct CommandBus {
    grammar: Arc<CommandGrammar>,
    parser: CommandParser,
    adapter: ToolAdapter,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    history: Mutex<VecDeque<ExecutionRequest>>,
    config: BusConfig,
    request_seq: AtomicU64,
}

impl CommandBus {
    /// Create a bus with default configuration over the built-in catalog
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Create a bus with explicit configuration
    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        let grammar = Arc::new(CommandGrammar::default_catalog());
        Self {
            parser: CommandParser::new(Arc::clone(&grammar)),
            grammar,
            adapter: ToolAdapter::new(),
            handlers: HashMap::new(),
            middlewares: Vec::new(),
            history: Mutex::new(VecDeque::new()),
            config,
            request_seq: AtomicU64::new(0),
        }
    }

    /// The grammar commands are validated against
    #[must_use]
    pub fn grammar(&self) -> &CommandGrammar {
        &self.grammar
    }

    /// The text command parser
    #[must_use]
    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// The tool adapter
    #[must_use]
    pub fn adapter(&self) -> &ToolAdapter {
        &self.adapter
    }

    /// Mutable access to the tool adapter, for schema registration
    pub fn adapter_mut(&mut self) -> &mut ToolAdapter {
        &mut self.adapter
    }

    /// Bus configuration
    #[must_use]
    pub const fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Register (or replace) the handler for a command.
    ///
    /// The handler becomes reachable from both surfaces: the `/command` text
    /// form, and a mirrored tool named with the configured prefix
    /// (`harness_<command>` by default).
    pub fn register_handler(&mut self, handler: Arc<dyn CommandHandler>) {
        let command = handler.name().to_owned();
        if self
            .handlers
            .insert(command.clone(), Arc::clone(&handler))
            .is_some()
        {
            warn!("Replacing handler for command '{command}'");
        } else {
            debug!("Registered handler for command '{command}'");
        }

        let prefix = self.config.tool_prefix.clone();
        let tool_name = format!("{prefix}{command}");
        let delegate = Arc::clone(&handler);
        self.adapter.register_handler(
            &tool_name,
            ToolHandler::from_async(move |args| {
                let delegate = Arc::clone(&delegate);
                let command = command.clone();
                let prefix = prefix.clone();
                async move {
                    let mut parsed =
                        ToolAdapter::tool_to_command(&format!("{prefix}{command}"), args, &prefix);
                    parsed.command = command;
                    let context = HandlerContext::new("", CallSource::Tool);
                    delegate.execute(&parsed, &context).await
                }
            }),
        );
    }

    /// Append a middleware layer; layers run in registration order
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Execute every command embedded in a block of agent text.
    ///
    /// Commands run sequentially in encounter order; one response per
    /// extracted command, including invalid ones.
    pub async fn execute_text(
        &self,
        text: &str,
        agent_id: &str,
        context: Option<HashMap<String, Value>>,
    ) -> Vec<ExecutionResponse> {
        let metadata = context.unwrap_or_default();
        let handler_context =
            HandlerContext::new(agent_id, CallSource::Text).with_metadata(metadata.clone());

        let mut responses = Vec::new();
        for parsed in self.parser.parse_all(text) {
            let request =
                ExecutionRequest::text(self.next_request_id(), agent_id, parsed.raw.clone(), parsed)
                    .with_metadata(metadata.clone());
            responses.push(self.run(request, &handler_context).await);
        }
        responses
    }

    /// Execute a structured tool-call payload.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the payload does not match the wire
    /// format. Execution failures never surface here; they come back as
    /// failure responses.
    pub async fn execute_tool(
        &self,
        payload: &Value,
        format: WireFormat,
        agent_id: &str,
    ) -> Result<ExecutionResponse, AdapterError> {
        let (tool_name, args) = self.adapter.parse_tool_call(payload, format)?;
        Ok(self.execute_tool_args(&tool_name, args, agent_id, None).await)
    }

    /// Execute a tool call whose name and arguments are already parsed.
    pub async fn execute_tool_args(
        &self,
        tool_name: &str,
        args: Map<String, Value>,
        agent_id: &str,
        context: Option<HashMap<String, Value>>,
    ) -> ExecutionResponse {
        let metadata = context.unwrap_or_default();
        let handler_context =
            HandlerContext::new(agent_id, CallSource::Tool).with_metadata(metadata.clone());
        let request = ExecutionRequest::tool(self.next_request_id(), agent_id, tool_name, args)
            .with_metadata(metadata);
        self.run(request, &handler_context).await
    }

    /// Recent requests, newest last.
    ///
    /// Optionally filtered to one agent and truncated to the most recent
    /// `limit` entries.
    pub async fn history(
        &self,
        agent_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<ExecutionRequest> {
        let history = self.history.lock().await;
        let filtered: Vec<ExecutionRequest> = history
            .iter()
            .filter(|request| agent_id.map_or(true, |agent| request.agent_id == agent))
            .cloned()
            .collect();

        match limit {
            Some(limit) if limit < filtered.len() => filtered[filtered.len() - limit..].to_vec(),
            _ => filtered,
        }
    }

    /// Drop all recorded history
    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Every tool schema in the chosen wire convention
    #[must_use]
    pub fn tool_schemas(&self, format: WireFormat) -> Vec<Value> {
        self.adapter.all_tools(format)
    }

    /// Command listing for models driven through the text surface
    #[must_use]
    pub fn format_for_prompt(&self) -> String {
        self.parser.help(None)
    }

    /// Tool descriptions for models driven through the tool surface
    #[must_use]
    pub fn describe_tools(&self) -> String {
        self.adapter.describe_for_prompt()
    }

    async fn run(&self, request: ExecutionRequest, context: &HandlerContext) -> ExecutionResponse {
        let start = Instant::now();
        self.record_history(&request).await;

        let mut response = self.run_chain(0, request, context).await;
        // End-to-end time, middleware included
        response.execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        response
    }

    fn run_chain<'a>(
        &'a self,
        index: usize,
        request: ExecutionRequest,
        context: &'a HandlerContext,
    ) -> BoxFuture<'a, ExecutionResponse> {
        if index >= self.middlewares.len() {
            return Box::pin(self.dispatch_core(request, context));
        }

        let middleware = Arc::clone(&self.middlewares[index]);
        Box::pin(async move {
            let next: Next<'a> = Box::new(move |req| self.run_chain(index + 1, req, context));
            middleware.handle(request, next).await
        })
    }

    async fn dispatch_core(
        &self,
        request: ExecutionRequest,
        context: &HandlerContext,
    ) -> ExecutionResponse {
        match request.kind {
            RequestKind::TextCommand => self.dispatch_text(request, context).await,
            RequestKind::ToolCall => self.dispatch_tool(request, context).await,
        }
    }

    async fn dispatch_text(
        &self,
        request: ExecutionRequest,
        context: &HandlerContext,
    ) -> ExecutionResponse {
        let request_id = request.request_id;
        let Some(parsed) = request.parsed_command else {
            return ExecutionResponse::failure(request_id, "Text request carried no parsed command");
        };

        if !parsed.valid {
            let message = parsed
                .error
                .unwrap_or_else(|| "Invalid command".to_owned());
            return ExecutionResponse::failure(request_id, message)
                .with_metadata("command", json!(parsed.command));
        }

        // Registered handlers take precedence over built-ins
        if let Some(handler) = self.handlers.get(&parsed.command) {
            let response = match handler.execute(&parsed, context).await {
                Ok(result) => ExecutionResponse::success(request_id, result),
                Err(err) => ExecutionResponse::failure(request_id, err.to_string()),
            };
            return response
                .with_metadata("command", json!(parsed.command))
                .with_metadata("handler", json!(handler.name()));
        }

        if parsed.command == "help" {
            let text = self.parser.help(parsed.args.first().map(String::as_str));
            return ExecutionResponse::success(request_id, json!(text))
                .with_metadata("command", json!("help"));
        }

        ExecutionResponse::failure(request_id, format!("Unknown command: {}", parsed.command))
            .with_metadata("command", json!(parsed.command))
    }

    async fn dispatch_tool(
        &self,
        request: ExecutionRequest,
        context: &HandlerContext,
    ) -> ExecutionResponse {
        let request_id = request.request_id;
        let Some(tool_name) = request.tool_name else {
            return ExecutionResponse::failure(request_id, "Tool request carried no tool name");
        };
        let args = request.tool_args.unwrap_or_default();

        // Route through a registered command handler when one exists, so the
        // caller's agent context flows through; otherwise fall back to the
        // adapter's own handler table.
        let parsed = ToolAdapter::tool_to_command(&tool_name, args.clone(), &self.config.tool_prefix);
        if let Some(handler) = self.handlers.get(&parsed.command) {
            let response = match handler.execute(&parsed, context).await {
                Ok(result) => ExecutionResponse::success(request_id, result),
                Err(err) => ExecutionResponse::failure(request_id, err.to_string()),
            };
            return response
                .with_metadata("tool_name", json!(tool_name))
                .with_metadata("handler", json!(handler.name()));
        }

        let execution = self.adapter.execute(&tool_name, args).await;
        let response = if execution.success {
            ExecutionResponse::success(request_id, execution.result)
        } else {
            ExecutionResponse::failure(request_id, execution.error.unwrap_or_default())
        };
        response.with_metadata("tool_name", json!(tool_name))
    }

    async fn record_history(&self, request: &ExecutionRequest) {
        let mut history = self.history.lock().await;
        history.push_back(request.clone());
        while history.len() > self.config.max_history {
            history.pop_front();
        }
    }

    fn next_request_id(&self) -> String {
        let seq = self.request_seq.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("req-{nanos}-{seq}")
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}
