// ABOUTME: Command handler trait, execution context, and subcommand routing
// ABOUTME: One handler registration serves both the text and tool surfaces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Command Handlers
//!
//! A [`CommandHandler`] implements one command. Registered once with the bus,
//! it is reachable from both surfaces: `/command` text lines and the
//! mirrored `harness_*` tool. The [`HandlerContext`] tells the handler who
//! is calling and through which surface.
//!
//! Commands with subcommands can either branch inside [`CommandHandler::handle`]
//! or compose a [`SubcommandRouter`] from per-subcommand handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{HandlerError, HandlerResult};
use crate::types::ParsedCommand;

/// Which surface an invocation came through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    /// Slash-command text line
    Text,
    /// Structured tool call
    Tool,
}

impl CallSource {
    /// Stable string form, used in metadata and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tool => "tool",
        }
    }
}

/// Execution context passed to handlers alongside the parsed command.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Agent that issued the invocation
    pub agent_id: String,
    /// Which surface the invocation came through
    pub source: CallSource,
    /// Caller-supplied context metadata
    pub metadata: HashMap<String, Value>,
}

impl HandlerContext {
    /// Create a context with empty metadata
    #[must_use]
    pub fn new(agent_id: impl Into<String>, source: CallSource) -> Self {
        Self {
            agent_id: agent_id.into(),
            source,
            metadata: HashMap::new(),
        }
    }

    /// Attach caller metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Implementation of one command, reachable from both surfaces.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name this handler serves (without the leading slash)
    fn name(&self) -> &str;

    /// Handle an invocation.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] on failure; the bus folds it into a failure
    /// response rather than propagating it.
    async fn handle(&self, parsed: &ParsedCommand, context: &HandlerContext)
        -> HandlerResult<Value>;

    /// Optional per-subcommand delegate lookup
    fn subhandler(&self, _subcommand: &str) -> Option<&dyn CommandHandler> {
        None
    }

    /// Dispatch entry point: routes to a subhandler when one exists,
    /// otherwise falls through to [`CommandHandler::handle`].
    async fn execute(
        &self,
        parsed: &ParsedCommand,
        context: &HandlerContext,
    ) -> HandlerResult<Value> {
        if let Some(subcommand) = parsed.subcommand.as_deref() {
            if let Some(delegate) = self.subhandler(subcommand) {
                return delegate.handle(parsed, context).await;
            }
        }
        self.handle(parsed, context).await
    }
}

/// Handler composed from per-subcommand delegates.
///
/// Routes on `parsed.subcommand`; invocations with no matching route go to
/// the fallback handler when one is set, and fail otherwise.
#[derive(Default)]
pub struct SubcommandRouter {
    name: String,
    routes: HashMap<String, Arc<dyn CommandHandler>>,
    fallback: Option<Arc<dyn CommandHandler>>,
}

impl SubcommandRouter {
    /// Create an empty router for a command
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: HashMap::new(),
            fallback: None,
        }
    }

    /// Add a subcommand route
    #[must_use]
    pub fn route(mut self, subcommand: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.routes.insert(subcommand.into(), handler);
        self
    }

    /// Set the handler for invocations without a matching route
    #[must_use]
    pub fn fallback(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.fallback = Some(handler);
        self
    }
}

#[async_trait]
impl CommandHandler for SubcommandRouter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(
        &self,
        parsed: &ParsedCommand,
        context: &HandlerContext,
    ) -> HandlerResult<Value> {
        if let Some(subcommand) = parsed.subcommand.as_deref() {
            if let Some(delegate) = self.routes.get(subcommand) {
                return delegate.handle(parsed, context).await;
            }
        }

        match &self.fallback {
            Some(delegate) => delegate.handle(parsed, context).await,
            None => Err(HandlerError::Unimplemented {
                command: match parsed.subcommand.as_deref() {
                    Some(sub) => format!("{} {sub}", self.name),
                    None => self.name.clone(),
                },
            }),
        }
    }
}
