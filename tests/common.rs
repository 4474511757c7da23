// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup and reusable command handler fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org
#![allow(dead_code, clippy::unwrap_used, clippy::must_use_candidate)]

//! Shared test utilities for `command_harness`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use serde_json::{json, Value};

use command_harness::{
    CommandHandler, HandlerContext, HandlerError, HandlerResult, ParsedCommand,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Handler echoing back what it received, recording every invocation.
pub struct EchoHandler {
    name: String,
    invocations: Mutex<Vec<ParsedCommand>>,
}

impl EchoHandler {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            invocations: Mutex::new(Vec::new()),
        })
    }

    /// Every parsed command this handler has seen
    pub fn invocations(&self) -> Vec<ParsedCommand> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandHandler for EchoHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(
        &self,
        parsed: &ParsedCommand,
        context: &HandlerContext,
    ) -> HandlerResult<Value> {
        self.invocations.lock().unwrap().push(parsed.clone());
        Ok(json!({
            "command": parsed.command,
            "subcommand": parsed.subcommand,
            "args": parsed.args,
            "agent_id": context.agent_id,
            "source": context.source.as_str(),
        }))
    }
}

/// Handler that always fails with the given message.
pub struct FailingHandler {
    name: String,
    message: String,
}

impl FailingHandler {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            message: message.into(),
        })
    }
}

#[async_trait]
impl CommandHandler for FailingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(
        &self,
        _parsed: &ParsedCommand,
        _context: &HandlerContext,
    ) -> HandlerResult<Value> {
        Err(HandlerError::failed(self.message.clone()))
    }
}
