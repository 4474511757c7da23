// ABOUTME: Main library entry point for the command harness dispatch layer
// ABOUTME: Exposes the text command parser, tool schema adapter, and unified command bus
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Command Harness
//!
//! A unified command and tool dispatch layer for LLM agent harnesses. A model
//! can interact with the execution environment two ways:
//!
//! - **Text commands**: `/`-prefixed instructions embedded in free-form model
//!   output, for models without native function calling
//! - **Tool calls**: structured function/tool invocations in either the
//!   function-call or tool-use wire convention
//!
//! Both entry points are normalized into one request/response lifecycle by the
//! [`bus::CommandBus`], which threads every request through a middleware chain,
//! routes it to a registered handler, and records bounded execution history.
//!
//! ## Architecture
//!
//! - **`commands`**: the command grammar catalog, the text command parser, and
//!   the heredoc assembler for multi-line content
//! - **`tools`**: tool schemas, wire-format transforms, and the tool adapter
//!   that executes registered handlers
//! - **`bus`**: the unified dispatcher tying both entry points together
//! - **`types`**, **`errors`**, **`config`**, **`logging`**: shared data
//!   model, error taxonomy, configuration, and observability setup
//!
//! ## Example
//!
//! ```rust,no_run
//! use command_harness::bus::CommandBus;
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus = CommandBus::new();
//!     let responses = bus.execute_text("/help", "agent-1", None).await;
//!     assert!(responses[0].success);
//! }
//! ```

/// Unified command bus: request/response envelopes, handlers, middleware
pub mod bus;

/// Command grammar, text command parser, and heredoc assembly
pub mod commands;

/// Bus configuration
pub mod config;

/// Error taxonomy for adapter misuse and handler failures
pub mod errors;

/// Structured logging setup built on `tracing`
pub mod logging;

/// Tool schemas, wire formats, and the tool adapter
pub mod tools;

/// Shared data model: flag values, parsed commands, command results
pub mod types;

pub use bus::{
    CallSource, CommandBus, CommandHandler, ExecutionRequest, ExecutionResponse, HandlerContext,
    Middleware, RequestKind, SubcommandRouter,
};
pub use commands::{CommandGrammar, CommandParser, HeredocAssembler};
pub use config::BusConfig;
pub use errors::{AdapterError, HandlerError, HandlerResult};
pub use tools::{ToolAdapter, ToolExecution, ToolHandler, ToolSchema, WireFormat};
pub use types::{CommandResult, FlagValue, ParsedCommand};
