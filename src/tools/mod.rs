// ABOUTME: Tool call surface: schemas, wire-format transforms, and the adapter
// ABOUTME: Unified entry point for structured tool invocation by tool-using LLMs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Tool Call Surface
//!
//! The structured counterpart to the text command surface. Tool-using models
//! see the same capability catalog as [tool schemas](schema::ToolSchema),
//! rendered into either of two wire conventions, and invoke them through the
//! [`adapter::ToolAdapter`].

/// Tool adapter: handler registry, call parsing, and execution
pub mod adapter;
/// Tool execution results
pub mod result;
/// Tool schemas and wire-format transforms
pub mod schema;

pub use adapter::{ToolAdapter, ToolHandler};
pub use result::ToolExecution;
pub use schema::{default_tool_catalog, ToolSchema, WireFormat};
