// ABOUTME: Text command surface: grammar catalog, parser, and heredoc assembly
// ABOUTME: Unified entry point for everything that understands /command syntax
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Text Command Surface
//!
//! Any line beginning with `/` in free-form model output is command input.
//! This module owns the pieces that understand that surface:
//!
//! - [`grammar`] — the immutable catalog of recognized commands
//! - [`parser`] — extraction and parsing of embedded commands
//! - [`heredoc`] — multi-line content assembly (`/cmd <<DELIM ... DELIM`)

/// Command grammar catalog
pub mod grammar;
/// Heredoc-style multi-line command assembly
pub mod heredoc;
/// Text command parser
pub mod parser;

pub use grammar::{CommandDefinition, CommandGrammar, FlagType};
pub use heredoc::HeredocAssembler;
pub use parser::CommandParser;
