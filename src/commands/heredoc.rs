// ABOUTME: Heredoc-style assembly of commands whose content spans multiple lines
// ABOUTME: Accumulates lines between /cmd <<DELIM and DELIM into one --content flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Heredoc Assembly
//!
//! Some commands (like `/write`) carry content spanning multiple lines.
//! The assembler accumulates lines between a `/cmd ... <<DELIM` marker and a
//! terminating line equal to `DELIM`, then synthesizes a single command with
//! the joined content inserted as a `--content '...'` flag:
//!
//! ```text
//! /write notes.txt <<EOF
//! first line
//! second line
//! EOF
//! ```
//!
//! becomes `/write notes.txt --content 'first line\nsecond line'`.
//!
//! This is an optional pre-processing stage ahead of
//! [`CommandParser::parse_all`](crate::commands::CommandParser::parse_all);
//! the bus itself does not depend on it.

/// Delimiter used when the `<<` marker names none
const DEFAULT_DELIMITER: &str = "EOF";

/// Stateful helper assembling commands with multi-line content.
#[derive(Debug, Default)]
pub struct HeredocAssembler {
    buffer: Vec<String>,
    prefix: String,
    delimiter: String,
    active: bool,
}

impl HeredocAssembler {
    /// Create an idle assembler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the assembler is currently inside a heredoc
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Feed one line into the assembler.
    ///
    /// Returns the complete command string when one is finished: either the
    /// line itself for a plain single-line command, or the synthesized
    /// command once the heredoc terminator is reached. Returns `None` while
    /// accumulating or for non-command lines.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if !self.active {
            let stripped = line.trim();
            if !stripped.starts_with('/') {
                return None;
            }

            if let Some(marker) = stripped.find("<<") {
                self.prefix = stripped[..marker].trim_end().to_owned();
                let delimiter = stripped[marker + 2..]
                    .trim()
                    .trim_matches(|c| c == '\'' || c == '"');
                self.delimiter = if delimiter.is_empty() {
                    DEFAULT_DELIMITER.to_owned()
                } else {
                    delimiter.to_owned()
                };
                self.active = true;
                self.buffer.clear();
                return None;
            }

            return Some(stripped.to_owned());
        }

        if line.trim() == self.delimiter {
            let content = self.buffer.join("\n");
            // POSIX single-quote escaping so the synthesized command
            // re-tokenizes as one flag value
            let escaped = content.replace('\'', "'\\''");
            let command = format!("{} --content '{escaped}'", self.prefix);
            self.active = false;
            self.buffer.clear();
            return Some(command);
        }

        self.buffer.push(line.to_owned());
        None
    }

    /// Discard any in-progress heredoc and return to idle
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.prefix.clear();
        self.active = false;
    }
}
