// ABOUTME: Configuration for the command bus and tool adapter
// ABOUTME: Environment-first configuration with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Bus Configuration

use std::env;

use tracing::warn;

/// Default cap on retained execution history entries
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Conventional prefix for tool names synthesized from commands
pub const DEFAULT_TOOL_PREFIX: &str = "harness_";

/// Configuration for a [`crate::bus::CommandBus`] instance.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Maximum number of execution requests retained in history;
    /// oldest entries are evicted once the cap is exceeded
    pub max_history: usize,
    /// Prefix prepended to command names when registering adapter-side
    /// tool handlers (and stripped when routing tool calls back)
    pub tool_prefix: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            tool_prefix: DEFAULT_TOOL_PREFIX.to_owned(),
        }
    }
}

impl BusConfig {
    /// Build configuration from environment variables.
    ///
    /// Reads `HARNESS_MAX_HISTORY` and `HARNESS_TOOL_PREFIX`; unset or
    /// unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let max_history = env::var("HARNESS_MAX_HISTORY")
            .ok()
            .and_then(|raw| match raw.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!("Invalid HARNESS_MAX_HISTORY value '{raw}', using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_MAX_HISTORY);

        let tool_prefix =
            env::var("HARNESS_TOOL_PREFIX").unwrap_or_else(|_| DEFAULT_TOOL_PREFIX.to_owned());

        Self {
            max_history,
            tool_prefix,
        }
    }
}
