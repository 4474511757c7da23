// ABOUTME: Middleware chain run around every bus dispatch
// ABOUTME: Each layer sees the request and decides whether to call the next
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Bus Middleware
//!
//! Middleware wraps dispatch: each layer receives the request and a `next`
//! continuation, and may inspect or mutate the request, short-circuit with
//! its own response, or post-process the response coming back. Layers run in
//! registration order, outermost first.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::bus::request::{ExecutionRequest, ExecutionResponse};

/// Continuation invoking the rest of the chain
pub type Next<'a> = Box<dyn FnOnce(ExecutionRequest) -> BoxFuture<'a, ExecutionResponse> + Send + 'a>;

/// One layer in the dispatch chain.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process a request, calling `next` to continue the chain
    async fn handle(&self, request: ExecutionRequest, next: Next<'_>) -> ExecutionResponse;
}

/// Middleware logging every dispatch through `tracing`.
///
/// Failures are logged at `warn`, successes at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

#[async_trait]
impl Middleware for TracingMiddleware {
    async fn handle(&self, request: ExecutionRequest, next: Next<'_>) -> ExecutionResponse {
        let request_id = request.request_id.clone();
        let agent_id = request.agent_id.clone();
        let subject = request
            .parsed_command
            .as_ref()
            .map(|p| p.command.clone())
            .or_else(|| request.tool_name.clone())
            .unwrap_or_default();

        let response = next(request).await;

        if response.success {
            debug!(
                request_id = %request_id,
                agent_id = %agent_id,
                subject = %subject,
                elapsed_ms = response.execution_time_ms,
                "dispatch complete"
            );
        } else {
            warn!(
                request_id = %request_id,
                agent_id = %agent_id,
                subject = %subject,
                error = response.error.as_deref().unwrap_or(""),
                "dispatch failed"
            );
        }

        response
    }
}
