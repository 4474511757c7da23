// ABOUTME: Integration tests for the unified command bus
// ABOUTME: Covers dual-surface dispatch, middleware ordering, and bounded history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! Unified Command Bus Tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use command_harness::bus::{
    ExecutionRequest, ExecutionResponse, Middleware, Next, RequestKind,
};
use command_harness::{BusConfig, CommandBus, WireFormat};
use common::{init_test_logging, EchoHandler, FailingHandler};

#[tokio::test]
async fn text_command_reaches_registered_handler() {
    init_test_logging();
    let mut bus = CommandBus::new();
    let handler = EchoHandler::new("read");
    bus.register_handler(handler.clone());

    let responses = bus
        .execute_text("/read src/main.rs --lines 10", "agent-1", None)
        .await;

    assert_eq!(responses.len(), 1);
    let response = &responses[0];
    assert!(response.success);
    assert_eq!(response.result["command"], "read");
    assert_eq!(response.result["agent_id"], "agent-1");
    assert_eq!(response.result["source"], "text");
    assert_eq!(response.metadata["handler"], json!("read"));
    assert!(response.execution_time_ms >= 0.0);

    let invocations = handler.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].args, vec!["src/main.rs"]);
}

#[tokio::test]
async fn multiple_commands_run_sequentially_in_order() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("read"));
    bus.register_handler(EchoHandler::new("status"));

    let text = "First:\n/read a.txt\nThen:\n/status";
    let responses = bus.execute_text(text, "agent-1", None).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].result["command"], "read");
    assert_eq!(responses[1].result["command"], "status");
}

#[tokio::test]
async fn invalid_command_yields_failure_response() {
    let bus = CommandBus::new();

    let responses = bus.execute_text("/frobnicate now", "agent-1", None).await;

    assert_eq!(responses.len(), 1);
    assert!(!responses[0].success);
    assert_eq!(
        responses[0].error.as_deref(),
        Some("Unknown command: frobnicate")
    );
}

#[tokio::test]
async fn known_command_without_handler_fails_cleanly() {
    let bus = CommandBus::new();

    let responses = bus.execute_text("/status", "agent-1", None).await;

    assert!(!responses[0].success);
    assert_eq!(responses[0].error.as_deref(), Some("Unknown command: status"));
}

#[tokio::test]
async fn handler_errors_are_folded_not_raised() {
    let mut bus = CommandBus::new();
    bus.register_handler(FailingHandler::new("read", "file not found"));

    let responses = bus.execute_text("/read missing.txt", "agent-1", None).await;

    assert!(!responses[0].success);
    assert_eq!(responses[0].error.as_deref(), Some("file not found"));
}

#[tokio::test]
async fn help_builtin_answers_when_no_handler_registered() {
    let bus = CommandBus::new();

    let responses = bus.execute_text("/help read", "agent-1", None).await;

    assert!(responses[0].success);
    let text = responses[0].result.as_str().unwrap();
    assert!(text.starts_with("/read"));
}

#[tokio::test]
async fn registered_help_handler_shadows_the_builtin() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("help"));

    let responses = bus.execute_text("/help", "agent-1", None).await;

    assert!(responses[0].success);
    assert_eq!(responses[0].result["command"], "help");
}

#[tokio::test]
async fn re_registering_a_command_replaces_the_handler_on_both_surfaces() {
    let mut bus = CommandBus::new();
    bus.register_handler(FailingHandler::new("status", "stale handler"));
    bus.register_handler(EchoHandler::new("status"));

    // Second registration fully replaces the first; no duplicate dispatch
    let responses = bus.execute_text("/status", "agent-1", None).await;
    assert_eq!(responses.len(), 1);
    assert!(responses[0].success);
    assert_eq!(responses[0].result["command"], "status");

    let response = bus
        .execute_tool_args("harness_status", serde_json::Map::new(), "agent-1", None)
        .await;
    assert!(response.success);
    assert_eq!(response.result["command"], "status");
}

#[tokio::test]
async fn tool_call_routes_to_the_same_handler() {
    let mut bus = CommandBus::new();
    let handler = EchoHandler::new("sandbox");
    bus.register_handler(handler.clone());

    let payload = json!({
        "name": "harness_sandbox",
        "input": {"action": "create", "name": "research"}
    });
    let response = bus
        .execute_tool(&payload, WireFormat::Anthropic, "agent-2")
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.result["source"], "tool");
    assert_eq!(response.result["agent_id"], "agent-2");
    assert_eq!(response.metadata["tool_name"], json!("harness_sandbox"));

    let invocations = handler.invocations();
    assert_eq!(invocations[0].subcommand.as_deref(), Some("create"));
}

#[tokio::test]
async fn openai_payload_dispatches_too() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("read"));

    let payload = json!({
        "function": {
            "name": "harness_read",
            "arguments": "{\"path\": \"src/lib.rs\"}"
        }
    });
    let response = bus
        .execute_tool(&payload, WireFormat::OpenAi, "agent-1")
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.result["command"], "read");
}

#[tokio::test]
async fn malformed_tool_payload_is_an_error() {
    let bus = CommandBus::new();

    let result = bus
        .execute_tool(&json!({"no": "function"}), WireFormat::OpenAi, "agent-1")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn unhandled_tool_call_fails_cleanly() {
    let bus = CommandBus::new();

    let response = bus
        .execute_tool_args("harness_read", serde_json::Map::new(), "agent-1", None)
        .await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("No handler for tool: harness_read")
    );
}

struct TagMiddleware {
    tag: &'static str,
    seen: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Middleware for TagMiddleware {
    async fn handle(&self, request: ExecutionRequest, next: Next<'_>) -> ExecutionResponse {
        self.seen.lock().unwrap().push(self.tag);
        next(request)
            .await
            .with_metadata(self.tag, json!(true))
    }
}

struct ShortCircuitMiddleware;

#[async_trait]
impl Middleware for ShortCircuitMiddleware {
    async fn handle(&self, request: ExecutionRequest, _next: Next<'_>) -> ExecutionResponse {
        ExecutionResponse::failure(request.request_id, "denied by policy")
    }
}

#[tokio::test]
async fn middleware_runs_in_registration_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));
    bus.add_middleware(Arc::new(TagMiddleware {
        tag: "outer",
        seen: seen.clone(),
    }));
    bus.add_middleware(Arc::new(TagMiddleware {
        tag: "inner",
        seen: seen.clone(),
    }));

    let responses = bus.execute_text("/status", "agent-1", None).await;

    assert!(responses[0].success);
    assert_eq!(*seen.lock().unwrap(), vec!["outer", "inner"]);
    assert_eq!(responses[0].metadata["outer"], json!(true));
    assert_eq!(responses[0].metadata["inner"], json!(true));
}

#[tokio::test]
async fn middleware_can_short_circuit_dispatch() {
    let mut bus = CommandBus::new();
    let handler = EchoHandler::new("status");
    bus.register_handler(handler.clone());
    bus.add_middleware(Arc::new(ShortCircuitMiddleware));

    let responses = bus.execute_text("/status", "agent-1", None).await;

    assert!(!responses[0].success);
    assert_eq!(responses[0].error.as_deref(), Some("denied by policy"));
    assert!(handler.invocations().is_empty());
}

#[tokio::test]
async fn history_records_every_request_including_failures() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));

    bus.execute_text("/status", "agent-1", None).await;
    bus.execute_text("/frobnicate", "agent-1", None).await;

    let history = bus.history(None, None).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, RequestKind::TextCommand);
    assert!(!history[1].parsed_command.as_ref().unwrap().valid);
}

#[tokio::test]
async fn history_filters_by_agent_and_limit() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));

    bus.execute_text("/status", "agent-a", None).await;
    bus.execute_text("/status", "agent-b", None).await;
    bus.execute_text("/status", "agent-a", None).await;

    let agent_a = bus.history(Some("agent-a"), None).await;
    assert_eq!(agent_a.len(), 2);
    assert!(agent_a.iter().all(|r| r.agent_id == "agent-a"));

    let limited = bus.history(None, Some(1)).await;
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].agent_id, "agent-a");
}

#[tokio::test]
async fn history_is_bounded_by_configuration() {
    let mut bus = CommandBus::with_config(BusConfig {
        max_history: 2,
        ..BusConfig::default()
    });
    bus.register_handler(EchoHandler::new("status"));

    for _ in 0..5 {
        bus.execute_text("/status", "agent-1", None).await;
    }

    assert_eq!(bus.history(None, None).await.len(), 2);
}

#[tokio::test]
async fn tool_calls_land_in_history_as_tool_requests() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));

    bus.execute_tool_args("harness_status", serde_json::Map::new(), "agent-1", None)
        .await;

    let history = bus.history(None, None).await;
    assert_eq!(history[0].kind, RequestKind::ToolCall);
    assert_eq!(history[0].tool_name.as_deref(), Some("harness_status"));
}

#[tokio::test]
async fn clear_history_empties_the_log() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));
    bus.execute_text("/status", "agent-1", None).await;

    bus.clear_history().await;

    assert!(bus.history(None, None).await.is_empty());
}

#[tokio::test]
async fn caller_context_flows_into_request_metadata() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));

    let mut context = std::collections::HashMap::new();
    context.insert("session".to_owned(), json!("s-42"));
    bus.execute_text("/status", "agent-1", Some(context)).await;

    let history = bus.history(None, None).await;
    assert_eq!(history[0].metadata["session"], json!("s-42"));
}

#[test]
fn prompt_surfaces_cover_both_conventions() {
    let bus = CommandBus::new();

    assert!(bus.format_for_prompt().starts_with("Available commands:"));
    assert!(bus.describe_tools().starts_with("# Available Harness Tools"));
    assert!(!bus.tool_schemas(WireFormat::OpenAi).is_empty());
}

#[tokio::test]
async fn request_ids_are_unique() {
    let mut bus = CommandBus::new();
    bus.register_handler(EchoHandler::new("status"));

    bus.execute_text("/status\n/status", "agent-1", None).await;

    let history = bus.history(None, None).await;
    assert_ne!(history[0].request_id, history[1].request_id);
}
