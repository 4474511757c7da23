// ABOUTME: Integration tests for the text command parser
// ABOUTME: Covers extraction, tokenization, flag typing, subcommands, and help
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! Text Command Parser Tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use command_harness::{CommandParser, FlagValue};
use common::init_test_logging;

#[test]
fn parses_positional_args_and_typed_flags() {
    init_test_logging();
    let parser = CommandParser::default();

    let parsed = parser.parse("/read path.txt --lines 10");

    assert!(parsed.valid);
    assert_eq!(parsed.command, "read");
    assert_eq!(parsed.args, vec!["path.txt"]);
    assert_eq!(parsed.flags.get("lines"), Some(&FlagValue::Int(10)));
    assert!(parsed.subcommand.is_none());
}

#[test]
fn coerces_flag_values_by_content() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/search pattern --limit 5 --type rust");

    assert_eq!(parsed.flags.get("limit"), Some(&FlagValue::Int(5)));
    assert_eq!(
        parsed.flags.get("type"),
        Some(&FlagValue::Str("rust".into()))
    );
}

#[test]
fn flag_without_value_becomes_boolean() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/edit file.rs --old a --new b --all");

    assert_eq!(parsed.flags.get("all"), Some(&FlagValue::Bool(true)));
}

#[test]
fn equals_syntax_binds_flag_value() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/read notes.md --lines=25");

    assert_eq!(parsed.flags.get("lines"), Some(&FlagValue::Int(25)));
}

#[test]
fn short_flags_are_recognized() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/search pattern -t rust");

    assert_eq!(parsed.flags.get("t"), Some(&FlagValue::Str("rust".into())));
}

#[test]
fn quoted_arguments_keep_spaces() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/cmd \"echo hello world\" --timeout 30");

    assert!(parsed.valid);
    assert_eq!(parsed.args, vec!["echo hello world"]);
    assert_eq!(parsed.flags.get("timeout"), Some(&FlagValue::Int(30)));
}

#[test]
fn unbalanced_quoting_is_a_parse_error() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/cmd \"echo oops");

    assert!(!parsed.valid);
    assert_eq!(
        parsed.error.as_deref(),
        Some("Parse error: unbalanced quoting")
    );
}

#[test]
fn missing_slash_is_rejected() {
    let parser = CommandParser::default();

    let parsed = parser.parse("read path.txt");

    assert!(!parsed.valid);
    assert_eq!(parsed.error.as_deref(), Some("Command must start with /"));
}

#[test]
fn unknown_command_is_reported_with_name() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/frobnicate now");

    assert!(!parsed.valid);
    assert_eq!(parsed.command, "frobnicate");
    assert_eq!(parsed.error.as_deref(), Some("Unknown command: frobnicate"));
}

#[test]
fn subcommand_token_is_consumed_when_declared() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/sandbox create research --type docker");

    assert!(parsed.valid);
    assert_eq!(parsed.command, "sandbox");
    assert_eq!(parsed.subcommand.as_deref(), Some("create"));
    assert_eq!(parsed.args, vec!["research"]);
    assert_eq!(
        parsed.flags.get("type"),
        Some(&FlagValue::Str("docker".into()))
    );
}

#[test]
fn non_subcommand_first_token_stays_positional() {
    let parser = CommandParser::default();

    // "path.txt" is not a declared subcommand of /read
    let parsed = parser.parse("/read path.txt");

    assert!(parsed.subcommand.is_none());
    assert_eq!(parsed.args, vec!["path.txt"]);
}

#[test]
fn command_names_are_case_insensitive() {
    let parser = CommandParser::default();

    let parsed = parser.parse("/READ path.txt");

    assert!(parsed.valid);
    assert_eq!(parsed.command, "read");
}

#[test]
fn extracts_multiple_commands_from_prose() {
    let parser = CommandParser::default();

    let text = "Let me look at that file.\n\
                /read src/main.rs --lines 50\n\
                Then I'll check the status.\n\
                /status\n";

    let commands = parser.extract_commands(text);
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].0, "read");
    assert_eq!(commands[1].0, "status");
}

#[test]
fn continuation_lines_join_the_current_command() {
    let parser = CommandParser::default();

    let text = "/search pattern\n  --limit 5\n\n/status";

    let parsed = parser.parse_all(text);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].flags.get("limit"), Some(&FlagValue::Int(5)));
    assert_eq!(parsed[1].command, "status");
}

#[test]
fn slash_paths_are_not_commands() {
    let parser = CommandParser::default();

    // Looks slash-prefixed but is not a lowercase command name
    let commands = parser.extract_commands("/usr/bin/env is a path\n/Read too");
    assert!(commands.is_empty());
}

#[test]
fn parse_all_keeps_invalid_commands_in_order() {
    let parser = CommandParser::default();

    let parsed = parser.parse_all("/status\n/nonexistent\n/version");

    assert_eq!(parsed.len(), 3);
    assert!(parsed[0].valid);
    assert!(!parsed[1].valid);
    assert!(parsed[2].valid);
}

#[test]
fn reserialized_command_parses_back_to_an_equivalent_invocation() {
    let parser = CommandParser::default();
    let original = parser.parse("/sandbox create mybox --type shared --force");
    assert!(original.valid);

    // Rebuild the `/name sub args --flags` form from the parsed pieces
    let mut rebuilt = format!("/{}", original.command);
    if let Some(sub) = original.subcommand.as_deref() {
        rebuilt.push_str(&format!(" {sub}"));
    }
    for arg in &original.args {
        rebuilt.push_str(&format!(" {arg}"));
    }
    let mut flags: Vec<_> = original.flags.iter().collect();
    flags.sort_by_key(|(name, _)| name.clone());
    for (name, value) in flags {
        rebuilt.push_str(&format!(" --{name} {value}"));
    }

    let reparsed = parser.parse(&rebuilt);
    assert!(reparsed.valid);
    assert_eq!(reparsed.command, original.command);
    assert_eq!(reparsed.subcommand, original.subcommand);
    assert_eq!(reparsed.args, original.args);
    assert_eq!(reparsed.flags, original.flags);
}

#[test]
fn general_help_lists_all_commands_sorted() {
    let parser = CommandParser::default();

    let help = parser.help(None);

    assert!(help.starts_with("Available commands:"));
    assert!(help.contains("  /cmd"));
    assert!(help.contains("  /sandbox"));
    assert!(help.contains("Use /help <command> for details."));

    let cmd_pos = help.find("/cmd").unwrap();
    let status_pos = help.find("/status").unwrap();
    assert!(cmd_pos < status_pos);
}

#[test]
fn command_help_renders_placeholders_and_flags() {
    let parser = CommandParser::default();

    let help = parser.help(Some("read"));

    assert!(help.starts_with("/read <path>"));
    assert!(help.contains("Flags:"));
    assert!(help.contains("--lines <int>"));
}

#[test]
fn command_help_renders_subcommands() {
    let parser = CommandParser::default();

    let help = parser.help(Some("sandbox"));

    assert!(help.contains("Subcommands:"));
    assert!(help.contains("  create <name>"));
    assert!(help.contains("  list"));
}

#[test]
fn help_for_unknown_topic_is_reported() {
    let parser = CommandParser::default();

    assert_eq!(parser.help(Some("nope")), "Unknown command: nope");
}
