// ABOUTME: Parser for text-based commands embedded in LLM output
// ABOUTME: Extracts /command lines, tokenizes with shell quoting, and resolves flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Text Command Parser
//!
//! Parses commands in the format:
//!
//! ```text
//! /command [subcommand] [--flag value] [args...]
//! ```
//!
//! This lets models without native tool calling interact with the harness
//! through natural text output containing embedded commands. The parser never
//! raises for malformed input: all failure is communicated through
//! [`ParsedCommand`] with `valid == false` and an error message.

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::grammar::CommandGrammar;
use crate::types::{FlagValue, ParsedCommand};

/// Parser for text-based commands.
///
/// Stateless aside from its immutable grammar; shared, not owned, by the bus.
#[derive(Debug, Clone)]
pub struct CommandParser {
    grammar: Arc<CommandGrammar>,
}

impl CommandParser {
    /// Create a parser over the given grammar
    #[must_use]
    pub fn new(grammar: Arc<CommandGrammar>) -> Self {
        Self { grammar }
    }

    /// The grammar this parser validates against
    #[must_use]
    pub fn grammar(&self) -> &CommandGrammar {
        &self.grammar
    }

    /// Extract all commands from free-form text.
    ///
    /// Scans line by line: a line whose trimmed content starts with `/`
    /// begins a new command; subsequent non-empty, non-slash lines are
    /// continuations appended (space-joined) to the current command's
    /// argument line. Returns `(command_name, args_line)` tuples in
    /// encounter order.
    #[must_use]
    pub fn extract_commands(&self, text: &str) -> Vec<(String, String)> {
        let mut commands = Vec::new();
        let mut current: Option<(String, Vec<String>)> = None;

        for line in text.lines() {
            let stripped = line.trim();
            if stripped.starts_with('/') {
                if let Some((name, fragments)) = current.take() {
                    commands.push((name, fragments.join(" ")));
                }
                current = split_command_line(stripped);
            } else if !stripped.is_empty() {
                if let Some((_, fragments)) = current.as_mut() {
                    fragments.push(stripped.to_owned());
                }
            }
        }

        if let Some((name, fragments)) = current {
            commands.push((name, fragments.join(" ")));
        }

        commands
    }

    /// Parse a single command string like `/read file.txt --lines 10`.
    #[must_use]
    pub fn parse(&self, text: &str) -> ParsedCommand {
        let trimmed = text.trim();

        if !trimmed.starts_with('/') {
            return ParsedCommand::invalid(trimmed, "", "Command must start with /");
        }

        let body = &trimmed[1..];

        let Some(tokens) = shlex::split(body) else {
            return ParsedCommand::invalid(trimmed, "", "Parse error: unbalanced quoting");
        };

        if tokens.is_empty() {
            return ParsedCommand::invalid(trimmed, "", "Empty command");
        }

        let command = tokens[0].to_lowercase();

        let Some(definition) = self.grammar.get(&command) else {
            return ParsedCommand::invalid(
                trimmed,
                command.clone(),
                format!("Unknown command: {command}"),
            );
        };

        let mut rest = &tokens[1..];

        // Consume a subcommand token when the grammar declares one
        let mut subcommand = None;
        if definition.has_subcommands() && !rest.is_empty() {
            let candidate = rest[0].to_lowercase();
            if definition.subcommand_definition(&candidate).is_some() {
                subcommand = Some(candidate);
                rest = &rest[1..];
            }
        }

        let (args, flags) = split_flags_and_args(rest);

        ParsedCommand {
            raw: trimmed.to_owned(),
            command,
            subcommand,
            args,
            flags,
            valid: true,
            error: None,
        }
    }

    /// Extract and parse all commands embedded in text, in encounter order.
    #[must_use]
    pub fn parse_all(&self, text: &str) -> Vec<ParsedCommand> {
        self.extract_commands(text)
            .into_iter()
            .map(|(name, args)| {
                let full = if args.is_empty() {
                    format!("/{name}")
                } else {
                    format!("/{name} {args}")
                };
                self.parse(&full)
            })
            .collect()
    }

    /// Render help text.
    ///
    /// With no topic, lists all known command names sorted lexicographically.
    /// With a known topic, renders its argument placeholders plus a
    /// `Subcommands:` or `Flags:` block; unknown topics are reported.
    #[must_use]
    pub fn help(&self, topic: Option<&str>) -> String {
        let Some(topic) = topic else {
            let mut lines = vec!["Available commands:\n".to_owned()];
            for name in self.grammar.command_names() {
                lines.push(format!("  /{name}"));
            }
            lines.push("\nUse /help <command> for details.".to_owned());
            return lines.join("\n");
        };

        let Some(definition) = self.grammar.get(topic) else {
            return format!("Unknown command: {topic}");
        };

        let mut lines = vec![format!("/{topic}")];

        if definition.has_subcommands() {
            lines.push("\nSubcommands:".to_owned());
            for (sub, sub_definition) in &definition.subcommands {
                let placeholders = placeholder_line(&sub_definition.args, &sub_definition.optional_args);
                lines.push(format!("  {sub} {placeholders}").trim_end().to_owned());
            }
        } else {
            let placeholders = placeholder_line(&definition.args, &definition.optional_args);
            if !placeholders.is_empty() {
                lines[0] = format!("/{topic} {placeholders}").trim_end().to_owned();
            }

            if !definition.flags.is_empty() {
                lines.push("\nFlags:".to_owned());
                for (flag, flag_type) in &definition.flags {
                    lines.push(format!("  --{flag} <{}>", flag_type.type_name()));
                }
            }
        }

        lines.join("\n")
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(Arc::new(CommandGrammar::default_catalog()))
    }
}

/// Split a slash line into command name and argument fragments.
///
/// Command names are lowercase identifiers; a slash line with anything else
/// after the `/` does not begin a command.
fn split_command_line(stripped: &str) -> Option<(String, Vec<String>)> {
    let body = &stripped[1..];
    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_')
    {
        return None;
    }

    let fragments = if rest.is_empty() {
        Vec::new()
    } else {
        vec![rest.to_owned()]
    };
    Some((name.to_owned(), fragments))
}

/// Partition tokens into positional arguments and typed flags.
fn split_flags_and_args(tokens: &[String]) -> (Vec<String>, HashMap<String, FlagValue>) {
    let mut args = Vec::new();
    let mut flags = HashMap::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if let Some(flag_body) = token.strip_prefix("--") {
            if let Some((name, value)) = flag_body.split_once('=') {
                flags.insert(name.to_owned(), FlagValue::coerce(value));
            } else if i + 1 < tokens.len() && !tokens[i + 1].starts_with('-') {
                flags.insert(flag_body.to_owned(), FlagValue::coerce(&tokens[i + 1]));
                i += 1;
            } else {
                flags.insert(flag_body.to_owned(), FlagValue::Bool(true));
            }
        } else if token.len() == 2 && token.starts_with('-') {
            let name = token[1..].to_owned();
            if i + 1 < tokens.len() && !tokens[i + 1].starts_with('-') {
                flags.insert(name, FlagValue::coerce(&tokens[i + 1]));
                i += 1;
            } else {
                flags.insert(name, FlagValue::Bool(true));
            }
        } else {
            args.push(token.clone());
        }

        i += 1;
    }

    (args, flags)
}

/// Render `<required>` and `[optional]` placeholder text
fn placeholder_line(args: &[&str], optional_args: &[&str]) -> String {
    let mut parts: Vec<String> = args.iter().map(|a| format!("<{a}>")).collect();
    parts.extend(optional_args.iter().map(|a| format!("[{a}]")));
    parts.join(" ")
}
