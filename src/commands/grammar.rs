// ABOUTME: Immutable catalog of recognized commands, subcommands, arguments, and flags
// ABOUTME: Pure lookup data shared by the text parser and the tool schema adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright ©2025 Async-IO.org

//! # Command Grammar
//!
//! The fixed catalog of top-level commands the harness recognizes. Pure data:
//! no behavior beyond lookup and structural reads. Built once at startup and
//! passed by reference into the parser and adapter, so independent bus
//! instances never interfere through shared mutable state.

use std::collections::BTreeMap;

/// Expected type of a flag value, used for help rendering and schema mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagType {
    /// Boolean flag
    Bool,
    /// Integer flag
    Int,
    /// Floating point flag
    Float,
    /// String flag
    Str,
}

impl FlagType {
    /// Short type name rendered in help text (`--flag <int>`)
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
        }
    }
}

/// Structural definition of one command or subcommand.
///
/// Subcommand definitions have the same shape as top-level definitions,
/// nested exactly one level deep.
#[derive(Debug, Clone, Default)]
pub struct CommandDefinition {
    /// Required positional argument names, in order
    pub args: Vec<&'static str>,
    /// Optional positional argument names, in order
    pub optional_args: Vec<&'static str>,
    /// Flag name to expected value type, in declaration order
    pub flags: Vec<(&'static str, FlagType)>,
    /// Subcommand name to definition, in declaration order
    pub subcommands: Vec<(&'static str, CommandDefinition)>,
    /// Whether unlimited trailing positional arguments are allowed
    pub varargs: bool,
}

impl CommandDefinition {
    /// Create an empty definition
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required positional argument
    #[must_use]
    pub fn arg(mut self, name: &'static str) -> Self {
        self.args.push(name);
        self
    }

    /// Add an optional positional argument
    #[must_use]
    pub fn optional(mut self, name: &'static str) -> Self {
        self.optional_args.push(name);
        self
    }

    /// Add a typed flag
    #[must_use]
    pub fn flag(mut self, name: &'static str, flag_type: FlagType) -> Self {
        self.flags.push((name, flag_type));
        self
    }

    /// Add a subcommand definition
    #[must_use]
    pub fn subcommand(mut self, name: &'static str, definition: CommandDefinition) -> Self {
        self.subcommands.push((name, definition));
        self
    }

    /// Allow unlimited trailing positional arguments
    #[must_use]
    pub fn varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    /// Whether this definition declares subcommands
    #[must_use]
    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Look up a subcommand definition by name
    #[must_use]
    pub fn subcommand_definition(&self, name: &str) -> Option<&CommandDefinition> {
        self.subcommands
            .iter()
            .find(|(sub, _)| *sub == name)
            .map(|(_, def)| def)
    }
}

/// Lookup table mapping command name to definition.
#[derive(Debug, Clone)]
pub struct CommandGrammar {
    definitions: BTreeMap<&'static str, CommandDefinition>,
}

impl CommandGrammar {
    /// Build an empty grammar
    #[must_use]
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// Build the full built-in harness catalog.
    ///
    /// Covers shell/file commands, the sandbox/skill/agent/eval/qa/market
    /// subsystems, and the meta commands (`help`, `status`, `config`,
    /// `history`, `clear`, `version`).
    #[must_use]
    pub fn default_catalog() -> Self {
        let mut grammar = Self::empty();

        // Shell & files
        grammar.define(
            "cmd",
            CommandDefinition::new()
                .arg("command")
                .flag("timeout", FlagType::Int),
        );
        grammar.define(
            "read",
            CommandDefinition::new()
                .arg("path")
                .flag("lines", FlagType::Int)
                .flag("offset", FlagType::Int),
        );
        grammar.define(
            "write",
            CommandDefinition::new()
                .arg("path")
                .flag("content", FlagType::Str)
                .flag("append", FlagType::Bool),
        );
        grammar.define(
            "edit",
            CommandDefinition::new()
                .arg("path")
                .flag("old", FlagType::Str)
                .flag("new", FlagType::Str)
                .flag("all", FlagType::Bool),
        );
        grammar.define(
            "search",
            CommandDefinition::new()
                .arg("pattern")
                .optional("path")
                .flag("type", FlagType::Str)
                .flag("limit", FlagType::Int),
        );
        grammar.define(
            "tree",
            CommandDefinition::new()
                .optional("path")
                .flag("depth", FlagType::Int),
        );

        // Sandbox
        grammar.define(
            "sandbox",
            CommandDefinition::new()
                .subcommand("list", CommandDefinition::new())
                .subcommand(
                    "create",
                    CommandDefinition::new()
                        .arg("name")
                        .flag("type", FlagType::Str),
                )
                .subcommand("switch", CommandDefinition::new().arg("name"))
                .subcommand("share", CommandDefinition::new().arg("name").arg("agents"))
                .subcommand(
                    "delete",
                    CommandDefinition::new()
                        .arg("name")
                        .flag("force", FlagType::Bool),
                )
                .subcommand(
                    "env",
                    CommandDefinition::new()
                        .arg("action")
                        .optional("key")
                        .optional("value"),
                )
                .subcommand(
                    "state",
                    CommandDefinition::new()
                        .arg("action")
                        .optional("key")
                        .optional("value"),
                ),
        );

        // Skills
        grammar.define(
            "skill",
            CommandDefinition::new()
                .subcommand(
                    "list",
                    CommandDefinition::new().flag("category", FlagType::Str),
                )
                .subcommand("info", CommandDefinition::new().arg("name"))
                .subcommand("invoke", CommandDefinition::new().arg("name").varargs())
                .subcommand(
                    "install",
                    CommandDefinition::new()
                        .arg("name")
                        .flag("version", FlagType::Str),
                )
                .subcommand("create", CommandDefinition::new().arg("name"))
                .subcommand("remove", CommandDefinition::new().arg("name")),
        );

        // Agent communication
        grammar.define(
            "agent",
            CommandDefinition::new()
                .subcommand(
                    "list",
                    CommandDefinition::new().flag("status", FlagType::Str),
                )
                .subcommand("msg", CommandDefinition::new().arg("agent").arg("message"))
                .subcommand("broadcast", CommandDefinition::new().arg("message"))
                .subcommand(
                    "query",
                    CommandDefinition::new()
                        .arg("agent")
                        .arg("question")
                        .flag("timeout", FlagType::Int),
                )
                .subcommand("subscribe", CommandDefinition::new().arg("pattern"))
                .subcommand("unsubscribe", CommandDefinition::new().arg("pattern")),
        );

        // Self-evaluation
        grammar.define(
            "eval",
            CommandDefinition::new()
                .subcommand("start", CommandDefinition::new().flag("type", FlagType::Str))
                .subcommand("record", CommandDefinition::new().arg("task"))
                .subcommand("assess", CommandDefinition::new())
                .subcommand("gaps", CommandDefinition::new())
                .subcommand("improve", CommandDefinition::new())
                .subcommand(
                    "report",
                    CommandDefinition::new().flag("format", FlagType::Str),
                )
                .subcommand("status", CommandDefinition::new())
                .subcommand(
                    "history",
                    CommandDefinition::new().flag("limit", FlagType::Int),
                ),
        );

        // Q&A system
        grammar.define(
            "qa",
            CommandDefinition::new()
                .subcommand(
                    "generate",
                    CommandDefinition::new()
                        .optional("topic")
                        .flag("count", FlagType::Int),
                )
                .subcommand(
                    "pending",
                    CommandDefinition::new().flag("limit", FlagType::Int),
                )
                .subcommand("answer", CommandDefinition::new().arg("id").arg("answer"))
                .subcommand("review", CommandDefinition::new().arg("id"))
                .subcommand("learn", CommandDefinition::new())
                .subcommand(
                    "export",
                    CommandDefinition::new().flag("format", FlagType::Str),
                ),
        );

        // Marketplace
        grammar.define(
            "market",
            CommandDefinition::new()
                .subcommand(
                    "search",
                    CommandDefinition::new()
                        .arg("query")
                        .flag("type", FlagType::Str)
                        .flag("limit", FlagType::Int),
                )
                .subcommand("info", CommandDefinition::new().arg("id"))
                .subcommand(
                    "install",
                    CommandDefinition::new()
                        .arg("id")
                        .flag("sandbox", FlagType::Str),
                )
                .subcommand("publish", CommandDefinition::new().arg("path"))
                .subcommand(
                    "rate",
                    CommandDefinition::new()
                        .arg("id")
                        .arg("rating")
                        .optional("review"),
                )
                .subcommand("my", CommandDefinition::new()),
        );

        // Meta
        grammar.define("help", CommandDefinition::new().optional("topic"));
        grammar.define("status", CommandDefinition::new());
        grammar.define(
            "config",
            CommandDefinition::new()
                .arg("action")
                .optional("key")
                .optional("value"),
        );
        grammar.define(
            "history",
            CommandDefinition::new().flag("limit", FlagType::Int),
        );
        grammar.define("clear", CommandDefinition::new());
        grammar.define("version", CommandDefinition::new());

        grammar
    }

    /// Register a command definition
    pub fn define(&mut self, name: &'static str, definition: CommandDefinition) {
        self.definitions.insert(name, definition);
    }

    /// Look up a command definition by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.definitions.get(name)
    }

    /// Membership test
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Command names in lexicographic order
    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.keys().copied()
    }

    /// Number of registered commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the grammar is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for CommandGrammar {
    fn default() -> Self {
        Self::default_catalog()
    }
}
