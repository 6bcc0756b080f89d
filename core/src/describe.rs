//! Declarative command descriptions.
//!
//! A [`CommandDesc`] is the static, hand-written (or file-loaded)
//! description of one command: its fields, its positional group, its
//! subcommand variants, and two side tables mapping field names to switch
//! aliases and descriptions. It is raw input: names are as declared and
//! defaults are still tokens. [`CommandDesc::extract`] validates it and
//! derives the [`Schema`](crate::Schema) the parser runs on.
//!
//! Descriptions deserialize from JSON or YAML:
//!
//! ```yaml
//! name: deploy
//! about: Ship a build
//! fields:
//!   - { name: force, kind: bool }
//!   - { name: retries, kind: u8, default: "3" }
//! positionals:
//!   - { name: target, kind: string }
//! aliases: { force: f }
//! descriptions: { target: Environment to deploy to }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ValueKind;

/// One declared field: a flag, or a positional when it sits in the
/// positional group.
///
/// # Examples
///
/// ```
/// use argot_core::{FieldDesc, ValueKind};
///
/// let count = FieldDesc::new("count", ValueKind::U32).default_value("3");
/// assert_eq!(count.default.as_deref(), Some("3"));
///
/// let name = FieldDesc::new("name", ValueKind::String).optional();
/// assert!(name.optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDesc {
    /// Field name as declared (snake_case by convention)
    pub name: String,
    /// Value kind
    pub kind: ValueKind,
    /// Absence yields no value instead of an error
    #[serde(default)]
    pub optional: bool,
    /// Default, written as the token a user would type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Placeholder shown after the flag in usage text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDesc {
    /// Creates a required field of the given kind.
    pub fn new(name: &str, kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            optional: false,
            default: None,
            placeholder: None,
        }
    }

    /// Marks the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Declares a default value token.
    pub fn default_value(mut self, token: &str) -> Self {
        self.default = Some(token.to_string());
        self
    }

    /// Overrides the usage placeholder.
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}

/// Static description of a command.
///
/// Nested subcommands are themselves `CommandDesc`s; their `name` is the
/// variant tag, matched on the command line in kebab-case.
///
/// # Examples
///
/// ```
/// use argot_core::{CommandDesc, FieldDesc, ValueKind};
///
/// let desc = CommandDesc::new("git")
///     .about("The stupid content tracker")
///     .field(FieldDesc::new("verbose", ValueKind::Bool))
///     .alias("verbose", 'v')
///     .subcommand(
///         CommandDesc::new("Commit")
///             .field(FieldDesc::new("message", ValueKind::String))
///             .alias("message", 'm')
///             .describe("message", "Commit message"),
///     );
///
/// let schema = desc.extract().unwrap();
/// assert_eq!(schema.subcommand_names(), vec!["commit"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDesc {
    /// Command name, or the variant tag for a subcommand
    pub name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Help text used verbatim instead of the generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_help: Option<String>,
    /// Flag fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDesc>,
    /// The positional group, in declaration order
    #[serde(default)]
    pub positionals: Vec<FieldDesc>,
    /// Subcommand variants
    #[serde(default)]
    pub subcommands: Vec<CommandDesc>,
    /// Field name → switch alias
    #[serde(default)]
    pub aliases: BTreeMap<String, char>,
    /// Field name → description
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}

impl CommandDesc {
    /// Creates an empty description with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a short description.
    pub fn about(mut self, about: &str) -> Self {
        self.about = Some(about.to_string());
        self
    }

    /// Replaces the generated help text.
    pub fn custom_help(mut self, help: &str) -> Self {
        self.custom_help = Some(help.to_string());
        self
    }

    /// Adds a flag field.
    pub fn field(mut self, field: FieldDesc) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a field to the positional group.
    pub fn positional(mut self, field: FieldDesc) -> Self {
        self.positionals.push(field);
        self
    }

    /// Adds a subcommand variant.
    pub fn subcommand(mut self, sub: CommandDesc) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Maps a flag field to a switch alias.
    pub fn alias(mut self, field: &str, alias: char) -> Self {
        self.aliases.insert(field.to_string(), alias);
        self
    }

    /// Attaches a description to a flag or positional field.
    pub fn describe(mut self, field: &str, description: &str) -> Self {
        self.descriptions
            .insert(field.to_string(), description.to_string());
        self
    }
}
