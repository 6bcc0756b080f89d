//! Command description validation.
//!
//! Validates the authoring invariants of a [`CommandDesc`] before any
//! parsing happens: alias rules, name collisions, positional ordering,
//! boolean restrictions, enum shape and default tokens. Every error names
//! the command path it was found in.
//!
//! # Examples
//!
//! ```
//! use argot_core::*;
//!
//! let desc = CommandDesc::new("tool")
//!     .field(FieldDesc::new("verbose", ValueKind::Bool))
//!     .alias("verbose", 'v');
//! assert!(validate(&desc).is_empty());
//!
//! // `-h` is reserved for help
//! let bad = CommandDesc::new("tool")
//!     .field(FieldDesc::new("host", ValueKind::String))
//!     .alias("host", 'h');
//! assert!(matches!(
//!     validate(&bad).as_slice(),
//!     [ValidationError::ReservedAlias { .. }]
//! ));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::extract::{hyphenate, kebab_case};
use crate::{CoercionError, CommandDesc, FieldDesc, ValueKind, coerce};

/// Description validation errors.
///
/// Each variant describes one authoring defect. These are never produced
/// by user input; a description that fails validation cannot be parsed
/// against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A command, field or variant name is empty.
    #[error("{command}: name cannot be empty")]
    EmptyName { command: String },
    /// A field is named `help`, which is reserved for the help flag.
    #[error("{command}: field name '{field}' is reserved")]
    ReservedName { command: String, field: String },
    /// The alias `h` is reserved for the help switch.
    #[error("{command}: alias 'h' on '{field}' is reserved")]
    ReservedAlias { command: String, field: String },
    /// Aliases must be a single ASCII alphanumeric character.
    #[error("{command}: alias '{alias}' on '{field}' is not ASCII alphanumeric")]
    InvalidAlias {
        command: String,
        field: String,
        alias: char,
    },
    /// Two flags share a switch alias.
    #[error("{command}: duplicate alias '-{alias}'")]
    DuplicateAlias { command: String, alias: char },
    /// The alias table names something that is not a flag field.
    #[error("{command}: alias declared for unknown flag '{field}'")]
    UnknownAliasTarget { command: String, field: String },
    /// The description table names something that is not a field.
    #[error("{command}: description declared for unknown field '{field}'")]
    UnknownDescriptionTarget { command: String, field: String },
    /// Flag, positional and subcommand names must be distinct.
    #[error("{command}: duplicate name '{name}'")]
    DuplicateName { command: String, name: String },
    /// Boolean flags signal by presence and cannot be optional or defaulted.
    #[error("{command}: boolean flag '{field}' cannot be optional or have a default")]
    OptionalBoolean { command: String, field: String },
    /// Positionals always carry a value, so booleans are not allowed.
    #[error("{command}: positional '{field}' cannot be boolean")]
    BooleanPositional { command: String, field: String },
    /// A required positional follows an optional or defaulted one.
    #[error("{command}: required positional '{field}' follows an optional one")]
    RequiredAfterOptional { command: String, field: String },
    /// Enum kinds need at least one variant.
    #[error("{command}: enum field '{field}' has no variants")]
    EmptyEnum { command: String, field: String },
    /// Two variants hyphenate to the same token.
    #[error("{command}: enum field '{field}' repeats variant '{variant}'")]
    DuplicateVariant {
        command: String,
        field: String,
        variant: String,
    },
    /// A default token does not coerce to the field's kind.
    #[error("{command}: invalid default for '{field}': {source}")]
    InvalidDefault {
        command: String,
        field: String,
        source: CoercionError,
    },
}

/// Validates a command description and all nested subcommands.
///
/// Returns every defect found; an empty vector means the description can
/// be extracted.
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// // Required positional after an optional one
/// let desc = CommandDesc::new("cp")
///     .positional(FieldDesc::new("source", ValueKind::String).optional())
///     .positional(FieldDesc::new("dest", ValueKind::String));
///
/// let errors = validate(&desc);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::RequiredAfterOptional { .. })));
/// ```
pub fn validate(desc: &CommandDesc) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_command(desc, &desc.name, &mut errors);
    errors
}

fn validate_command(desc: &CommandDesc, command: &str, errors: &mut Vec<ValidationError>) {
    if desc.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName {
            command: command.to_string(),
        });
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut claim = |name: String, errors: &mut Vec<ValidationError>| {
        if !seen.insert(name.clone()) {
            errors.push(ValidationError::DuplicateName {
                command: command.to_string(),
                name,
            });
        }
    };

    for field in &desc.fields {
        validate_field(field, command, errors);
        claim(hyphenate(&field.name), errors);
        if field.kind.is_bool() && (field.optional || field.default.is_some()) {
            errors.push(ValidationError::OptionalBoolean {
                command: command.to_string(),
                field: field.name.clone(),
            });
        }
    }

    let mut optional_seen = false;
    for field in &desc.positionals {
        validate_field(field, command, errors);
        claim(hyphenate(&field.name), errors);
        if field.kind.is_bool() {
            errors.push(ValidationError::BooleanPositional {
                command: command.to_string(),
                field: field.name.clone(),
            });
        }
        let optional = field.optional || field.default.is_some();
        if optional_seen && !optional {
            errors.push(ValidationError::RequiredAfterOptional {
                command: command.to_string(),
                field: field.name.clone(),
            });
        }
        optional_seen |= optional;
    }

    for sub in &desc.subcommands {
        claim(kebab_case(&sub.name), errors);
    }

    validate_aliases(desc, command, errors);

    for field in desc.descriptions.keys() {
        let known = desc
            .fields
            .iter()
            .chain(&desc.positionals)
            .any(|f| &f.name == field);
        if !known {
            errors.push(ValidationError::UnknownDescriptionTarget {
                command: command.to_string(),
                field: field.clone(),
            });
        }
    }

    for sub in &desc.subcommands {
        let path = format!("{command} {}", kebab_case(&sub.name));
        validate_command(sub, &path, errors);
    }
}

fn validate_field(field: &FieldDesc, command: &str, errors: &mut Vec<ValidationError>) {
    if field.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName {
            command: command.to_string(),
        });
        return;
    }

    if hyphenate(&field.name) == "help" {
        errors.push(ValidationError::ReservedName {
            command: command.to_string(),
            field: field.name.clone(),
        });
    }

    if let ValueKind::Enum(variants) = &field.kind {
        if variants.is_empty() {
            errors.push(ValidationError::EmptyEnum {
                command: command.to_string(),
                field: field.name.clone(),
            });
        }
        let mut tokens = HashSet::new();
        for variant in variants {
            if variant.name.trim().is_empty() {
                errors.push(ValidationError::EmptyName {
                    command: command.to_string(),
                });
            } else if !tokens.insert(variant.token()) {
                errors.push(ValidationError::DuplicateVariant {
                    command: command.to_string(),
                    field: field.name.clone(),
                    variant: variant.token(),
                });
            }
        }
    }

    if let Some(token) = &field.default {
        if !field.kind.is_bool() {
            if let Err(source) = coerce(&field.kind, token) {
                errors.push(ValidationError::InvalidDefault {
                    command: command.to_string(),
                    field: field.name.clone(),
                    source,
                });
            }
        }
    }
}

fn validate_aliases(desc: &CommandDesc, command: &str, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();

    for (field, &alias) in &desc.aliases {
        if !desc.fields.iter().any(|f| &f.name == field) {
            errors.push(ValidationError::UnknownAliasTarget {
                command: command.to_string(),
                field: field.clone(),
            });
            continue;
        }
        if alias == 'h' {
            errors.push(ValidationError::ReservedAlias {
                command: command.to_string(),
                field: field.clone(),
            });
            continue;
        }
        if !alias.is_ascii_alphanumeric() {
            errors.push(ValidationError::InvalidAlias {
                command: command.to_string(),
                field: field.clone(),
                alias,
            });
            continue;
        }
        if !seen.insert(alias) {
            errors.push(ValidationError::DuplicateAlias {
                command: command.to_string(),
                alias,
            });
        }
    }
}
