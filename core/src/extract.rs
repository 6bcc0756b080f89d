//! Schema extraction.
//!
//! Turns a validated [`CommandDesc`] into a [`Schema`]: field names become
//! `--long` flags, the positional group becomes ordered positional slots,
//! subcommand variant tags become kebab-case command names, default tokens
//! are coerced into values, and the alias and description side tables are
//! joined onto their specs.

use tracing::debug;

use crate::{
    CommandDesc, FieldDesc, FlagSpec, PositionalSpec, Schema, SubcommandSpec, ValidationError,
    ValueKind, coerce, validate,
};

/// Replaces underscores with hyphens.
///
/// # Examples
///
/// ```
/// assert_eq!(argot_core::hyphenate("dry_run"), "dry-run");
/// ```
pub fn hyphenate(name: &str) -> String {
    name.replace('_', "-")
}

/// Converts a variant tag to kebab-case.
///
/// Handles both `CamelCase` and `snake_case` tags, and keeps acronyms
/// together.
///
/// # Examples
///
/// ```
/// use argot_core::kebab_case;
///
/// assert_eq!(kebab_case("RemoteAdd"), "remote-add");
/// assert_eq!(kebab_case("remote_add"), "remote-add");
/// assert_eq!(kebab_case("HTTPServer"), "http-server");
/// ```
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.extend(ch.to_lowercase());
    }

    out
}

impl CommandDesc {
    /// Validates this description and derives its [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`] found when the description is
    /// malformed. These are authoring defects; callers usually treat them
    /// as fatal at startup.
    ///
    /// # Examples
    ///
    /// ```
    /// use argot_core::*;
    ///
    /// let schema = CommandDesc::new("tool")
    ///     .field(FieldDesc::new("count", ValueKind::U32).default_value("3"))
    ///     .positional(FieldDesc::new("file", ValueKind::String))
    ///     .extract()
    ///     .unwrap();
    ///
    /// assert_eq!(schema.flags[0].default, Some(Value::Unsigned(3)));
    /// assert_eq!(schema.positionals[0].display, "FILE");
    /// ```
    pub fn extract(&self) -> Result<Schema, Vec<ValidationError>> {
        let errors = validate(self);
        if !errors.is_empty() {
            return Err(errors);
        }
        build_schema(self, &self.name)
    }
}

fn build_schema(desc: &CommandDesc, command: &str) -> Result<Schema, Vec<ValidationError>> {
    let flags = desc
        .fields
        .iter()
        .map(|field| build_flag(desc, field, command))
        .collect::<Result<Vec<_>, _>>()?;

    let positionals = desc
        .positionals
        .iter()
        .map(|field| {
            Ok(PositionalSpec {
                field: field.name.clone(),
                display: field.name.to_uppercase(),
                kind: field.kind.clone(),
                optional: field.optional,
                default: coerce_default(field, command)?,
                description: desc.descriptions.get(&field.name).cloned(),
            })
        })
        .collect::<Result<Vec<_>, Vec<ValidationError>>>()?;

    let subcommands = desc
        .subcommands
        .iter()
        .map(|sub| {
            let name = kebab_case(&sub.name);
            let path = format!("{command} {name}");
            Ok(SubcommandSpec {
                variant: sub.name.clone(),
                description: sub.about.clone(),
                schema: build_schema(sub, &path)?,
                name,
            })
        })
        .collect::<Result<Vec<_>, Vec<ValidationError>>>()?;

    let schema = Schema {
        name: desc.name.clone(),
        about: desc.about.clone(),
        custom_help: desc.custom_help.clone(),
        flags,
        positionals,
        subcommands,
    };

    debug!(
        command,
        flags = schema.flags.len(),
        positionals = schema.positionals.len(),
        subcommands = schema.subcommands.len(),
        "Extracted command schema"
    );

    Ok(schema)
}

fn build_flag(
    desc: &CommandDesc,
    field: &FieldDesc,
    command: &str,
) -> Result<FlagSpec, Vec<ValidationError>> {
    let long = hyphenate(&field.name);
    let placeholder = field.placeholder.clone().unwrap_or_else(|| match field.kind {
        ValueKind::Enum(_) => long.clone(),
        ref kind => kind.type_name().to_string(),
    });

    Ok(FlagSpec {
        field: field.name.clone(),
        long: format!("--{long}"),
        alias: desc.aliases.get(&field.name).copied(),
        kind: field.kind.clone(),
        optional: field.optional,
        default: coerce_default(field, command)?,
        description: desc.descriptions.get(&field.name).cloned(),
        placeholder,
    })
}

fn coerce_default(
    field: &FieldDesc,
    command: &str,
) -> Result<Option<crate::Value>, Vec<ValidationError>> {
    let Some(token) = &field.default else {
        return Ok(None);
    };
    coerce(&field.kind, token).map(Some).map_err(|source| {
        vec![ValidationError::InvalidDefault {
            command: command.to_string(),
            field: field.name.clone(),
            source,
        }]
    })
}
