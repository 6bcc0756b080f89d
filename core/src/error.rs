//! Error types for parsing and binding.
//!
//! [`ParseError`] is the tagged outcome of a failed (or help-interrupted)
//! parse. [`ErrorKind`] flattens it into the stable tag set callers and
//! tests compare against, splitting coercion failures into their causes.

use thiserror::Error;

use crate::{CoercionError, Value};

/// Errors that end a parse.
///
/// All of these are terminal for the parse call that raised them.
/// [`ParseError::PrintedHelp`] is not a failure: help was written and the
/// caller should stop normal processing with a success exit code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A zero-length token was encountered.
    #[error("empty argument")]
    EmptyArgument,

    /// A `--long` token matched no flag.
    #[error("unrecognized flag '{flag}'")]
    UnrecognizedFlag { flag: String },

    /// A character in a switch cluster matched no alias.
    #[error("unrecognized switch '-{switch}' in '{token}'")]
    UnrecognizedSwitch { switch: char, token: String },

    /// A token that can never be valid here (a lone `-`).
    #[error("unrecognized argument '{token}'")]
    UnrecognizedArgument { token: String },

    /// A flag or switch requiring a value had none available.
    #[error("missing value for '{flag}'")]
    MissingValue { flag: String },

    /// A value could not be coerced to the target's kind.
    #[error("invalid value for '{target}': {source}")]
    InvalidValue {
        target: String,
        source: CoercionError,
    },

    /// A required flag was not passed.
    #[error("missing required flag '{flag}'")]
    MissingFlag { flag: String },

    /// A required positional was not supplied.
    #[error("missing required argument '<{name}>'")]
    MissingArgument { name: String },

    /// The command declares subcommands and none was given.
    #[error("'{command}' requires a subcommand")]
    MissingCommand { command: String },

    /// More positionals than the schema declares and the trailing policy
    /// accepts.
    #[error("unexpected argument '{token}'")]
    UnexpectedPositional { token: String },

    /// Help was written to the output channel.
    #[error("help requested")]
    PrintedHelp,

    /// The parse result did not fit the target type.
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Flat error tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyArgument,
    UnrecognizedFlag,
    UnrecognizedSwitch,
    UnrecognizedArgument,
    MissingValue,
    UnrecognizedOption,
    IntegerOverflow,
    InvalidCharacter,
    InvalidFloat,
    MissingFlag,
    MissingArgument,
    MissingCommand,
    UnexpectedPositional,
    PrintedHelp,
    Bind,
}

impl ParseError {
    /// Returns the flat tag for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use argot_core::{CoercionError, ErrorKind, ParseError};
    ///
    /// let err = ParseError::InvalidValue {
    ///     target: "--mode".into(),
    ///     source: CoercionError::UnrecognizedOption { token: "slow".into() },
    /// };
    /// assert_eq!(err.kind(), ErrorKind::UnrecognizedOption);
    /// assert_eq!(err.exit_code(), 1);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyArgument => ErrorKind::EmptyArgument,
            Self::UnrecognizedFlag { .. } => ErrorKind::UnrecognizedFlag,
            Self::UnrecognizedSwitch { .. } => ErrorKind::UnrecognizedSwitch,
            Self::UnrecognizedArgument { .. } => ErrorKind::UnrecognizedArgument,
            Self::MissingValue { .. } => ErrorKind::MissingValue,
            Self::InvalidValue { source, .. } => match source {
                CoercionError::Overflow { .. } => ErrorKind::IntegerOverflow,
                CoercionError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
                CoercionError::InvalidFloat { .. } => ErrorKind::InvalidFloat,
                CoercionError::UnrecognizedOption { .. } => ErrorKind::UnrecognizedOption,
            },
            Self::MissingFlag { .. } => ErrorKind::MissingFlag,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::MissingCommand { .. } => ErrorKind::MissingCommand,
            Self::UnexpectedPositional { .. } => ErrorKind::UnexpectedPositional,
            Self::PrintedHelp => ErrorKind::PrintedHelp,
            Self::Bind(_) => ErrorKind::Bind,
        }
    }

    /// Returns `true` for the help signal.
    pub fn is_help(&self) -> bool {
        matches!(self, Self::PrintedHelp)
    }

    /// Process exit code for a thin CLI wrapper: 0 after help, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_help() { 0 } else { 1 }
    }
}

/// Errors raised while binding a parse result to a typed command.
///
/// These indicate a mismatch between a [`Command`](crate::Command)
/// implementation and its own schema, not bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No flag or positional has this field name.
    #[error("no field named '{0}'")]
    UnknownField(String),
    /// The field has no value but the target type requires one.
    #[error("field '{0}' has no value")]
    Missing(String),
    /// The value has a different shape than the target type.
    #[error("field '{field}' holds {found}, expected {expected}")]
    Mismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A subcommand variant the target type does not know.
    #[error("unknown subcommand variant '{0}'")]
    UnknownSubcommand(String),
    /// The target type expects a subcommand but none was parsed.
    #[error("no subcommand was parsed")]
    MissingSubcommand,
}

impl BindError {
    /// Builds the error for a value of the wrong shape (or no value).
    pub fn mismatch(field: &str, expected: &'static str, value: Option<&Value>) -> Self {
        match value {
            Some(value) => Self::Mismatch {
                field: field.to_string(),
                expected,
                found: value.type_label(),
            },
            None => Self::Missing(field.to_string()),
        }
    }
}
