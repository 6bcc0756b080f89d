//! Typed commands.
//!
//! A [`Command`] pairs a cached [`Schema`] with a conversion from
//! [`Parsed`] into a user type. [`Subcommand`] does the same for the enum
//! selected at a subcommand level.
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use argot_core::*;
//!
//! struct Build {
//!     release: bool,
//!     jobs: u32,
//!     target: Option<String>,
//! }
//!
//! impl Command for Build {
//!     fn schema() -> &'static Schema {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             CommandDesc::new("build")
//!                 .field(FieldDesc::new("release", ValueKind::Bool))
//!                 .field(FieldDesc::new("jobs", ValueKind::U32).default_value("4"))
//!                 .positional(FieldDesc::new("target", ValueKind::String).optional())
//!                 .alias("jobs", 'j')
//!                 .extract()
//!                 .expect("valid build description")
//!         })
//!     }
//!
//!     fn from_parsed(mut parsed: Parsed) -> Result<Self, BindError> {
//!         Ok(Build {
//!             release: parsed.take("release")?,
//!             jobs: parsed.take("jobs")?,
//!             target: parsed.take("target")?,
//!         })
//!     }
//! }
//!
//! let build: Build = parse_args(&["--release", "-j", "8"], ParserConfig::default()).unwrap();
//! assert!(build.release);
//! assert_eq!(build.jobs, 8);
//! assert_eq!(build.target, None);
//! ```

use std::process;

use crate::{BindError, ParseError, Parsed, Parser, ParserConfig, Schema, SubcommandMatch};

/// A type that can be parsed from the command line.
pub trait Command: Sized {
    /// The schema for this command, extracted once and cached.
    fn schema() -> &'static Schema;

    /// Builds the value from a successful parse.
    fn from_parsed(parsed: Parsed) -> Result<Self, BindError>;
}

/// An enum selected by a subcommand.
pub trait Subcommand: Sized {
    /// Builds the variant named by `sub.variant` from its nested parse.
    fn from_match(sub: SubcommandMatch) -> Result<Self, BindError>;
}

/// Parses `args` into `T`, writing help to stdout and errors to stderr.
///
/// # Errors
///
/// Any [`ParseError`]; binding failures surface as [`ParseError::Bind`].
pub fn parse_args<T: Command, S: AsRef<str>>(
    args: &[S],
    config: ParserConfig,
) -> Result<T, ParseError> {
    let parsed = Parser::new(T::schema()).config(config).parse(args)?;
    Ok(T::from_parsed(parsed)?)
}

/// Parses the process arguments into `T`, exiting on help or failure.
///
/// The program path is skipped and its file name becomes the root command
/// path in help and error output. Exits with 0 after printing help and 1
/// after a failure.
pub fn from_env<T: Command>() -> T {
    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let config = ParserConfig {
        skip_program_name: true,
        ..ParserConfig::default()
    };

    match parse_args::<T, _>(&args, config) {
        Ok(command) => command,
        Err(ParseError::Bind(err)) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
        Err(err) => process::exit(err.exit_code()),
    }
}
