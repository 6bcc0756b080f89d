//! Declarative command-line argument parsing.
//!
//! A command is described once, as data, and everything else is derived
//! from that description:
//!
//! - [`CommandDesc`] / [`FieldDesc`]: fields, an ordered positional group,
//!   subcommand variants, and side tables for switch aliases and
//!   descriptions. Buildable in code or loadable with serde.
//! - [`CommandDesc::extract`]: validates the description ([`validate`])
//!   and derives an immutable [`Schema`].
//! - [`Parser`]: the recursive-descent consumer that turns a token
//!   sequence into a [`Parsed`] result or a [`ParseError`].
//! - [`help`]: usage and help text rendered from the same schema.
//! - [`Command`] / [`FromValue`]: typed binding of a parse result into
//!   user structs and enums.
//!
//! # Example
//!
//! ```
//! use argot_core::*;
//!
//! let schema = CommandDesc::new("git")
//!     .field(FieldDesc::new("verbose", ValueKind::Bool))
//!     .alias("verbose", 'v')
//!     .subcommand(
//!         CommandDesc::new("Remove")
//!             .about("Remove files")
//!             .field(FieldDesc::new("all", ValueKind::Bool)),
//!     )
//!     .extract()
//!     .unwrap();
//!
//! let parsed = Parser::new(&schema).parse(&["remove", "--all"]).unwrap();
//! assert!(!parsed.flag("verbose"));
//!
//! let remove = parsed.subcommand().unwrap();
//! assert_eq!(remove.variant, "Remove");
//! assert!(remove.parsed.flag("all"));
//! assert_eq!(remove.parsed.command(), "git remove");
//! ```

mod coerce;
mod command;
mod config;
mod describe;
mod diagnostics;
mod error;
mod extract;
pub mod help;
mod parse;
mod parsed;
mod style;
mod types;
mod validate;

pub use coerce::{CoercionError, coerce};
pub use command::{Command, Subcommand, from_env, parse_args};
pub use config::{ParserConfig, TrailingPolicy};
pub use describe::{CommandDesc, FieldDesc};
pub use diagnostics::Diagnostics;
pub use error::{BindError, ErrorKind, ParseError};
pub use extract::{hyphenate, kebab_case};
pub use help::HelpRenderer;
pub use parse::Parser;
pub use parsed::{FromValue, Parsed, SubcommandMatch};
pub use style::{Role, Style, Styles};
pub use types::*;
pub use validate::{ValidationError, validate};
