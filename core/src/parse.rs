//! Recursive-descent token consumer.
//!
//! One [`Parser::parse`] call walks the token stream left to right. Each
//! command level classifies tokens in a fixed priority order:
//!
//! 1. an empty token is an error;
//! 2. `--help` / `-h` print this level's help;
//! 3. `--` ends option processing for the rest of this level;
//! 4. `--name` matches a long flag exactly;
//! 5. a lone `-` is an error;
//! 6. `-abc` is a cluster of switch aliases;
//! 7. a subcommand name hands the rest of the stream to that subcommand;
//! 8. anything else fills the next positional slot.
//!
//! When the stream ends, every level resolves its unpassed flags, then its
//! unfilled positionals, then its subcommand requirement.
//!
//! Configured styles are applied only to a destination that is a terminal.
//! [`Parser::parse`] checks stdout and stderr separately;
//! [`Parser::parse_with`] writes plain text.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::help::PLAIN;
use crate::{
    Diagnostics, HelpRenderer, ParseError, Parsed, ParserConfig, Schema, Styles, SubcommandMatch,
    Value, coerce,
};

/// Parses token sequences against a [`Schema`].
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// let schema = CommandDesc::new("tool")
///     .field(FieldDesc::new("force", ValueKind::Bool))
///     .field(FieldDesc::new("name", ValueKind::String))
///     .alias("force", 'f')
///     .alias("name", 'n')
///     .extract()
///     .unwrap();
///
/// let parsed = Parser::new(&schema).parse(&["-fn", "widget"]).unwrap();
/// assert!(parsed.flag("force"));
/// assert_eq!(parsed.get("name"), Some(&Value::String("widget".into())));
/// ```
pub struct Parser<'a> {
    schema: &'a Schema,
    config: ParserConfig,
    diagnostics: Option<&'a mut Diagnostics>,
}

impl<'a> Parser<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            config: ParserConfig::default(),
            diagnostics: None,
        }
    }

    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Records the active command path and help text into `diagnostics`.
    pub fn diagnostics(mut self, diagnostics: &'a mut Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Parses `args`, writing help to stdout and error reports to stderr.
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Parsed, ParseError> {
        let stdout = io::stdout();
        let stderr = io::stderr();
        let terminals = Terminals {
            out: stdout.is_terminal(),
            err: stderr.is_terminal(),
        };
        self.run(args, &mut stdout.lock(), &mut stderr.lock(), terminals)
    }

    /// Parses `args`, writing help to `out` and error reports to `err`.
    ///
    /// Neither writer is assumed to be a terminal, so output is unstyled.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::PrintedHelp`] after writing help, or the
    /// failure that stopped the parse after writing its report.
    pub fn parse_with<S: AsRef<str>>(
        &mut self,
        args: &[S],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Parsed, ParseError> {
        self.run(args, out, err, Terminals::default())
    }

    fn run<S: AsRef<str>>(
        &mut self,
        args: &[S],
        out: &mut dyn Write,
        err: &mut dyn Write,
        terminals: Terminals,
    ) -> Result<Parsed, ParseError> {
        let mut tokens: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let mut root = self.schema.name.clone();
        if self.config.skip_program_name && !tokens.is_empty() {
            let program = tokens.remove(0);
            root = program_name(program).to_string();
        }

        let out_styles = styles_for(&self.config, terminals.out);
        let err_styles = styles_for(&self.config, terminals.err);
        let mut walker = Walker {
            tokens: &tokens,
            pos: 0,
            config: &self.config,
            out_styles,
            err_styles,
            out,
            diagnostics: self.diagnostics.as_deref_mut(),
            active: String::new(),
        };

        let result = walker.level(self.schema, &root);
        if let Err(error) = &result {
            if !error.is_help() {
                debug!(command = %walker.active, error = %error, "Parse failed");
                let report = HelpRenderer::new(err_styles).error(error, &walker.active);
                let written = err.write_all(report.as_bytes()).and_then(|()| err.flush());
                if let Err(io_err) = written {
                    debug!(error = %io_err, "Failed to write error report");
                }
            }
        }
        result
    }
}

/// Whether each output destination is a terminal.
#[derive(Debug, Clone, Copy, Default)]
struct Terminals {
    out: bool,
    err: bool,
}

fn styles_for(config: &ParserConfig, terminal: bool) -> &Styles {
    if terminal { &config.styles } else { &PLAIN }
}

/// File name of the program path, or the whole token if it has none.
fn program_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

struct Walker<'t, 'w> {
    tokens: &'t [&'t str],
    pos: usize,
    config: &'t ParserConfig,
    /// Styles for help written to `out`
    out_styles: &'t Styles,
    /// Styles for text bound for the error stream
    err_styles: &'t Styles,
    out: &'w mut dyn Write,
    diagnostics: Option<&'w mut Diagnostics>,
    /// Path of the level any error belongs to
    active: String,
}

struct Level<'s> {
    schema: &'s Schema,
    path: &'s str,
    flags: Vec<Option<Value>>,
    positionals: Vec<Value>,
    trailing: Vec<String>,
    subcommand: Option<SubcommandMatch>,
    options_ended: bool,
}

impl<'t> Walker<'t, '_> {
    fn next(&mut self) -> Option<&'t str> {
        let token = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(token)
    }

    fn enter(&mut self, schema: &Schema, path: &str) {
        self.active.clear();
        self.active.push_str(path);
        if let Some(diagnostics) = self.diagnostics.as_deref_mut() {
            let help = HelpRenderer::new(self.err_styles)
                .width(self.config.line_width)
                .help_text(schema, path);
            diagnostics.update(path, help);
        }
    }

    fn level(&mut self, schema: &Schema, path: &str) -> Result<Parsed, ParseError> {
        self.enter(schema, path);
        let mut level = Level {
            schema,
            path,
            flags: vec![None; schema.flags.len()],
            positionals: Vec::with_capacity(schema.positionals.len()),
            trailing: Vec::new(),
            subcommand: None,
            options_ended: false,
        };

        while let Some(token) = self.next() {
            trace!(command = path, token, options_ended = level.options_ended, "Consuming token");

            if level.options_ended {
                level.positional(token, self.config)?;
                continue;
            }

            match token {
                "" => return Err(ParseError::EmptyArgument),
                "--help" | "-h" => {
                    let help = HelpRenderer::new(self.out_styles)
                        .width(self.config.line_width)
                        .help_text(schema, path);
                    let written = self.out.write_all(help.as_bytes()).and_then(|()| self.out.flush());
                    if let Err(err) = written {
                        debug!(command = path, error = %err, "Failed to write help");
                    }
                    return Err(ParseError::PrintedHelp);
                }
                "--" => level.options_ended = true,
                "-" => {
                    return Err(ParseError::UnrecognizedArgument {
                        token: token.to_string(),
                    });
                }
                _ if token.starts_with("--") => self.long_flag(&mut level, token)?,
                _ if token.starts_with('-') => self.switches(&mut level, token)?,
                _ => match schema.find_subcommand(token) {
                    Some(sub) => {
                        let sub_path = format!("{path} {}", sub.name);
                        debug!(command = path, subcommand = %sub.name, "Entering subcommand");
                        let parsed = self.level(&sub.schema, &sub_path)?;
                        level.subcommand = Some(SubcommandMatch {
                            variant: sub.variant.clone(),
                            name: sub.name.clone(),
                            parsed,
                        });
                        break;
                    }
                    None => level.positional(token, self.config)?,
                },
            }
        }

        let descended = level.subcommand.is_some();
        level.finish().inspect_err(|_| {
            if descended {
                self.enter(schema, path);
            }
        })
    }

    fn long_flag(&mut self, level: &mut Level<'_>, token: &str) -> Result<(), ParseError> {
        let index = level
            .schema
            .find_flag(token)
            .ok_or_else(|| ParseError::UnrecognizedFlag {
                flag: token.to_string(),
            })?;
        self.set_flag(level, index, token)
    }

    fn switches(&mut self, level: &mut Level<'_>, token: &str) -> Result<(), ParseError> {
        let cluster = &token[1..];
        let count = cluster.chars().count();

        for (i, switch) in cluster.chars().enumerate() {
            let index = level
                .schema
                .find_alias(switch)
                .ok_or_else(|| ParseError::UnrecognizedSwitch {
                    switch,
                    token: token.to_string(),
                })?;
            let spec = &level.schema.flags[index];
            if spec.takes_value() && i + 1 < count {
                return Err(ParseError::MissingValue {
                    flag: format!("-{switch}"),
                });
            }
            self.set_flag(level, index, &format!("-{switch}"))?;
        }
        Ok(())
    }

    fn set_flag(&mut self, level: &mut Level<'_>, index: usize, written: &str) -> Result<(), ParseError> {
        let spec = &level.schema.flags[index];
        let value = if spec.takes_value() {
            let raw = self.next().ok_or_else(|| ParseError::MissingValue {
                flag: written.to_string(),
            })?;
            coerce(&spec.kind, raw).map_err(|source| ParseError::InvalidValue {
                target: written.to_string(),
                source,
            })?
        } else {
            Value::Bool(true)
        };
        level.flags[index] = Some(value);
        Ok(())
    }
}

impl Level<'_> {
    fn positional(&mut self, token: &str, config: &ParserConfig) -> Result<(), ParseError> {
        match self.schema.positionals.get(self.positionals.len()) {
            Some(spec) => {
                let value = coerce(&spec.kind, token).map_err(|source| ParseError::InvalidValue {
                    target: format!("<{}>", spec.display),
                    source,
                })?;
                self.positionals.push(value);
            }
            None if config.trailing.accepts(self.trailing.len()) => {
                self.trailing.push(token.to_string());
            }
            None => {
                return Err(ParseError::UnexpectedPositional {
                    token: token.to_string(),
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Parsed, ParseError> {
        let schema = self.schema;

        let mut flags = Vec::with_capacity(schema.flags.len());
        for (spec, passed) in schema.flags.iter().zip(self.flags) {
            let value = match passed {
                Some(value) => Some(value),
                None if spec.kind.is_bool() => Some(Value::Bool(false)),
                None if spec.default.is_some() => spec.default.clone(),
                None if spec.optional => None,
                None => {
                    return Err(ParseError::MissingFlag {
                        flag: spec.long.clone(),
                    });
                }
            };
            flags.push((spec.field.clone(), value));
        }

        let mut filled = self.positionals.into_iter();
        let mut positionals = Vec::with_capacity(schema.positionals.len());
        for spec in &schema.positionals {
            let value = match filled.next() {
                Some(value) => Some(value),
                None if spec.default.is_some() => spec.default.clone(),
                None if spec.optional => None,
                None => {
                    return Err(ParseError::MissingArgument {
                        name: spec.display.clone(),
                    });
                }
            };
            positionals.push((spec.field.clone(), value));
        }

        if !schema.subcommands.is_empty() && self.subcommand.is_none() {
            return Err(ParseError::MissingCommand {
                command: self.path.to_string(),
            });
        }

        Ok(Parsed::new(
            self.path.to_string(),
            flags,
            positionals,
            self.subcommand,
            self.trailing,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandDesc, ErrorKind, FieldDesc, TrailingPolicy, ValueKind};

    fn run(schema: &Schema, args: &[&str]) -> (Result<Parsed, ParseError>, String, String) {
        run_with(schema, ParserConfig::default(), args)
    }

    fn run_with(
        schema: &Schema,
        config: ParserConfig,
        args: &[&str],
    ) -> (Result<Parsed, ParseError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = Parser::new(schema)
            .config(config)
            .parse_with(args, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn kind_of(schema: &Schema, args: &[&str]) -> ErrorKind {
        run(schema, args).0.unwrap_err().kind()
    }

    fn tool() -> Schema {
        CommandDesc::new("tool")
            .field(FieldDesc::new("force", ValueKind::Bool))
            .field(FieldDesc::new("name", ValueKind::String).optional())
            .field(FieldDesc::new("count", ValueKind::U8).default_value("1"))
            .field(FieldDesc::new("mode", ValueKind::enumeration(["fast", "safe"])).optional())
            .positional(FieldDesc::new("first", ValueKind::I32).optional())
            .positional(FieldDesc::new("second", ValueKind::I32).optional())
            .alias("force", 'f')
            .alias("name", 'n')
            .alias("count", 'c')
            .extract()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_unpassed_fields() {
        let parsed = run(&tool(), &[]).0.unwrap();
        assert_eq!(parsed.get("force"), Some(&Value::Bool(false)));
        assert_eq!(parsed.get("count"), Some(&Value::Unsigned(1)));
        assert_eq!(parsed.get("name"), None);
        assert_eq!(parsed.get("first"), None);
        assert_eq!(parsed.command(), "tool");
    }

    #[test]
    fn test_switch_cluster_with_trailing_value() {
        let parsed = run(&tool(), &["-fn", "widget"]).0.unwrap();
        assert!(parsed.flag("force"));
        assert_eq!(parsed.get("name").and_then(Value::as_str), Some("widget"));
    }

    #[test]
    fn test_switch_cluster_value_alias_not_last() {
        let (result, _, err) = run(&tool(), &["-nf", "widget"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::MissingValue { flag: "-n".into() }
        );
        assert!(err.starts_with("error: missing value for '-n'"));
    }

    #[test]
    fn test_help_inside_cluster_is_unrecognized() {
        assert_eq!(kind_of(&tool(), &["-fh"]), ErrorKind::UnrecognizedSwitch);
        assert_eq!(kind_of(&tool(), &["-x"]), ErrorKind::UnrecognizedSwitch);
    }

    #[test]
    fn test_double_dash_makes_everything_positional() {
        let parsed = run(&tool(), &["--", "-5", "10"]).0.unwrap();
        assert_eq!(parsed.get("first"), Some(&Value::Signed(-5)));
        assert_eq!(parsed.get("second"), Some(&Value::Signed(10)));

        let parsed = run(&tool(), &["--", "--help"]).0;
        assert_eq!(parsed.unwrap_err().kind(), ErrorKind::InvalidCharacter);
    }

    #[test]
    fn test_negative_number_without_double_dash_is_a_switch() {
        assert_eq!(kind_of(&tool(), &["-5"]), ErrorKind::UnrecognizedSwitch);
    }

    #[test]
    fn test_classification_errors() {
        let schema = tool();
        assert_eq!(kind_of(&schema, &[""]), ErrorKind::EmptyArgument);
        assert_eq!(kind_of(&schema, &["-"]), ErrorKind::UnrecognizedArgument);
        assert_eq!(kind_of(&schema, &["--nope"]), ErrorKind::UnrecognizedFlag);
        assert_eq!(kind_of(&schema, &["--name"]), ErrorKind::MissingValue);
        assert_eq!(kind_of(&schema, &["1", "2", "3"]), ErrorKind::UnexpectedPositional);
    }

    #[test]
    fn test_empty_value_token_is_a_value() {
        let parsed = run(&tool(), &["--name", ""]).0.unwrap();
        assert_eq!(parsed.get("name").and_then(Value::as_str), Some(""));
    }

    #[test]
    fn test_coercion_errors_carry_cause() {
        let schema = tool();
        assert_eq!(kind_of(&schema, &["--count", "300"]), ErrorKind::IntegerOverflow);
        assert_eq!(kind_of(&schema, &["--count", "-1"]), ErrorKind::InvalidCharacter);
        assert_eq!(kind_of(&schema, &["--mode", "Fast"]), ErrorKind::UnrecognizedOption);

        let (result, _, _) = run(&schema, &["x"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::InvalidValue {
                target: "<FIRST>".into(),
                source: crate::CoercionError::InvalidCharacter {
                    token: "x".into(),
                    expected: "i32",
                },
            }
        );
    }

    #[test]
    fn test_repeated_flag_keeps_last_value() {
        let parsed = run(&tool(), &["-c", "2", "--count", "9"]).0.unwrap();
        assert_eq!(parsed.get("count"), Some(&Value::Unsigned(9)));
    }

    #[test]
    fn test_missing_required_flag_names_long_form() {
        let schema = CommandDesc::new("tool")
            .field(FieldDesc::new("required", ValueKind::String))
            .extract()
            .unwrap();
        let (result, out, err) = run(&schema, &[]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::MissingFlag {
                flag: "--required".into()
            }
        );
        assert!(out.is_empty());
        assert_eq!(
            err,
            "error: missing required flag '--required'\nRun 'tool --help' for more information.\n"
        );
    }

    #[test]
    fn test_help_writes_to_out_only() {
        let (result, out, err) = run(&tool(), &["--count", "2", "--help", "--bogus"]);
        assert_eq!(result.unwrap_err(), ParseError::PrintedHelp);
        assert!(out.starts_with("Usage: tool "));
        assert!(err.is_empty());
    }

    #[test]
    fn test_trailing_policies() {
        let schema = CommandDesc::new("run")
            .positional(FieldDesc::new("script", ValueKind::String))
            .extract()
            .unwrap();

        let bounded = ParserConfig {
            trailing: TrailingPolicy::Bounded(2),
            ..ParserConfig::default()
        };
        let parsed = run_with(&schema, bounded.clone(), &["a.sh", "x", "y"]).0.unwrap();
        assert_eq!(parsed.trailing().to_vec(), vec!["x".to_string(), "y".to_string()]);
        let result = run_with(&schema, bounded, &["a.sh", "x", "y", "z"]).0;
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnexpectedPositional { token: "z".into() }
        );

        let unbounded = ParserConfig {
            trailing: TrailingPolicy::Unbounded,
            ..ParserConfig::default()
        };
        let parsed = run_with(&schema, unbounded, &["a.sh", "--", "--x", "-y"]).0.unwrap();
        assert_eq!(parsed.trailing().len(), 2);
    }

    #[test]
    fn test_skip_program_name_uses_file_name() {
        let schema = CommandDesc::new("tool")
            .field(FieldDesc::new("required", ValueKind::String))
            .extract()
            .unwrap();
        let config = ParserConfig {
            skip_program_name: true,
            ..ParserConfig::default()
        };
        let (_, _, err) = run_with(&schema, config, &["/usr/local/bin/mytool"]);
        assert!(err.contains("Run 'mytool --help'"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let schema = tool();
        let args = ["-f", "--mode", "safe", "4"];
        assert_eq!(run(&schema, &args).0, run(&schema, &args).0);
    }

    #[test]
    fn test_writers_get_plain_text_with_styles_configured() {
        colored::control::set_override(true);
        let config = ParserConfig {
            styles: Styles::colorful(),
            ..ParserConfig::default()
        };
        let mut diagnostics = Diagnostics::new();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = Parser::new(&tool())
            .config(config.clone())
            .diagnostics(&mut diagnostics)
            .parse_with(&["--bogus"], &mut out, &mut err);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnrecognizedFlag);
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("error: unrecognized flag '--bogus'"));
        assert!(!err.contains("\x1b["));
        assert!(!diagnostics.help.contains("\x1b["));

        let (result, out, _) = run_with(&tool(), config, &["--help"]);
        assert!(result.unwrap_err().is_help());
        assert!(out.starts_with("Usage: tool"));
        assert!(!out.contains("\x1b["));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_write_failures_keep_parse_outcome() {
        let schema = tool();

        let result = Parser::new(&schema).parse_with(&["--help"], &mut ClosedPipe, &mut ClosedPipe);
        assert_eq!(result.unwrap_err(), ParseError::PrintedHelp);

        let result = Parser::new(&schema).parse_with(&["--bogus"], &mut ClosedPipe, &mut ClosedPipe);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnrecognizedFlag);
    }
}
