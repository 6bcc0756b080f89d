use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use argot_core::{
    CommandDesc, Diagnostics, HelpRenderer, ParserConfig, Schema, Styles, TrailingPolicy,
    ValidationError,
};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::debug;

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argot", version, disable_help_subcommand = true)]
#[command(about = "Check, document and exercise declarative command descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more command description files.
    Check(CheckArgs),
    /// Print the help text derived from a command description.
    Help(HelpArgs),
    /// Parse arguments against a command description and print the result.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Description files (JSON when the extension is .json, YAML otherwise).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Description file.
    input: PathBuf,
    /// Subcommand path to document (e.g. `remote add`).
    path: Vec<String>,
    /// Line budget for the usage synopsis.
    #[arg(long)]
    width: Option<usize>,
    /// Use the built-in color theme.
    #[arg(long)]
    color: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Description file.
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Extra positional tokens: `reject`, `unbounded`, or a maximum count.
    #[arg(long, value_parser = TrailingPolicy::from_str)]
    trailing: Option<TrailingPolicy>,
    /// Treat the first argument as the program path.
    #[arg(long)]
    skip_program_name: bool,
    /// Use the built-in color theme for help and errors.
    #[arg(long)]
    color: bool,
    /// Print the failing command level's help after an error.
    #[arg(long)]
    help_on_error: bool,
    /// Arguments to parse, after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// A command description file: the description itself, plus an optional
/// `config` section with parser settings.
#[derive(Debug, Deserialize)]
struct DescriptionFile {
    #[serde(flatten)]
    command: CommandDesc,
    #[serde(default)]
    config: ParserConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Help(args) => run_help(args),
        Command::Parse(args) => run_parse(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failures = Vec::new();

    for path in &args.inputs {
        match load_description(path).and_then(|file| extract(path, &file.command)) {
            Ok(schema) => println!(
                "{}: ok ({} command level(s))",
                path.display(),
                count_levels(&schema)
            ),
            Err(err) => failures.push(err),
        }
    }

    if !failures.is_empty() {
        return Err(failures.join("\n"));
    }

    println!("Validated {} description file(s).", args.inputs.len());
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let file = load_description(&args.input)?;
    let schema = extract(&args.input, &file.command)?;
    let (level, path) = select_level(&schema, &args.path)?;

    let mut config = file.config;
    if let Some(width) = args.width {
        config.line_width = width;
    }
    if args.color {
        config.styles = Styles::colorful();
    }

    let help = HelpRenderer::new(&config.styles)
        .width(config.line_width)
        .help_text(level, &path);
    print!("{help}");
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let file = load_description(&args.input)?;
    let schema = extract(&args.input, &file.command)?;

    let mut config = file.config;
    if let Some(trailing) = args.trailing {
        config.trailing = trailing;
    }
    if args.skip_program_name {
        config.skip_program_name = true;
    }
    if args.color {
        config.styles = Styles::colorful();
    }

    let mut diagnostics = Diagnostics::new();
    let result = argot_core::Parser::new(&schema)
        .config(config)
        .diagnostics(&mut diagnostics)
        .parse(args.args.as_slice());

    let parsed = match result {
        Ok(parsed) => parsed,
        Err(err) => {
            // The parser has already written help or the error report.
            if args.help_on_error && !err.is_help() {
                eprintln!();
                diagnostics.print_help();
            }
            std::process::exit(err.exit_code());
        }
    };

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&parsed)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
        OutputFormat::Yaml => {
            serde_yaml::to_string(&parsed).map_err(|e| format!("Failed to serialize output: {e}"))?
        }
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn load_description(path: &Path) -> Result<DescriptionFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let file: DescriptionFile = if is_json {
        serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?
    } else {
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?
    };

    debug!(path = %path.display(), command = %file.command.name, "Loaded command description");
    Ok(file)
}

fn extract(path: &Path, desc: &CommandDesc) -> Result<Schema, String> {
    desc.extract().map_err(|errors| describe_errors(path, &errors))
}

fn describe_errors(path: &Path, errors: &[ValidationError]) -> String {
    let mut message = format!("'{}' is not a valid description:", path.display());
    for err in errors {
        message.push_str(&format!("\n  - {err}"));
    }
    message
}

fn select_level<'a>(schema: &'a Schema, names: &[String]) -> Result<(&'a Schema, String), String> {
    let mut level = schema;
    let mut path = schema.name.clone();

    for name in names {
        let sub = level
            .find_subcommand(name)
            .ok_or_else(|| format!("'{path}' has no subcommand '{name}'"))?;
        path = format!("{path} {}", sub.name);
        level = &sub.schema;
    }

    Ok((level, path))
}

fn count_levels(schema: &Schema) -> usize {
    1 + schema
        .subcommands
        .iter()
        .map(|sub| count_levels(&sub.schema))
        .sum::<usize>()
}
