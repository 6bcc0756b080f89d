//! Usage and help rendering.
//!
//! Help is derived from the same [`Schema`] the parser consumes, so it
//! cannot drift from behavior. Rendering is a pure function of the schema,
//! the command path, the style set and the line budget.
//!
//! ```text
//! Usage: tool [-f | --force] -n | --name <str> <FILE> <command>
//!
//! Options:
//!   -f, --force      Overwrite existing files
//!   -n, --name <str> Name of the thing
//!   -h, --help       Print help
//! ```

use crate::style::{Role, Styles};
use crate::{ParseError, Schema};

/// Default line budget for the usage synopsis.
pub const DEFAULT_LINE_WIDTH: usize = 80;

pub(crate) static PLAIN: Styles = Styles::empty();

/// Renders the full help text without styling.
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// let schema = CommandDesc::new("tool")
///     .field(FieldDesc::new("force", ValueKind::Bool))
///     .alias("force", 'f')
///     .extract()
///     .unwrap();
///
/// let help = help::render(&schema, "tool");
/// assert!(help.starts_with("Usage: tool [-f | --force]\n"));
/// assert_eq!(help, help::render(&schema, "tool"));
/// ```
pub fn render(schema: &Schema, path: &str) -> String {
    HelpRenderer::new(&PLAIN).render(schema, path)
}

/// Renders the usage synopsis without styling.
pub fn usage(schema: &Schema, path: &str) -> String {
    HelpRenderer::new(&PLAIN).usage(schema, path)
}

/// Help renderer with a style set and line budget.
#[derive(Debug, Clone, Copy)]
pub struct HelpRenderer<'a> {
    styles: &'a Styles,
    width: usize,
}

struct Row {
    name: String,
    role: Role,
    description: Option<String>,
}

impl<'a> HelpRenderer<'a> {
    pub fn new(styles: &'a Styles) -> Self {
        Self {
            styles,
            width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Sets the line budget for usage wrapping.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    fn paint(&self, role: Role, text: &str) -> String {
        self.styles.paint(role, text)
    }

    /// Help text for one command level: the schema's custom help if it
    /// declares one, the generated help otherwise.
    pub fn help_text(&self, schema: &Schema, path: &str) -> String {
        match &schema.custom_help {
            Some(help) => help.clone(),
            None => self.render(schema, path),
        }
    }

    /// Renders the usage synopsis, wrapped at the line budget.
    ///
    /// Continuation lines are indented to the column of the first item.
    /// Widths are measured on unstyled text.
    pub fn usage(&self, schema: &Schema, path: &str) -> String {
        let prefix = "Usage:";
        let indent = prefix.len() + 1 + path.chars().count() + 1;

        let mut out = format!(
            "{} {}",
            self.paint(Role::Header, prefix),
            self.paint(Role::Command, path)
        );
        let mut column = indent - 1;
        let mut first = true;

        for item in usage_items(schema) {
            let width = item.chars().count();
            let painted = self.paint(Role::Usage, &item);
            if !first && column + 1 + width > self.width {
                out.push('\n');
                out.push_str(&" ".repeat(indent));
                out.push_str(&painted);
                column = indent + width;
            } else {
                out.push(' ');
                out.push_str(&painted);
                column += 1 + width;
            }
            first = false;
        }

        out
    }

    /// Renders the full help text.
    pub fn render(&self, schema: &Schema, path: &str) -> String {
        let mut blocks = vec![self.usage(schema, path)];

        if let Some(about) = &schema.about {
            blocks.push(self.paint(Role::Description, about));
        }

        blocks.push(self.section("Options:", &option_rows(schema)));

        if !schema.positionals.is_empty() {
            let rows: Vec<Row> = schema
                .positionals
                .iter()
                .map(|p| Row {
                    name: format!("<{}>", p.display),
                    role: Role::Option,
                    description: p.description.clone(),
                })
                .collect();
            blocks.push(self.section("Arguments:", &rows));
        }

        if !schema.subcommands.is_empty() {
            let rows: Vec<Row> = schema
                .subcommands
                .iter()
                .map(|s| Row {
                    name: s.name.clone(),
                    role: Role::Command,
                    description: s.description.clone(),
                })
                .collect();
            blocks.push(self.section("Commands:", &rows));
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }

    /// Renders a parse failure report for the command level at `path`.
    pub fn error(&self, error: &ParseError, path: &str) -> String {
        format!(
            "{} {error}\nRun '{path} --help' for more information.\n",
            self.paint(Role::Error, "error:")
        )
    }

    // The description column starts one space past the longest name in
    // this section.
    fn section(&self, title: &str, rows: &[Row]) -> String {
        let name_width = rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = vec![self.paint(Role::Header, title)];
        for row in rows {
            let mut line = format!("  {}", self.paint(row.role, &row.name));
            if let Some(desc) = &row.description {
                let pad = name_width - row.name.chars().count() + 1;
                line.push_str(&" ".repeat(pad));
                line.push_str(&self.paint(Role::Description, desc));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn usage_items(schema: &Schema) -> Vec<String> {
    let mut items = Vec::new();

    for flag in &schema.flags {
        let mut body = match flag.alias {
            Some(alias) => format!("-{alias} | {}", flag.long),
            None => flag.long.clone(),
        };
        if flag.takes_value() {
            body.push_str(&format!(" <{}>", flag.placeholder));
        }
        if flag.is_required() {
            items.push(body);
        } else {
            items.push(format!("[{body}]"));
        }
    }

    for positional in &schema.positionals {
        if positional.is_required() {
            items.push(format!("<{}>", positional.display));
        } else {
            items.push(format!("[<{}>]", positional.display));
        }
    }

    if !schema.subcommands.is_empty() {
        items.push("<command>".to_string());
    }

    items
}

fn option_rows(schema: &Schema) -> Vec<Row> {
    let mut rows = Vec::new();

    for flag in &schema.flags {
        let mut name = match flag.alias {
            Some(alias) => format!("-{alias}, {}", flag.long),
            None => format!("    {}", flag.long),
        };
        if flag.takes_value() {
            name.push_str(&format!(" <{}>", flag.placeholder));
        }
        rows.push(Row {
            name,
            role: Role::Option,
            description: flag.description.clone(),
        });

        for variant in flag.kind.variants() {
            rows.push(Row {
                name: format!("      {}", variant.token()),
                role: Role::Option,
                description: variant.description.clone(),
            });
        }
    }

    rows.push(Row {
        name: "-h, --help".to_string(),
        role: Role::Option,
        description: Some("Print help".to_string()),
    });

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandDesc, FieldDesc, ValueKind, Variant};

    fn sample() -> Schema {
        CommandDesc::new("tool")
            .about("Does tool things.")
            .field(FieldDesc::new("force", ValueKind::Bool))
            .field(FieldDesc::new("name", ValueKind::String))
            .field(FieldDesc::new("count", ValueKind::U32).default_value("3"))
            .field(FieldDesc::new(
                "mode",
                ValueKind::Enum(vec![
                    Variant::new("fast").with_description("Skip checks"),
                    Variant::new("safe"),
                ]),
            ).optional())
            .positional(FieldDesc::new("input", ValueKind::String))
            .positional(FieldDesc::new("output", ValueKind::String).optional())
            .alias("force", 'f')
            .alias("name", 'n')
            .describe("force", "Overwrite existing files")
            .describe("name", "Name of the thing")
            .describe("mode", "How to run")
            .describe("input", "Input file")
            .extract()
            .unwrap()
    }

    #[test]
    fn test_render_golden() {
        let expected = "\
Usage: tool [-f | --force] -n | --name <str> [--count <u32>] [--mode <mode>]
            <INPUT> [<OUTPUT>]

Does tool things.

Options:
  -f, --force       Overwrite existing files
  -n, --name <str>  Name of the thing
      --count <u32>
      --mode <mode> How to run
        fast        Skip checks
        safe
  -h, --help        Print help

Arguments:
  <INPUT>  Input file
  <OUTPUT>
";
        assert_eq!(render(&sample(), "tool"), expected);
    }

    #[test]
    fn test_render_is_pure() {
        let schema = sample();
        assert_eq!(render(&schema, "tool"), render(&schema, "tool"));
    }

    #[test]
    fn test_commands_section_and_path() {
        let schema = CommandDesc::new("git")
            .subcommand(CommandDesc::new("Add").about("Add files"))
            .subcommand(CommandDesc::new("RemoteAdd").about("Add a remote"))
            .extract()
            .unwrap();

        let expected = "\
Usage: git <command>

Options:
  -h, --help Print help

Commands:
  add        Add files
  remote-add Add a remote
";
        assert_eq!(render(&schema, "git"), expected);
    }

    #[test]
    fn test_usage_wraps_under_first_item() {
        let mut desc = CommandDesc::new("wrap");
        for name in ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"] {
            desc = desc.field(FieldDesc::new(name, ValueKind::Bool));
        }
        let schema = desc.extract().unwrap();

        let usage = HelpRenderer::new(&PLAIN).width(40).usage(&schema, "wrap");
        let expected = "\
Usage: wrap [--alpha] [--bravo]
            [--charlie] [--delta]
            [--echo] [--foxtrot]";
        assert_eq!(usage, expected);
        for line in usage.lines() {
            assert!(line.chars().count() <= 40);
        }
    }

    #[test]
    fn test_usage_is_first_block_of_render() {
        let schema = sample();
        let usage = usage(&schema, "tool");
        assert!(usage.starts_with("Usage: tool [-f | --force]"));
        assert!(render(&schema, "tool").starts_with(&format!("{usage}\n\n")));
    }

    #[test]
    fn test_usage_keeps_oversized_first_item() {
        let schema = CommandDesc::new("x")
            .field(FieldDesc::new("an_extremely_long_flag_name", ValueKind::String))
            .extract()
            .unwrap();

        let usage = HelpRenderer::new(&PLAIN).width(10).usage(&schema, "x");
        assert_eq!(usage, "Usage: x --an-extremely-long-flag-name <str>");
    }

    #[test]
    fn test_custom_help_replaces_generated() {
        let schema = CommandDesc::new("x")
            .custom_help("hand written\n")
            .extract()
            .unwrap();
        assert_eq!(HelpRenderer::new(&PLAIN).help_text(&schema, "x"), "hand written\n");
    }

    #[test]
    fn test_styled_width_ignores_escape_sequences() {
        colored::control::set_override(true);
        let styles = Styles::colorful();
        let schema = sample();

        let styled = HelpRenderer::new(&styles).render(&schema, "tool");
        assert!(styled.contains("\x1b["));
        assert_eq!(strip_ansi(&styled), render(&schema, "tool"));
    }

    #[test]
    fn test_error_report() {
        let err = ParseError::UnrecognizedFlag {
            flag: "--nope".into(),
        };
        assert_eq!(
            HelpRenderer::new(&PLAIN).error(&err, "git add"),
            "error: unrecognized flag '--nope'\nRun 'git add --help' for more information.\n"
        );
    }

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }
}
