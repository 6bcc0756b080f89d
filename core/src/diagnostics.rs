//! Caller-owned record of the active command level.

/// The command path and help text of the level the parser reached last.
///
/// Overwritten on entry to every command level, so after a failure it
/// describes the deepest level, which is the one whose help is relevant.
///
/// # Examples
///
/// ```
/// use argot_core::*;
///
/// let schema = CommandDesc::new("git")
///     .subcommand(CommandDesc::new("Add"))
///     .extract()
///     .unwrap();
///
/// let mut diagnostics = Diagnostics::new();
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let result = Parser::new(&schema)
///     .diagnostics(&mut diagnostics)
///     .parse_with(&["add", "--bogus"], &mut out, &mut err);
///
/// assert!(result.is_err());
/// assert_eq!(diagnostics.command, "git add");
/// assert!(diagnostics.help.starts_with("Usage: git add"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Space-separated command path (e.g. "git remote-add")
    pub command: String,
    /// Custom or generated help for that level
    pub help: String,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, command: &str, help: String) {
        self.command.clear();
        self.command.push_str(command);
        self.help = help;
    }

    /// Writes the captured help text to stderr.
    pub fn print_help(&self) {
        eprint!("{}", self.help);
    }
}
