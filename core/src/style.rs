//! Help and error styling.
//!
//! Each semantic [`Role`] in rendered output maps to an optional
//! [`Style`]. An empty [`Styles`] set renders plain text without touching
//! the terminal layer at all. With styles present, painting goes through
//! `colored`, which also honors `NO_COLOR` and `CLICOLOR_FORCE`. Callers
//! pick the style set per destination: the parser uses [`Styles::empty`]
//! for any writer that is not a terminal.

use std::str::FromStr;

use colored::{Color, Colorize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Semantic role of a piece of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Section headers and the `Usage:` label
    Header,
    /// Items of the usage synopsis
    Usage,
    /// Command paths and subcommand names
    Command,
    /// Flag and switch names
    Option,
    /// Free text
    Description,
    /// The `error:` label
    Error,
}

/// Text attributes for one role.
///
/// # Examples
///
/// ```
/// use argot_core::Style;
/// use colored::Color;
///
/// let style = Style::new().fg(Color::Green).bold();
/// assert!(!style.is_plain());
/// assert!(Style::new().is_plain());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_color",
        deserialize_with = "deserialize_color"
    )]
    pub color: Option<Color>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub dimmed: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            color: None,
            bold: false,
            underline: false,
            dimmed: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn dimmed(mut self) -> Self {
        self.dimmed = true;
        self
    }

    /// Returns `true` when the style sets no attribute.
    pub fn is_plain(&self) -> bool {
        *self == Self::new()
    }

    /// Applies this style to `text`.
    pub fn paint(&self, text: &str) -> String {
        let mut out = text.normal();
        if let Some(color) = self.color {
            out = out.color(color);
        }
        if self.bold {
            out = out.bold();
        }
        if self.underline {
            out = out.underline();
        }
        if self.dimmed {
            out = out.dimmed();
        }
        out.to_string()
    }
}

/// Role-to-style mapping used by the help renderer and error reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub header: Option<Style>,
    pub usage: Option<Style>,
    pub command: Option<Style>,
    pub option: Option<Style>,
    pub description: Option<Style>,
    pub error: Option<Style>,
}

impl Styles {
    /// A style set that renders plain text.
    pub const fn empty() -> Self {
        Self {
            header: None,
            usage: None,
            command: None,
            option: None,
            description: None,
            error: None,
        }
    }

    /// A conventional colored theme.
    pub const fn colorful() -> Self {
        Self {
            header: Some(Style::new().fg(Color::Yellow).bold().underline()),
            usage: None,
            command: Some(Style::new().fg(Color::Green).bold()),
            option: Some(Style::new().fg(Color::Cyan)),
            description: None,
            error: Some(Style::new().fg(Color::Red).bold()),
        }
    }

    /// Returns `true` when no role carries a non-plain style.
    pub fn is_empty(&self) -> bool {
        [
            self.header,
            self.usage,
            self.command,
            self.option,
            self.description,
            self.error,
        ]
        .iter()
        .all(|s| s.is_none_or(|s| s.is_plain()))
    }

    pub fn get(&self, role: Role) -> Option<&Style> {
        match role {
            Role::Header => self.header.as_ref(),
            Role::Usage => self.usage.as_ref(),
            Role::Command => self.command.as_ref(),
            Role::Option => self.option.as_ref(),
            Role::Description => self.description.as_ref(),
            Role::Error => self.error.as_ref(),
        }
    }

    /// Paints `text` for `role`, or returns it unchanged when the role has
    /// no style.
    pub fn paint(&self, role: Role, text: &str) -> String {
        match self.get(role) {
            Some(style) if !style.is_plain() => style.paint(text),
            _ => text.to_string(),
        }
    }
}

fn color_name(color: Color) -> String {
    let name = match color {
        Color::Black => "black",
        Color::Red => "red",
        Color::Green => "green",
        Color::Yellow => "yellow",
        Color::Blue => "blue",
        Color::Magenta => "magenta",
        Color::Cyan => "cyan",
        Color::White => "white",
        Color::BrightBlack => "bright black",
        Color::BrightRed => "bright red",
        Color::BrightGreen => "bright green",
        Color::BrightYellow => "bright yellow",
        Color::BrightBlue => "bright blue",
        Color::BrightMagenta => "bright magenta",
        Color::BrightCyan => "bright cyan",
        Color::BrightWhite => "bright white",
        Color::TrueColor { r, g, b } => return format!("#{r:02x}{g:02x}{b:02x}"),
    };
    name.to_string()
}

fn parse_color(name: &str) -> Option<Color> {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::TrueColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }
    Color::from_str(name).ok()
}

fn serialize_color<S: Serializer>(color: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error> {
    match color {
        Some(color) => serializer.serialize_str(&color_name(*color)),
        None => serializer.serialize_none(),
    }
}

fn deserialize_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Color>, D::Error> {
    let Some(name) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_color(&name)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown color '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_styles_leave_text_alone() {
        let styles = Styles::empty();
        assert!(styles.is_empty());
        assert_eq!(styles.paint(Role::Header, "Options:"), "Options:");
    }

    #[test]
    fn test_plain_styles_count_as_empty() {
        let styles = Styles {
            header: Some(Style::new()),
            ..Styles::empty()
        };
        assert!(styles.is_empty());
        assert!(!Styles::colorful().is_empty());
    }

    #[test]
    fn test_color_names_round_trip() {
        for color in [
            Color::Red,
            Color::BrightBlue,
            Color::TrueColor { r: 1, g: 171, b: 255 },
        ] {
            assert_eq!(parse_color(&color_name(color)), Some(color));
        }
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("no-such-color"), None);
    }

    #[test]
    fn test_styles_deserialize() {
        let json = r##"{"header": {"color": "yellow", "bold": true}, "error": {"color": "#ff0000"}}"##;
        let styles: Styles = serde_json::from_str(json).unwrap();
        assert_eq!(styles.header, Some(Style::new().fg(Color::Yellow).bold()));
        assert_eq!(
            styles.error.and_then(|s| s.color),
            Some(Color::TrueColor { r: 255, g: 0, b: 0 })
        );
        assert!(styles.usage.is_none());

        let bad = r#"{"header": {"color": "chartreuse-ish"}}"#;
        assert!(serde_json::from_str::<Styles>(bad).is_err());
    }
}
