//! Schema type definitions for argument parsing.
//!
//! These are the *derived* types: a [`Schema`] is produced once from a
//! [`CommandDesc`](crate::CommandDesc) by the extractor and is read-only
//! afterwards. Every flag name, alias and display name the parser and the
//! help renderer need is computed at extraction time and stored here.

use serde::{Deserialize, Serialize, Serializer};

/// Value kind for flags and positionals.
///
/// Describes how a raw token is coerced into a [`Value`].
///
/// # Examples
///
/// ```
/// use argot_core::{ValueKind, Variant};
///
/// assert!(ValueKind::Bool.is_bool());
/// assert_eq!(ValueKind::U32.type_name(), "u32");
///
/// let mode = ValueKind::Enum(vec![Variant::new("fast"), Variant::new("safe")]);
/// assert_eq!(mode.type_name(), "enum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Presence flag; never consumes a token.
    Bool,
    /// UTF-8 string, taken verbatim.
    #[serde(alias = "str")]
    String,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    /// 64-bit floating point.
    #[serde(alias = "f64")]
    Float,
    /// Closed set of variants, matched against their hyphenated names.
    Enum(Vec<Variant>),
}

impl ValueKind {
    /// Builds an enum kind from bare variant names.
    pub fn enumeration<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(names.into_iter().map(Variant::new).collect())
    }

    /// Returns `true` for the boolean presence kind.
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Short type label used in placeholders and coercion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "str",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Float => "f64",
            Self::Enum(_) => "enum",
        }
    }

    /// Enum variants, if this is an enum kind.
    pub fn variants(&self) -> &[Variant] {
        match self {
            Self::Enum(variants) => variants,
            _ => &[],
        }
    }
}

/// One variant of an enum kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Declared variant name (underscores are matched as hyphens).
    pub name: String,
    /// Optional description, rendered under the owning flag in help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Variant {
    /// Creates a variant without a description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// The token form users type for this variant.
    pub fn token(&self) -> String {
        crate::extract::hyphenate(&self.name)
    }
}

/// A coerced value.
///
/// Serializes as the plain JSON scalar; enum values serialize as their
/// canonical token.
///
/// # Examples
///
/// ```
/// use argot_core::Value;
///
/// assert_eq!(Value::Unsigned(10).to_token(), "10");
/// assert_eq!(Value::Signed(-5).as_i64(), Some(-5));
/// assert_eq!(Value::Bool(true).as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    /// Enum value: index into the kind's variants and the hyphenated name.
    Enum { index: usize, name: String },
}

impl Value {
    /// Canonical token form; coercing it with the same kind yields this
    /// value again.
    pub fn to_token(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Unsigned(n) => n.to_string(),
            Self::Signed(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Enum { name, .. } => name.clone(),
        }
    }

    /// Human label for the value's shape, used in binding errors.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a boolean",
            Self::String(_) => "a string",
            Self::Unsigned(_) => "an unsigned integer",
            Self::Signed(_) => "a signed integer",
            Self::Float(_) => "a float",
            Self::Enum { .. } => "an enum variant",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Unsigned(n) => Some(*n),
            Self::Signed(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Signed(n) => Some(*n),
            Self::Unsigned(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Hyphenated variant name of an enum value.
    pub fn variant(&self) -> Option<&str> {
        match self {
            Self::Enum { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::String(s) => serializer.serialize_str(s),
            Self::Unsigned(n) => serializer.serialize_u64(*n),
            Self::Signed(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Enum { name, .. } => serializer.serialize_str(name),
        }
    }
}

/// A named flag, `--long` with an optional `-a` switch alias.
///
/// # Examples
///
/// ```
/// use argot_core::{CommandDesc, FieldDesc, ValueKind};
///
/// let schema = CommandDesc::new("tool")
///     .field(FieldDesc::new("dry_run", ValueKind::Bool))
///     .alias("dry_run", 'n')
///     .extract()
///     .unwrap();
///
/// let flag = &schema.flags[0];
/// assert_eq!(flag.long, "--dry-run");
/// assert_eq!(flag.alias, Some('n'));
/// assert!(!flag.is_required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    /// Declared field name (e.g. "dry_run")
    pub field: String,
    /// Long form including dashes (e.g. "--dry-run")
    pub long: String,
    /// Single-character switch alias
    pub alias: Option<char>,
    /// Kind of value this flag carries
    pub kind: ValueKind,
    /// Absence yields no value instead of an error
    pub optional: bool,
    /// Value used when the flag is not passed
    pub default: Option<Value>,
    /// Description from the description table
    pub description: Option<String>,
    /// Placeholder rendered after the flag in usage text
    pub placeholder: String,
}

impl FlagSpec {
    /// Returns `true` when absence is a parse error.
    pub fn is_required(&self) -> bool {
        !self.kind.is_bool() && !self.optional && self.default.is_none()
    }

    /// Returns `true` when the flag consumes the following token.
    pub fn takes_value(&self) -> bool {
        !self.kind.is_bool()
    }
}

/// A positional parameter, matched to tokens in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalSpec {
    /// Declared field name
    pub field: String,
    /// Upper-cased display name (e.g. "FILE")
    pub display: String,
    pub kind: ValueKind,
    pub optional: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl PositionalSpec {
    /// Returns `true` when an unfilled slot is a parse error.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

/// A named branch selecting a nested schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SubcommandSpec {
    /// Declared variant tag (e.g. "RemoteAdd")
    pub variant: String,
    /// Kebab-cased name matched against tokens (e.g. "remote-add")
    pub name: String,
    pub description: Option<String>,
    pub schema: Schema,
}

/// Complete, validated schema for one command level.
///
/// # Examples
///
/// ```
/// use argot_core::{CommandDesc, FieldDesc, ValueKind};
///
/// let schema = CommandDesc::new("git")
///     .subcommand(CommandDesc::new("Add").field(FieldDesc::new("all", ValueKind::Bool)))
///     .subcommand(CommandDesc::new("Remove"))
///     .extract()
///     .unwrap();
///
/// assert_eq!(schema.subcommand_names(), vec!["add", "remove"]);
/// assert!(schema.find_subcommand("add").is_some());
/// assert!(schema.find_subcommand("Add").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// Command name as declared
    pub name: String,
    /// Free-text description shown under the usage line
    pub about: Option<String>,
    /// Replaces the generated help text entirely when set
    pub custom_help: Option<String>,
    pub flags: Vec<FlagSpec>,
    pub positionals: Vec<PositionalSpec>,
    pub subcommands: Vec<SubcommandSpec>,
}

impl Schema {
    /// Finds a flag by its long form (`--name`).
    pub fn find_flag(&self, long: &str) -> Option<usize> {
        self.flags.iter().position(|f| f.long == long)
    }

    /// Finds a flag by its switch alias.
    pub fn find_alias(&self, alias: char) -> Option<usize> {
        self.flags.iter().position(|f| f.alias == Some(alias))
    }

    /// Finds a subcommand by its kebab-cased name.
    pub fn find_subcommand(&self, name: &str) -> Option<&SubcommandSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Gets all subcommand names.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind_type_names() {
        assert_eq!(ValueKind::String.type_name(), "str");
        assert_eq!(ValueKind::I8.type_name(), "i8");
        assert_eq!(ValueKind::Float.type_name(), "f64");
        assert!(ValueKind::U8.variants().is_empty());
    }

    #[test]
    fn test_value_kind_deserializes_from_names() {
        let kind: ValueKind = serde_json::from_str(r#""u16""#).unwrap();
        assert_eq!(kind, ValueKind::U16);

        let kind: ValueKind = serde_json::from_str(r#""str""#).unwrap();
        assert_eq!(kind, ValueKind::String);

        let kind: ValueKind =
            serde_json::from_str(r#"{"enum": [{"name": "fast"}, {"name": "dry_run"}]}"#).unwrap();
        assert_eq!(kind.variants().len(), 2);
        assert_eq!(kind.variants()[1].token(), "dry-run");
    }

    #[test]
    fn test_value_serializes_as_scalar() {
        let values = vec![
            Value::Bool(true),
            Value::String("x".into()),
            Value::Unsigned(3),
            Value::Signed(-2),
            Value::Enum {
                index: 1,
                name: "safe".into(),
            },
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[true,"x",3,-2,"safe"]"#);
    }

    #[test]
    fn test_value_integer_accessors_cross_sign() {
        assert_eq!(Value::Unsigned(7).as_i64(), Some(7));
        assert_eq!(Value::Signed(-1).as_u64(), None);
        assert_eq!(Value::Unsigned(u64::MAX).as_i64(), None);
    }
}
