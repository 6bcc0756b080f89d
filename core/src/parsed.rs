//! Parse results and typed extraction.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{BindError, Subcommand, Value};

/// Values collected for one command level.
///
/// Flags and positionals are kept in schema order, keyed by their declared
/// field names. A `None` value means the field is optional and was not
/// supplied. The matched subcommand, if any, holds the nested level.
///
/// Serializes as a map of `command`, `flags`, `positionals`, `subcommand`
/// (omitted when none) and `trailing`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    command: String,
    flags: Vec<(String, Option<Value>)>,
    positionals: Vec<(String, Option<Value>)>,
    subcommand: Option<Box<SubcommandMatch>>,
    trailing: Vec<String>,
}

/// The subcommand selected at some level, with its own parse result.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubcommandMatch {
    /// Declared variant tag (e.g. "RemoteAdd")
    pub variant: String,
    /// Name as typed on the command line (e.g. "remote-add")
    pub name: String,
    pub parsed: Parsed,
}

/// Conversion from a parsed value into a Rust type.
///
/// User enums implement this through [`Value::variant`]:
///
/// ```
/// use argot_core::{BindError, FromValue, Value};
///
/// enum Mode {
///     Fast,
///     Safe,
/// }
///
/// impl FromValue for Mode {
///     fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
///         match value.as_ref().and_then(Value::variant) {
///             Some("fast") => Ok(Mode::Fast),
///             Some("safe") => Ok(Mode::Safe),
///             _ => Err(BindError::mismatch(field, "a mode", value.as_ref())),
///         }
///     }
/// }
///
/// let value = Value::Enum { index: 1, name: "safe".into() };
/// assert!(matches!(Mode::from_value("mode", Some(value)), Ok(Mode::Safe)));
/// ```
pub trait FromValue: Sized {
    fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError>;
}

impl Parsed {
    pub(crate) fn new(
        command: String,
        flags: Vec<(String, Option<Value>)>,
        positionals: Vec<(String, Option<Value>)>,
        subcommand: Option<SubcommandMatch>,
        trailing: Vec<String>,
    ) -> Self {
        Self {
            command,
            flags,
            positionals,
            subcommand: subcommand.map(Box::new),
            trailing,
        }
    }

    /// Space-separated command path of this level.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Looks up a flag or positional value by field name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entry(field).and_then(|(_, value)| value.as_ref())
    }

    /// Returns `true` when the field holds `true`.
    ///
    /// Convenience for boolean flags; any other value reads as `false`.
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Moves a field's value out, converted to `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use argot_core::*;
    ///
    /// let schema = CommandDesc::new("tool")
    ///     .field(FieldDesc::new("count", ValueKind::U16).default_value("2"))
    ///     .field(FieldDesc::new("label", ValueKind::String).optional())
    ///     .extract()
    ///     .unwrap();
    ///
    /// let mut parsed = Parser::new(&schema).parse(&["--count", "7"]).unwrap();
    /// assert_eq!(parsed.take::<u16>("count").unwrap(), 7);
    /// assert_eq!(parsed.take::<Option<String>>("label").unwrap(), None);
    /// assert!(parsed.take::<u8>("missing").is_err());
    /// ```
    pub fn take<T: FromValue>(&mut self, field: &str) -> Result<T, BindError> {
        let slot = self
            .flags
            .iter_mut()
            .chain(self.positionals.iter_mut())
            .find(|(name, _)| name == field)
            .ok_or_else(|| BindError::UnknownField(field.to_string()))?;
        T::from_value(field, slot.1.take())
    }

    pub fn subcommand(&self) -> Option<&SubcommandMatch> {
        self.subcommand.as_deref()
    }

    pub fn take_subcommand(&mut self) -> Option<SubcommandMatch> {
        self.subcommand.take().map(|sub| *sub)
    }

    /// Moves the matched subcommand out, converted to `T`.
    pub fn take_command<T: Subcommand>(&mut self) -> Result<T, BindError> {
        let sub = self.take_subcommand().ok_or(BindError::MissingSubcommand)?;
        T::from_match(sub)
    }

    /// Tokens accepted by the trailing policy past the declared positionals.
    pub fn trailing(&self) -> &[String] {
        &self.trailing
    }

    pub fn take_trailing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trailing)
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.flags.iter().map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    pub fn positionals(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.positionals
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    fn entry(&self, field: &str) -> Option<&(String, Option<Value>)> {
        self.flags
            .iter()
            .chain(self.positionals.iter())
            .find(|(name, _)| name == field)
    }
}

struct Fields<'a>(&'a [(String, Option<Value>)]);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.subcommand.is_some() { 5 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("command", &self.command)?;
        map.serialize_entry("flags", &Fields(&self.flags))?;
        map.serialize_entry("positionals", &Fields(&self.positionals))?;
        if let Some(sub) = &self.subcommand {
            map.serialize_entry("subcommand", sub)?;
        }
        map.serialize_entry("trailing", &self.trailing)?;
        map.end()
    }
}

impl FromValue for bool {
    fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
        match value {
            Some(Value::Bool(b)) => Ok(b),
            other => Err(BindError::mismatch(field, "a boolean", other.as_ref())),
        }
    }
}

impl FromValue for String {
    fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
        match value {
            Some(Value::String(s)) => Ok(s),
            other => Err(BindError::mismatch(field, "a string", other.as_ref())),
        }
    }
}

macro_rules! impl_from_value_int {
    ($via:ident => $($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
                    value
                        .as_ref()
                        .and_then(Value::$via)
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or_else(|| BindError::mismatch(field, stringify!($ty), value.as_ref()))
                }
            }
        )+
    };
}

impl_from_value_int!(as_u64 => u8, u16, u32, u64, usize);
impl_from_value_int!(as_i64 => i8, i16, i32, i64, isize);

impl FromValue for f64 {
    fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
        value
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| BindError::mismatch(field, "f64", value.as_ref()))
    }
}

impl FromValue for f32 {
    fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
        let wide = f64::from_value(field, value)?;
        let narrow = wide as f32;
        if wide.is_finite() && !narrow.is_finite() {
            return Err(BindError::Mismatch {
                field: field.to_string(),
                expected: "f32",
                found: "an out-of-range float",
            });
        }
        Ok(narrow)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(field: &str, value: Option<Value>) -> Result<Self, BindError> {
        match value {
            Some(value) => T::from_value(field, Some(value)).map(Some),
            None => Ok(None),
        }
    }
}
