//! Parser configuration.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Styles;
use crate::help::DEFAULT_LINE_WIDTH;

/// What happens to positional tokens beyond the declared slots.
///
/// # Examples
///
/// ```
/// use argot_core::TrailingPolicy;
///
/// assert!(!TrailingPolicy::Reject.accepts(0));
/// assert!(TrailingPolicy::Bounded(2).accepts(1));
/// assert!(!TrailingPolicy::Bounded(2).accepts(2));
/// assert!(TrailingPolicy::Unbounded.accepts(10_000));
/// ```
///
/// In configuration files the policy is written as `reject`, `unbounded`,
/// or a count (`3`, or `{ bounded: 3 }`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingPolicy {
    /// Extra tokens are an error.
    #[default]
    Reject,
    /// Up to this many extra tokens are collected.
    Bounded(usize),
    /// Every extra token is collected.
    Unbounded,
}

impl TrailingPolicy {
    /// Returns `true` when one more token fits after `collected` tokens.
    pub fn accepts(&self, collected: usize) -> bool {
        match self {
            Self::Reject => false,
            Self::Bounded(limit) => collected < *limit,
            Self::Unbounded => true,
        }
    }
}

impl FromStr for TrailingPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "reject" => Ok(Self::Reject),
            "unbounded" => Ok(Self::Unbounded),
            count => count
                .parse::<usize>()
                .map(Self::Bounded)
                .map_err(|_| format!("expected 'reject', 'unbounded' or a count, got '{count}'")),
        }
    }
}

impl Serialize for TrailingPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Reject => serializer.serialize_str("reject"),
            Self::Bounded(limit) => serializer.serialize_u64(*limit as u64),
            Self::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl<'de> Deserialize<'de> for TrailingPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TrailingPolicyVisitor)
    }
}

struct TrailingPolicyVisitor;

impl<'de> Visitor<'de> for TrailingPolicyVisitor {
    type Value = TrailingPolicy;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("'reject', 'unbounded', a count, or { bounded: <count> }")
    }

    fn visit_str<E: de::Error>(self, raw: &str) -> Result<Self::Value, E> {
        raw.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, count: u64) -> Result<Self::Value, E> {
        usize::try_from(count)
            .map(TrailingPolicy::Bounded)
            .map_err(|_| E::custom(format!("trailing count {count} is too large")))
    }

    fn visit_i64<E: de::Error>(self, count: i64) -> Result<Self::Value, E> {
        match u64::try_from(count) {
            Ok(count) => self.visit_u64(count),
            Err(_) => Err(E::custom(format!("trailing count {count} is negative"))),
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        if key != "bounded" {
            return Err(de::Error::unknown_field(&key, &["bounded"]));
        }
        let limit = map.next_value::<usize>()?;
        if let Some(extra) = map.next_key::<String>()? {
            return Err(de::Error::unknown_field(&extra, &["bounded"]));
        }
        Ok(TrailingPolicy::Bounded(limit))
    }
}

/// Parser settings.
///
/// Deserializes from the `config` section of a description file; missing
/// keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Treat the first token as the program path rather than an argument.
    pub skip_program_name: bool,
    /// Policy for positional tokens beyond the declared slots.
    pub trailing: TrailingPolicy,
    /// Line budget for the usage synopsis.
    pub line_width: usize,
    /// Styles for help and error output.
    pub styles: Styles,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            skip_program_name: false,
            trailing: TrailingPolicy::Reject,
            line_width: DEFAULT_LINE_WIDTH,
            styles: Styles::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert!(!config.skip_program_name);
        assert_eq!(config.trailing, TrailingPolicy::Reject);
        assert_eq!(config.line_width, 80);
        assert!(config.styles.is_empty());
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"trailing": {"bounded": 3}, "line_width": 60}"#).unwrap();
        assert_eq!(config.trailing, TrailingPolicy::Bounded(3));
        assert_eq!(config.line_width, 60);
        assert!(!config.skip_program_name);

        let config: ParserConfig = serde_json::from_str(r#"{"trailing": "unbounded"}"#).unwrap();
        assert_eq!(config.trailing, TrailingPolicy::Unbounded);
    }

    #[test]
    fn test_trailing_policy_forms() {
        let parse = |json: &str| serde_json::from_str::<TrailingPolicy>(json);

        assert_eq!(parse(r#""reject""#).unwrap(), TrailingPolicy::Reject);
        assert_eq!(parse("2").unwrap(), TrailingPolicy::Bounded(2));
        assert_eq!(parse(r#""5""#).unwrap(), TrailingPolicy::Bounded(5));
        assert_eq!(parse(r#"{"bounded": 0}"#).unwrap(), TrailingPolicy::Bounded(0));

        assert!(parse("-1").is_err());
        assert!(parse(r#""sometimes""#).is_err());
        assert!(parse(r#"{"limit": 2}"#).is_err());
        assert!(parse(r#"{"bounded": 2, "extra": 1}"#).is_err());
    }

    #[test]
    fn test_trailing_policy_serializes_to_accepted_form() {
        for policy in [
            TrailingPolicy::Reject,
            TrailingPolicy::Bounded(4),
            TrailingPolicy::Unbounded,
        ] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(serde_json::from_str::<TrailingPolicy>(&json).unwrap(), policy);
        }
        assert_eq!(serde_json::to_string(&TrailingPolicy::Bounded(4)).unwrap(), "4");
    }

    #[test]
    fn test_trailing_policy_from_str() {
        assert_eq!("unbounded".parse::<TrailingPolicy>(), Ok(TrailingPolicy::Unbounded));
        assert_eq!("3".parse::<TrailingPolicy>(), Ok(TrailingPolicy::Bounded(3)));
        assert!("many".parse::<TrailingPolicy>().unwrap_err().contains("'many'"));
    }
}
