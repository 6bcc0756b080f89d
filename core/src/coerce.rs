//! Token-to-value coercion.
//!
//! [`coerce`] converts one raw token into a [`Value`] of the declared
//! [`ValueKind`]. Integer overflow and invalid characters are distinct
//! causes; both carry the offending token and the expected type.
//!
//! # Examples
//!
//! ```
//! use argot_core::{coerce, CoercionError, Value, ValueKind};
//!
//! assert_eq!(coerce(&ValueKind::U8, "200"), Ok(Value::Unsigned(200)));
//! assert!(matches!(
//!     coerce(&ValueKind::U8, "300"),
//!     Err(CoercionError::Overflow { .. })
//! ));
//! assert!(matches!(
//!     coerce(&ValueKind::U8, "3x"),
//!     Err(CoercionError::InvalidCharacter { .. })
//! ));
//! ```

use std::num::IntErrorKind;

use thiserror::Error;

use crate::{Value, ValueKind};

/// Why a token could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Integer does not fit the declared width.
    #[error("'{token}' is out of range for {expected}")]
    Overflow {
        token: String,
        expected: &'static str,
    },
    /// Integer token contains a non-digit (or is empty).
    #[error("'{token}' is not a valid {expected}")]
    InvalidCharacter {
        token: String,
        expected: &'static str,
    },
    /// Malformed floating point token.
    #[error("'{token}' is not a valid f64")]
    InvalidFloat { token: String },
    /// Token matches no enum variant.
    #[error("unrecognized option value '{token}'")]
    UnrecognizedOption { token: String },
}

/// Coerces `token` into a value of `kind`.
///
/// Booleans never consume a token; the call always yields `true`. Enum
/// tokens must match a hyphenated variant name exactly.
pub fn coerce(kind: &ValueKind, token: &str) -> Result<Value, CoercionError> {
    match kind {
        ValueKind::Bool => Ok(Value::Bool(true)),
        ValueKind::String => Ok(Value::String(token.to_string())),
        ValueKind::U8 => unsigned(token, u64::from(u8::MAX), kind),
        ValueKind::U16 => unsigned(token, u64::from(u16::MAX), kind),
        ValueKind::U32 => unsigned(token, u64::from(u32::MAX), kind),
        ValueKind::U64 => unsigned(token, u64::MAX, kind),
        ValueKind::I8 => signed(token, i64::from(i8::MIN), i64::from(i8::MAX), kind),
        ValueKind::I16 => signed(token, i64::from(i16::MIN), i64::from(i16::MAX), kind),
        ValueKind::I32 => signed(token, i64::from(i32::MIN), i64::from(i32::MAX), kind),
        ValueKind::I64 => signed(token, i64::MIN, i64::MAX, kind),
        ValueKind::Float => token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CoercionError::InvalidFloat {
                token: token.to_string(),
            }),
        ValueKind::Enum(variants) => variants
            .iter()
            .position(|v| v.token() == token)
            .map(|index| Value::Enum {
                index,
                name: token.to_string(),
            })
            .ok_or_else(|| CoercionError::UnrecognizedOption {
                token: token.to_string(),
            }),
    }
}

fn unsigned(token: &str, max: u64, kind: &ValueKind) -> Result<Value, CoercionError> {
    match token.parse::<u64>() {
        Ok(n) if n <= max => Ok(Value::Unsigned(n)),
        Ok(_) => Err(overflow(token, kind)),
        Err(e) => Err(int_error(token, e.kind(), kind)),
    }
}

fn signed(token: &str, min: i64, max: i64, kind: &ValueKind) -> Result<Value, CoercionError> {
    match token.parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => Ok(Value::Signed(n)),
        Ok(_) => Err(overflow(token, kind)),
        Err(e) => Err(int_error(token, e.kind(), kind)),
    }
}

fn int_error(token: &str, cause: &IntErrorKind, kind: &ValueKind) -> CoercionError {
    match cause {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow(token, kind),
        _ => CoercionError::InvalidCharacter {
            token: token.to_string(),
            expected: kind.type_name(),
        },
    }
}

fn overflow(token: &str, kind: &ValueKind) -> CoercionError {
    CoercionError::Overflow {
        token: token.to_string(),
        expected: kind.type_name(),
    }
}
