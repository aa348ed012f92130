//! Parsed values and integer width fitting.

use super::oid::OidPath;
use super::symbol::Symbol;
use alloc::string::String;
use core::fmt;

/// An integer fitted to the narrowest signed width that holds it.
///
/// Decimal literals progress through i8, i16, i32 and i64; anything wider
/// lands in the i128 tier, which stands in for arbitrary precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegerValue {
    /// Fits in 8 bits.
    I8(i8),
    /// Fits in 16 bits.
    I16(i16),
    /// Fits in 32 bits.
    I32(i32),
    /// Fits in 64 bits.
    I64(i64),
    /// Wider than 64 bits.
    I128(i128),
}

impl IntegerValue {
    /// Fit a value into the narrowest signed width that covers it.
    #[must_use]
    pub fn fit(v: i128) -> Self {
        if let Ok(v) = i8::try_from(v) {
            Self::I8(v)
        } else if let Ok(v) = i16::try_from(v) {
            Self::I16(v)
        } else if let Ok(v) = i32::try_from(v) {
            Self::I32(v)
        } else if let Ok(v) = i64::try_from(v) {
            Self::I64(v)
        } else {
            Self::I128(v)
        }
    }

    /// Widen back to i128.
    #[must_use]
    pub fn as_i128(self) -> i128 {
        match self {
            Self::I8(v) => i128::from(v),
            Self::I16(v) => i128::from(v),
            Self::I32(v) => i128::from(v),
            Self::I64(v) => i128::from(v),
            Self::I128(v) => v,
        }
    }

    /// The value as i64, if it fits.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        i64::try_from(self.as_i128()).ok()
    }
}

impl fmt::Display for IntegerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i128())
    }
}

/// A terminal value produced while building a module.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A fitted integer.
    Integer(IntegerValue),
    /// A quoted string, UTF-8 (lossily transcoded when the source was not).
    String(String),
    /// A boolean.
    Boolean(bool),
    /// A symbolic OID path.
    Oid(OidPath),
    /// A reference to another declaration.
    Reference(Symbol),
}

impl Value {
    /// The integer payload, if this is an integer value.
    #[must_use]
    pub fn as_integer(&self) -> Option<IntegerValue> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The OID payload, if this is an OID value.
    #[must_use]
    pub fn as_oid(&self) -> Option<&OidPath> {
        match self {
            Self::Oid(path) => Some(path),
            _ => None,
        }
    }
}

/// Parse a decimal literal, accepting a leading `-`.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<IntegerValue> {
    text.parse::<i128>().ok().map(IntegerValue::fit)
}

/// Parse the digit payload of a hex literal (between the quotes).
///
/// The payload is unsigned; an empty payload is 0.
#[must_use]
pub fn parse_hex_payload(digits: &str) -> Option<IntegerValue> {
    if digits.is_empty() {
        return Some(IntegerValue::I8(0));
    }
    let v = u128::from_str_radix(digits, 16).ok()?;
    i128::try_from(v).ok().map(IntegerValue::fit)
}

/// Parse the digit payload of a binary literal (between the quotes).
///
/// The payload is unsigned; an empty payload is 0.
#[must_use]
pub fn parse_binary_payload(digits: &str) -> Option<IntegerValue> {
    if digits.is_empty() {
        return Some(IntegerValue::I8(0));
    }
    let v = u128::from_str_radix(digits, 2).ok()?;
    i128::try_from(v).ok().map(IntegerValue::fit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_progression() {
        assert_eq!(IntegerValue::fit(0), IntegerValue::I8(0));
        assert_eq!(IntegerValue::fit(127), IntegerValue::I8(127));
        assert_eq!(IntegerValue::fit(-128), IntegerValue::I8(-128));
        assert_eq!(IntegerValue::fit(128), IntegerValue::I16(128));
        assert_eq!(IntegerValue::fit(32_767), IntegerValue::I16(32_767));
        assert_eq!(IntegerValue::fit(32_768), IntegerValue::I32(32_768));
        assert_eq!(
            IntegerValue::fit(2_147_483_648),
            IntegerValue::I64(2_147_483_648)
        );
        assert_eq!(
            IntegerValue::fit(i128::from(i64::MAX) + 1),
            IntegerValue::I128(i128::from(i64::MAX) + 1)
        );
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("42"), Some(IntegerValue::I8(42)));
        assert_eq!(parse_decimal("-300"), Some(IntegerValue::I16(-300)));
        assert_eq!(parse_decimal("x"), None);
    }

    #[test]
    fn test_parse_hex_payload() {
        assert_eq!(parse_hex_payload(""), Some(IntegerValue::I8(0)));
        assert_eq!(parse_hex_payload("7F"), Some(IntegerValue::I8(127)));
        assert_eq!(parse_hex_payload("FF"), Some(IntegerValue::I16(255)));
        assert_eq!(parse_hex_payload("zz"), None);
    }

    #[test]
    fn test_parse_binary_payload() {
        assert_eq!(parse_binary_payload(""), Some(IntegerValue::I8(0)));
        assert_eq!(parse_binary_payload("0101"), Some(IntegerValue::I8(5)));
        assert_eq!(
            parse_binary_payload("11111111"),
            Some(IntegerValue::I16(255))
        );
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(IntegerValue::fit(7).as_i64(), Some(7));
        assert_eq!(IntegerValue::I128(i128::from(i64::MAX) + 1).as_i64(), None);
    }
}
