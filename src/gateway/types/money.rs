//! Money input type for API boundary enforcement

use std::fmt;

use rust_decimal::prelude::*;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};

// ============================================================================
// StrictDecimal: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format Decimal - validates format during deserialization
///
/// Accepts a JSON string or a JSON number. For strings:
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects empty strings, scientific notation and a `+` prefix
///
/// Negative values are rejected in either form. Whether the amount is
/// positive is a business rule checked later by the transfer service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn parse_strict<E: de::Error>(s: &str) -> Result<Decimal, E> {
    if s.is_empty() {
        return Err(E::custom("Amount cannot be empty"));
    }

    // Reject .5 format (must be 0.5)
    if s.starts_with('.') {
        return Err(E::custom("Invalid format: use 0.5 not .5"));
    }

    // Reject 5. format (must be 5.0 or 5)
    if s.ends_with('.') {
        return Err(E::custom("Invalid format: use 5.0 not 5."));
    }

    if s.contains('e') || s.contains('E') {
        return Err(E::custom("Invalid format: scientific notation not allowed"));
    }

    if s.starts_with('+') {
        return Err(E::custom("Invalid format: + prefix not allowed"));
    }

    let d = Decimal::from_str(s).map_err(|e| E::custom(format!("Invalid decimal: {}", e)))?;
    non_negative(d)
}

fn non_negative<E: de::Error>(d: Decimal) -> Result<Decimal, E> {
    if d.is_sign_negative() && !d.is_zero() {
        return Err(E::custom("Amount cannot be negative"));
    }
    Ok(d)
}

struct StrictDecimalVisitor;

impl<'de> Visitor<'de> for StrictDecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Decimal, E> {
        parse_strict(s)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        non_negative(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        let d = Decimal::try_from(v).map_err(|e| E::custom(format!("Invalid decimal: {}", e)))?;
        non_negative(d.normalize())
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(StrictDecimalVisitor).map(StrictDecimal)
    }
}

impl Serialize for StrictDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<StrictDecimal, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_strict_decimal_valid_string() {
        let d = parse(r#""1.5""#).unwrap();
        assert_eq!(*d, Decimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_strict_decimal_accepts_json_number() {
        assert_eq!(parse("10").unwrap().inner(), Decimal::from(10));
        assert_eq!(parse("10.25").unwrap().inner(), Decimal::from_str("10.25").unwrap());
    }

    #[test]
    fn test_strict_decimal_rejects_dot_prefix() {
        let err = parse(r#"".5""#).unwrap_err();
        assert!(err.to_string().contains("use 0.5 not .5"));
    }

    #[test]
    fn test_strict_decimal_rejects_dot_suffix() {
        let err = parse(r#""5.""#).unwrap_err();
        assert!(err.to_string().contains("use 5.0 not 5."));
    }

    #[test]
    fn test_strict_decimal_rejects_negative() {
        assert!(parse(r#""-1""#).is_err());
        assert!(parse("-1").is_err());
        assert!(parse("-0.5").is_err());
    }

    #[test]
    fn test_strict_decimal_rejects_malformed() {
        assert!(parse(r#""""#).is_err());
        assert!(parse(r#""1e5""#).is_err());
        assert!(parse(r#""+1""#).is_err());
        assert!(parse(r#""abc""#).is_err());
        assert!(parse("true").is_err());
    }

    #[test]
    fn test_strict_decimal_serializes_as_string() {
        let d = parse("12.5").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""12.5""#);
    }
}
