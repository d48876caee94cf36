//! Decimal amounts as integer micros.
//!
//! Fee amounts arrive either as decimal strings (`"1.23"`) or as JSON numbers.
//! Both are converted to integer micros (1 unit = 1_000_000 micros) without
//! any floating-point arithmetic, so a fee is reported exactly as charged.

use std::fmt;

use serde::Serialize;

use crate::CanonicalValue;

/// Micros per currency unit.
pub const MICROS_SCALE: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount string was empty.
    Empty,
    /// The amount could not be parsed as a decimal number.
    Invalid { raw: String },
    /// More than 6 decimal places (ambiguous micro conversion).
    TooManyDecimalPlaces { raw: String },
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Empty => write!(f, "amount is empty"),
            MoneyError::Invalid { raw } => write!(f, "amount could not be parsed: '{raw}'"),
            MoneyError::TooManyDecimalPlaces { raw } => write!(
                f,
                "amount has more than 6 decimal places (ambiguous micro conversion): '{raw}'"
            ),
        }
    }
}

impl std::error::Error for MoneyError {}

/// Convert a decimal string to integer micros deterministically.
///
/// Accepts an optional sign and an optional fractional part of at most six
/// digits. Rejects exponents, `NaN`/`inf`, and anything non-numeric.
pub fn parse_micros(s: &str) -> Result<i64, MoneyError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MoneyError::Empty);
    }
    let invalid = || MoneyError::Invalid { raw: s.to_string() };

    let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }
    if frac_part.len() > 6 {
        return Err(MoneyError::TooManyDecimalPlaces { raw: s.to_string() });
    }

    let int_val: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let frac_val: i64 = format!("{frac_part:0<6}").parse().map_err(|_| invalid())?;

    let micros = int_val
        .checked_mul(MICROS_SCALE)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(invalid)?;

    Ok(if negative { -micros } else { micros })
}

/// An amount with its (optional) currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub micros: i64,
    pub currency: Option<String>,
}

impl Money {
    /// Read an `{value, currency}` amount record.
    ///
    /// A missing `value` counts as zero; a present but malformed one is an
    /// error.
    pub fn from_amount(amount: &CanonicalValue) -> Result<Self, MoneyError> {
        let value = amount.get("value");
        let micros = match value {
            CanonicalValue::Null => 0,
            CanonicalValue::String(s) => parse_micros(s)?,
            CanonicalValue::Number(n) => parse_micros(&n.to_string())?,
            other => {
                return Err(MoneyError::Invalid {
                    raw: format!("{other:?}"),
                })
            }
        };
        let currency = amount.get("currency").id_string();
        Ok(Money { micros, currency })
    }

    /// Plain decimal rendering, trailing zeros trimmed to at least two places.
    pub fn decimal_string(&self) -> String {
        let sign = if self.micros < 0 { "-" } else { "" };
        let abs = self.micros.unsigned_abs();
        let scale = MICROS_SCALE as u64;
        let mut frac = format!("{:06}", abs % scale);
        while frac.len() > 2 && frac.ends_with('0') {
            frac.pop();
        }
        format!("{sign}{}.{frac}", abs / scale)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(c) => write!(f, "{} {c}", self.decimal_string()),
            None => f.write_str(&self.decimal_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn micros_whole_and_fractional() {
        assert_eq!(parse_micros("100").unwrap(), 100_000_000);
        assert_eq!(parse_micros("182.34").unwrap(), 182_340_000);
        assert_eq!(parse_micros("1.123456").unwrap(), 1_123_456);
        assert_eq!(parse_micros(".5").unwrap(), 500_000);
        assert_eq!(parse_micros("-2.5").unwrap(), -2_500_000);
    }

    #[test]
    fn micros_rejects_garbage() {
        assert_eq!(parse_micros("  "), Err(MoneyError::Empty));
        assert!(matches!(parse_micros("abc"), Err(MoneyError::Invalid { .. })));
        assert!(matches!(parse_micros("NaN"), Err(MoneyError::Invalid { .. })));
        assert!(matches!(parse_micros("1e3"), Err(MoneyError::Invalid { .. })));
        assert!(matches!(parse_micros("1.2.3"), Err(MoneyError::Invalid { .. })));
        assert!(matches!(parse_micros("-"), Err(MoneyError::Invalid { .. })));
        assert!(matches!(
            parse_micros("1.1234567"),
            Err(MoneyError::TooManyDecimalPlaces { .. })
        ));
    }

    #[test]
    fn amount_record_from_string_and_number() {
        let s = Money::from_amount(&json!({"value": "3.75", "currency": "USD"}).into()).unwrap();
        assert_eq!(s.micros, 3_750_000);
        assert_eq!(s.currency.as_deref(), Some("USD"));

        let n = Money::from_amount(&json!({"value": 1.2, "currency": "GBP"}).into()).unwrap();
        assert_eq!(n.micros, 1_200_000);
    }

    #[test]
    fn amount_record_missing_value_is_zero() {
        let m = Money::from_amount(&json!({"currency": "USD"}).into()).unwrap();
        assert_eq!(m.micros, 0);
        let m = Money::from_amount(&CanonicalValue::Null).unwrap();
        assert_eq!(m, Money { micros: 0, currency: None });
    }

    #[test]
    fn amount_record_malformed_value_errors() {
        let err = Money::from_amount(&json!({"value": "n/a"}).into()).unwrap_err();
        assert_eq!(err.to_string(), "amount could not be parsed: 'n/a'");
        assert!(Money::from_amount(&json!({"value": [1]}).into()).is_err());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        let m = Money { micros: 3_750_000, currency: Some("USD".into()) };
        assert_eq!(m.to_string(), "3.75 USD");
        let m = Money { micros: -1_234_500, currency: None };
        assert_eq!(m.to_string(), "-1.2345");
        let m = Money { micros: 5_000_000, currency: None };
        assert_eq!(m.decimal_string(), "5.00");
    }
}
