//! Amount handling for user-entered monetary values.
//!
//! Amount inputs are kept as canonical digit strings while the user is typing (`to_digits`),
//! shown with thousands separators (`to_display`) and converted to numbers when a record is
//! committed or a step is saved (`to_amount`, `Amount::from_str`).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, Sub};
use std::str::FromStr;

const SEPARATOR: char = ',';

/// Strips every character that is not an ASCII decimal digit.
pub fn to_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups a digit string into thousands, e.g. `"1234567"` -> `"1,234,567"`.
///
/// Any non-digit characters are discarded first, so `to_digits(&to_display(s)) == s` holds for
/// every digit string `s`, leading zeros included.
pub fn to_display(raw: &str) -> String {
    let digits = to_digits(raw);
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (ix, c) in digits.chars().enumerate() {
        if ix > 0 && (len - ix) % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Converts user input to a non-negative whole amount. Empty input is zero and the conversion
/// never fails: values too large to represent saturate at `Decimal::MAX`.
pub fn to_amount(raw: &str) -> Amount {
    let digits = to_digits(raw);
    if digits.is_empty() {
        return Amount::ZERO;
    }
    match Decimal::from_str(&digits) {
        Ok(value) => Amount::new(value),
        Err(_) => Amount::new(Decimal::MAX),
    }
}

/// A monetary value.
///
/// Whole amounts that fit in an `i64` serialize as a JSON number, anything else as a decimal
/// string. Deserializes from a JSON number or from a string that may contain thousands
/// separators, so snapshots written by older clients (which stored digit strings) can still be
/// read.
///
/// ```
/// # use taxfile::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,250,000").unwrap();
/// assert_eq!(amount.to_string(), "1,250,000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Clamps negative amounts to zero.
    pub fn floor_zero(self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            self
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Strict parse: surrounding whitespace and thousands separators are accepted, anything else
    /// that is not a number is an error. Empty input is zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }
        let without_commas = trimmed.replace(SEPARATOR, "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let plain = self.0.abs().normalize().to_string();
        let (whole, fraction) = match plain.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (plain.as_str(), None),
        };
        write!(f, "{sign}{}", to_display(whole))?;
        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let normalized = self.0.normalize();
        if normalized.scale() == 0 {
            if let Some(whole) = normalized.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        // Fractions and wide values would lose digits as an f64.
        serializer.serialize_str(&normalized.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Whole(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Whole(n) => Ok(Amount::from(n)),
            RawAmount::Float(n) => Decimal::from_f64(n)
                .map(Amount)
                .ok_or_else(|| serde::de::Error::custom(format!("'{n}' is not a valid amount"))),
            RawAmount::Text(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    #[test]
    fn test_to_digits_strips_everything_else() {
        assert_eq!(to_digits("Rs. 1,250,000/-"), "1250000");
        assert_eq!(to_digits("12a3"), "123");
        assert_eq!(to_digits(""), "");
        assert_eq!(to_digits("-5"), "5");
    }

    #[test]
    fn test_to_display_groups_thousands() {
        assert_eq!(to_display("1"), "1");
        assert_eq!(to_display("123"), "123");
        assert_eq!(to_display("1234"), "1,234");
        assert_eq!(to_display("1234567"), "1,234,567");
        assert_eq!(to_display(""), "");
    }

    #[test]
    fn test_to_amount() {
        assert_eq!(to_amount(""), Amount::ZERO);
        assert_eq!(to_amount("50,000"), Amount::from(50_000u64));
        assert_eq!(to_amount("abc"), Amount::ZERO);
    }

    #[test]
    fn test_to_amount_saturates() {
        let huge = "9".repeat(60);
        assert_eq!(to_amount(&huge).value(), Decimal::MAX);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(
            Amount::from_str(" 1,000 ").unwrap(),
            Amount::from(1000u64)
        );
        assert!(Amount::from_str("12abc").is_err());
        assert_eq!(Amount::from_str("").unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from(-5000i64).to_string(), "-5,000");
        assert_eq!(Amount::from(65_000u64).to_string(), "65,000");
        assert_eq!(Amount::from_str("1234.50").unwrap().to_string(), "1,234.5");
        assert_eq!(Amount::ZERO.to_string(), "0");
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Amount::from(-1i64).floor_zero(), Amount::ZERO);
        assert_eq!(Amount::from(7i64).floor_zero(), Amount::from(7i64));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Amount::from(50_000u64)).unwrap();
        assert_eq!(json, "50000");
    }

    #[test]
    fn test_wide_and_fractional_amounts_survive_json() {
        let wide = to_amount("12345678901234567891");
        let json = serde_json::to_string(&wide).unwrap();
        assert_eq!(json, "\"12345678901234567891\"");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), wide);

        let fraction = Amount::from_str("1234567.123456789012345").unwrap();
        let json = serde_json::to_string(&fraction).unwrap();
        assert_eq!(json, "\"1234567.123456789012345\"");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), fraction);
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let a: Amount = serde_json::from_str("50000").unwrap();
        let b: Amount = serde_json::from_str("\"50,000\"").unwrap();
        let c: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(a, b);
        assert_eq!(c, Amount::from_str("12.5").unwrap());
        assert!(serde_json::from_str::<Amount>("\"lots\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_display_round_trips_digit_strings(s in "[0-9]{0,40}") {
            prop_assert_eq!(to_digits(&to_display(&s)), s);
        }
    }
}
