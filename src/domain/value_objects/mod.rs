//! Value Objects for the storefront

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Display prefix for every rendered amount.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Lenient parser for localized price strings such as `"R$ 1.234,56"`.
///
/// Every character other than an ASCII digit or a comma is dropped, the first
/// comma becomes the decimal separator and anything after a second comma is
/// ignored. Input that leaves no digits resolves to zero.
pub fn parse_price(raw: &str) -> Decimal {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == ',').collect();
    let mut parts = cleaned.split(',');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if whole.is_empty() && fraction.is_empty() {
        return Decimal::ZERO;
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    let literal = if fraction.is_empty() { whole.to_string() } else { format!("{whole}.{fraction}") };
    Decimal::from_str(&literal).unwrap_or(Decimal::ZERO)
}

/// Renders an amount as `"R$ 1.234,56"`.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{CURRENCY_SYMBOL} {sign}{grouped},{fraction:0<2}")
}

/// Money value object. Amounts are exact decimals; the localized string only
/// exists at the serialization edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    pub fn parse(raw: &str) -> Self { Self(parse_price(raw)) }
    pub fn amount(&self) -> Decimal { self.0 }
    /// Saturates at the `Decimal` bounds instead of overflowing.
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0.saturating_mul(Decimal::from(qty))) }
    pub fn add(&self, other: &Money) -> Money { Money(self.0.saturating_add(other.0)) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&format_price(self.0)) }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self { Self(amount) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self { iter.fold(Money::zero(), |acc, m| acc.add(&m)) }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_price(self.0))
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a price string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> { Ok(Money::parse(v)) }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> { Ok(Money(Decimal::from(v))) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> { Ok(Money(Decimal::from(v))) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Ok(Money(Decimal::from_f64(v).unwrap_or(Decimal::ZERO)))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_localized_price() {
        assert_eq!(parse_price("R$ 1.234,56"), Decimal::new(123456, 2));
        assert_eq!(parse_price("R$ 10,00"), Decimal::new(10, 0));
        assert_eq!(parse_price("R$ 89"), Decimal::new(89, 0));
        assert_eq!(parse_price(",5"), Decimal::new(5, 1));
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_price("garbage"), Decimal::ZERO);
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("R$ ,"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_ignores_second_comma() {
        assert_eq!(parse_price("1,2,3"), Decimal::new(12, 1));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(format_price(Decimal::new(5, 0)), "R$ 5,00");
        assert_eq!(format_price(Decimal::new(1234567, 0)), "R$ 1.234.567,00");
        assert_eq!(format_price(Decimal::new(-150, 1)), "R$ -15,00");
        assert_eq!(format_price(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_money_accepts_string_or_number() {
        let from_str: Money = serde_json::from_str("\"R$ 49,00\"").unwrap();
        let from_num: Money = serde_json::from_str("49").unwrap();
        assert_eq!(from_str.amount(), Decimal::new(49, 0));
        assert_eq!(from_num.amount(), from_str.amount());
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"R$ 49,00\"");
    }

    #[test]
    fn test_money_sum() {
        let total: Money = vec![Money::parse("R$ 10,00"), Money::parse("R$ 5,50").multiply(2)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::new(21, 0));
    }

    #[test]
    fn test_money_arithmetic_saturates() {
        let huge = Money::parse("R$ 100.000.000.000.000.000.000,00");
        assert_eq!(huge.multiply(u32::MAX).amount(), Decimal::MAX);
        let total: Money = vec![huge.multiply(1_000_000), huge.multiply(1_000_000)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
        assert_eq!(Money::new(Decimal::MIN).add(&Money::new(Decimal::NEGATIVE_ONE)).amount(), Decimal::MIN);
        assert!(total.to_string().starts_with("R$ 79.228"));
    }
}
