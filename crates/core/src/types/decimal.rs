//! Decimal amounts carried as JSON numbers.
//!
//! Prices travel as plain JSON numbers (`899.99`), not strings. Incoming
//! numbers are parsed through their shortest decimal rendering so `899.99`
//! becomes exactly `Decimal::new(89999, 2)` rather than the nearest binary
//! float. Numeric strings are accepted as well.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        if !v.is_finite() {
            return Err(E::custom("decimal must be finite"));
        }
        Decimal::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Decimal::from_str(v.trim()).map_err(E::custom)
    }
}

struct Number(Decimal);

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).map(Number)
    }
}

/// `#[serde(with = ...)]` helpers for `Option<Decimal>` fields.
pub mod option_number {
    use super::{Decimal, Deserialize, Deserializer, Number, Serializer, ToPrimitive};

    /// Serialize as a JSON number, or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => match amount.to_f64() {
                Some(float) => serializer.serialize_f64(float),
                None => serializer.serialize_str(&amount.to_string()),
            },
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from a JSON number, numeric string, or `null`.
    ///
    /// # Errors
    ///
    /// Fails if the value is not numeric or does not fit a `Decimal`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Ok(Option::<Number>::deserialize(deserializer)?.map(|n| n.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Priced {
        #[serde(with = "option_number", default)]
        price: Option<Decimal>,
    }

    #[test]
    fn test_float_is_parsed_exactly() {
        let priced: Priced = serde_json::from_str(r#"{"price": 899.99}"#).unwrap();
        assert_eq!(priced.price, Some(Decimal::new(89999, 2)));
    }

    #[test]
    fn test_integer_and_string_inputs() {
        let priced: Priced = serde_json::from_str(r#"{"price": 10}"#).unwrap();
        assert_eq!(priced.price, Some(Decimal::from(10)));

        let priced: Priced = serde_json::from_str(r#"{"price": "1299.99"}"#).unwrap();
        assert_eq!(priced.price, Some(Decimal::new(129_999, 2)));
    }

    #[test]
    fn test_missing_and_null() {
        let priced: Priced = serde_json::from_str("{}").unwrap();
        assert_eq!(priced.price, None);

        let priced: Priced = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(priced.price, None);
    }

    #[test]
    fn test_serializes_as_number() {
        let priced = Priced {
            price: Some(Decimal::new(7999, 2)),
        };
        assert_eq!(serde_json::to_string(&priced).unwrap(), r#"{"price":79.99}"#);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }
}
