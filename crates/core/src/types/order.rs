//! Order transfer record and its date format.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::id::{CartId, OrderId};

/// Canonical output format for order dates.
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted input formats, tried in order after RFC 3339.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d-%m-%Y__%H:%M:%S:%6f",
];

/// Errors that can occur when parsing an [`OrderDate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderDateError {
    /// The input string is empty.
    #[error("order date cannot be empty")]
    Empty,
    /// The input matches none of the accepted formats.
    #[error("unrecognized order date: {0}")]
    Unrecognized(String),
}

/// The moment an order was placed, without a time zone (UTC by convention).
///
/// Precision is microseconds, matching a `TIMESTAMP` column.
///
/// ## Accepted input
///
/// - `2024-10-26` (midnight)
/// - `2025-10-24T00:00:00` with optional fraction
/// - `2025-10-24T00:00:00Z` or any RFC 3339 offset (converted to UTC)
/// - `26-10-2024__14:30:00:000000` (legacy form)
///
/// ```
/// use emporium_core::OrderDate;
///
/// let date: OrderDate = "2024-10-26".parse().unwrap();
/// assert_eq!(date.to_string(), "2024-10-26T00:00:00.000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderDate(NaiveDateTime);

impl OrderDate {
    /// Current UTC time, truncated to microseconds.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().naive_utc().trunc_subsecs(6))
    }

    /// Wrap a timestamp, truncating it to microseconds.
    #[must_use]
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value.trunc_subsecs(6))
    }

    /// The underlying timestamp.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse any accepted representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or matches no accepted format.
    pub fn parse(s: &str) -> Result<Self, OrderDateError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(OrderDateError::Empty);
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_naive(with_offset.naive_utc()));
        }

        for format in INPUT_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::from_naive(value));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| OrderDateError::Unrecognized(s.to_owned()))
    }
}

impl fmt::Display for OrderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(OUTPUT_FORMAT))
    }
}

impl FromStr for OrderDate {
    type Err = OrderDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDateTime> for OrderDate {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_naive(value)
    }
}

impl Serialize for OrderDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrderDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Opaque reference to a cart. Its existence is never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRef {
    pub cart_id: CartId,
}

/// An order as exchanged over the Order Service API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDto {
    /// Assigned by the service on create; required on update.
    pub order_id: Option<OrderId>,
    /// Stamped with the current time on create when absent.
    pub order_date: Option<OrderDate>,
    pub order_desc: Option<String>,
    pub cart: Option<CartRef>,
}

impl OrderDto {
    /// Build a transfer record for an order that does not exist yet.
    #[must_use]
    pub fn new(description: &str) -> Self {
        Self {
            order_id: None,
            order_date: None,
            order_desc: Some(description.to_owned()),
            cart: None,
        }
    }

    /// Reference a cart by id.
    #[must_use]
    pub const fn with_cart(mut self, cart_id: CartId) -> Self {
        self.cart = Some(CartRef { cart_id });
        self
    }

    /// Set the order date.
    #[must_use]
    pub const fn with_date(mut self, date: OrderDate) -> Self {
        self.order_date = Some(date);
        self
    }

    /// The referenced cart id, if any.
    #[must_use]
    pub fn cart_id(&self) -> Option<CartId> {
        self.cart.map(|cart| cart.cart_id)
    }
}
