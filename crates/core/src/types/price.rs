//! Type-safe price representation.
//!
//! Marketplace prices are integral yen amounts; there are no fractional
//! units on the wire, so the wrapper holds a plain `i64` and enforces the
//! positivity invariant at construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when constructing a [`Price`] from an invalid amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount was zero or negative.
    #[error("price must be a positive amount, got {0}")]
    NotPositive(i64),
}

/// A positive price in yen.
///
/// Serialized as the bare integer amount, matching the marketplace wire
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(i64);

impl Price {
    /// Create a price, rejecting zero and negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if `amount <= 0`.
    pub const fn new(amount: i64) -> Result<Self, PriceError> {
        if amount > 0 {
            Ok(Self(amount))
        } else {
            Err(PriceError::NotPositive(amount))
        }
    }

    /// Get the amount in yen.
    #[must_use]
    pub const fn as_yen(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    /// Format for display with a yen sign and thousands separators,
    /// e.g. `¥1,234`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "¥{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert_eq!(Price::new(0), Err(PriceError::NotPositive(0)));
        assert_eq!(Price::new(-500), Err(PriceError::NotPositive(-500)));
        assert!(Price::new(1).is_ok());
    }

    #[test]
    fn test_serde_as_bare_integer() {
        let price = Price::new(1000).expect("valid price");
        assert_eq!(serde_json::to_string(&price).expect("serialize"), "1000");

        let back: Price = serde_json::from_str("1000").expect("deserialize");
        assert_eq!(back, price);
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        let result: Result<Price, _> = serde_json::from_str("0");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::new(5).expect("price").to_string(), "¥5");
        assert_eq!(Price::new(1234).expect("price").to_string(), "¥1,234");
        assert_eq!(Price::new(1234567).expect("price").to_string(), "¥1,234,567");
    }
}
