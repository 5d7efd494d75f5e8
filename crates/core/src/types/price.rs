//! Non-negative market price using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {amount}")]
    Negative {
        /// The rejected amount.
        amount: Decimal,
    },
}

/// A non-negative market price.
///
/// Stored as a `rust_decimal::Decimal` in the currency's standard unit
/// (dollars, not cents). Serializes as a decimal string (`"25.00"`) so no
/// precision is lost on the wire.
///
/// # Examples
///
/// ```
/// use cardfolio_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(2500, 2)).unwrap();
/// assert_eq!(price.to_string(), "25.00");
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative { amount });
        }
        Ok(Self(amount))
    }

    /// A zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a price from a whole number of cents. Infallible because the
    /// amount cannot be negative.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepted() {
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(Decimal::new(2500, 2)).is_ok());
    }

    #[test]
    fn test_negative_rejected() {
        let err = Price::new(Decimal::new(-1, 0)).unwrap_err();
        assert!(matches!(err, PriceError::Negative { .. }));
    }

    #[test]
    fn test_serde_round_trip() {
        let price = Price::new(Decimal::new(35000, 2)).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"350.00\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let bad: Result<Price, _> = serde_json::from_str("\"-3.50\"");
        assert!(bad.is_err());
    }
}
