//! Conversion between major currency units and Square's integer minor units.
//!
//! Callers describe prices in major units (dollars). Square takes integer
//! minor units (cents). The conversion `round(amount * 100)` happens exactly
//! once, when a request body is built; nothing downstream converts again.

use serde::{Deserialize, Serialize};

use crate::checkout::error::PaymentLinksError;

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Largest amount accepted, in minor units.
const MAX_MINOR_UNITS: f64 = 9_007_199_254_740_991.0;

/// A Square money object: integer minor units plus an ISO 4217 code.
///
/// # Example
///
/// ```rust
/// use square_giftcard::checkout::Money;
///
/// let price = Money::from_major(49.99, "usd").unwrap();
/// assert_eq!(price.amount, 4999);
/// assert_eq!(price.currency, "USD");
/// assert!((price.to_major() - 49.99).abs() < f64::EPSILON);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub amount: i64,
    /// 3-letter ISO 4217 currency code.
    pub currency: String,
}

impl Money {
    /// Converts a major-unit amount.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLinksError::InvalidAmount`] for negative, non-finite
    /// or out-of-range amounts.
    pub fn from_major(amount: f64, currency: &str) -> Result<Self, PaymentLinksError> {
        Ok(Self {
            amount: to_minor_units("amount", amount)?,
            currency: normalize_currency(currency),
        })
    }

    /// Converts back to major units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_major(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

/// Converts `amount` (major units) to minor units with `round(amount * 100)`.
///
/// `field` names the option in the error.
///
/// # Errors
///
/// Returns [`PaymentLinksError::InvalidAmount`] for negative, non-finite or
/// out-of-range amounts.
#[allow(clippy::cast_possible_truncation)]
pub fn to_minor_units(field: &'static str, amount: f64) -> Result<i64, PaymentLinksError> {
    let invalid = |reason: &str| PaymentLinksError::InvalidAmount {
        field,
        amount,
        reason: reason.to_string(),
    };

    if !amount.is_finite() {
        return Err(invalid("amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(invalid("amount must not be negative"));
    }

    let minor = (amount * 100.0).round();
    if minor > MAX_MINOR_UNITS {
        return Err(invalid("amount is too large"));
    }

    Ok(minor as i64)
}

/// Builds a [`Money`] value for `field`, requiring a strictly positive price.
pub(crate) fn price(
    field: &'static str,
    amount: f64,
    currency: &str,
) -> Result<Money, PaymentLinksError> {
    let minor = to_minor_units(field, amount)?;
    if minor == 0 {
        return Err(PaymentLinksError::InvalidAmount {
            field,
            amount,
            reason: "amount must be at least 0.01".to_string(),
        });
    }
    Ok(Money {
        amount: minor,
        currency: normalize_currency(currency),
    })
}

/// Builds a [`Money`] value for a fee, where zero is allowed.
pub(crate) fn fee(
    field: &'static str,
    amount: f64,
    currency: &str,
) -> Result<Money, PaymentLinksError> {
    Ok(Money {
        amount: to_minor_units(field, amount)?,
        currency: normalize_currency(currency),
    })
}

fn normalize_currency(currency: &str) -> String {
    let trimmed = currency.trim();
    if trimmed.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_conversions() {
        assert_eq!(to_minor_units("amount", 49.99).unwrap(), 4999);
        assert_eq!(to_minor_units("amount", 0.01).unwrap(), 1);
        assert_eq!(to_minor_units("amount", 500.00).unwrap(), 50_000);
        assert_eq!(to_minor_units("amount", 19.999).unwrap(), 2000);
        assert_eq!(to_minor_units("amount", 1.005).unwrap(), 100);
    }

    #[test]
    fn test_two_decimal_amounts_survive_round_trip() {
        for cents in (0..=100_000_i64).step_by(7) {
            #[allow(clippy::cast_precision_loss)]
            let dollars = cents as f64 / 100.0;
            let money = Money::from_major(dollars, "USD").unwrap();
            assert_eq!(money.amount, cents);
            assert!((money.to_major() - dollars).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        for amount in [-0.01, f64::NAN, f64::INFINITY, 1e20] {
            assert!(matches!(
                to_minor_units("shipping_fee", amount),
                Err(PaymentLinksError::InvalidAmount { field: "shipping_fee", .. })
            ));
        }
    }

    #[test]
    fn test_price_must_be_positive_but_fee_may_be_zero() {
        assert!(price("amount", 0.0, "USD").is_err());
        assert!(price("amount", 0.004, "USD").is_err());
        assert_eq!(fee("app_fee", 0.0, "USD").unwrap().amount, 0);
    }

    #[test]
    fn test_currency_is_normalized() {
        assert_eq!(fee("app_fee", 1.0, " cad ").unwrap().currency, "CAD");
        assert_eq!(fee("app_fee", 1.0, "").unwrap().currency, "USD");
    }
}
