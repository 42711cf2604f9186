//! Money value object with currency-aware arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency used when no other currency is in play (empty orders, defaults).
pub const DEFAULT_CURRENCY: &str = "USD";

/// Errors produced by [`Money`] construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount would be negative.
    #[error("money amount cannot be negative: {amount}")]
    NegativeAmount { amount: Decimal },

    /// Currency code is empty or whitespace.
    #[error("currency code must not be blank")]
    BlankCurrency,

    /// Arithmetic across two different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },
}

/// An immutable amount of money in a single currency.
///
/// Every operation returns a new instance; two values are equal when both
/// amount and currency are equal. Amounts are never negative, which the
/// constructor enforces and arithmetic preserves. Deserialization goes
/// through the constructor as well, so stored data cannot rehydrate an
/// invalid value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

/// Wire shape of [`Money`] before validation.
#[derive(Deserialize)]
struct RawMoney {
    amount: Decimal,
    currency: String,
}

impl TryFrom<RawMoney> for Money {
    type Error = MoneyError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.amount, &raw.currency)
    }
}

impl Money {
    /// Creates a new money value.
    ///
    /// The currency code is normalized to ASCII uppercase. Fails if the
    /// amount is negative or the currency code is blank.
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, MoneyError> {
        if amount < Decimal::ZERO {
            return Err(MoneyError::NegativeAmount { amount });
        }
        if currency.trim().is_empty() {
            return Err(MoneyError::BlankCurrency);
        }
        Ok(Self {
            amount,
            currency: currency.trim().to_ascii_uppercase(),
        })
    }

    /// Returns a zero amount in the given currency.
    ///
    /// Validates the currency exactly like [`Money::new`], so a zero is
    /// indistinguishable from a freshly constructed zero.
    pub fn zero(currency: &str) -> Result<Self, MoneyError> {
        Self::new(Decimal::ZERO, currency)
    }

    /// Returns the amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the uppercase currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Adds another amount of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Money::new(self.amount + other.amount, &self.currency)
    }

    /// Subtracts another amount of the same currency.
    ///
    /// Fails if the result would be negative, since no money value may
    /// carry a negative amount.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Money::new(self.amount - other.amount, &self.currency)
    }

    /// Multiplies the amount by an arbitrary scalar, keeping the currency.
    ///
    /// Fails if the scalar is negative.
    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        Money::new(self.amount * factor, &self.currency)
    }

    /// Scales the amount by a quantity.
    ///
    /// Infallible: a non-negative amount times an unsigned quantity stays
    /// non-negative.
    pub fn times(&self, quantity: u32) -> Money {
        Money {
            amount: self.amount * Decimal::from(quantity),
            currency: self.currency.clone(),
        }
    }

    fn check_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl Default for Money {
    fn default() -> Self {
        // DEFAULT_CURRENCY is a valid uppercase code, so the invariant holds.
        Self {
            amount: Decimal::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    #[test]
    fn test_new_normalizes_currency() {
        let money = Money::new(dec!(10), "usd").unwrap();
        assert_eq!(money.currency(), "USD");
        assert_eq!(money.amount(), dec!(10));
    }

    #[test]
    fn test_new_rejects_negative_amount() {
        let result = Money::new(dec!(-1), "USD");
        assert!(matches!(result, Err(MoneyError::NegativeAmount { .. })));
    }

    #[test]
    fn test_new_rejects_blank_currency() {
        assert!(matches!(
            Money::new(dec!(1), ""),
            Err(MoneyError::BlankCurrency)
        ));
        assert!(matches!(
            Money::new(dec!(1), "   "),
            Err(MoneyError::BlankCurrency)
        ));
    }

    #[test]
    fn test_zero_behaves_like_constructed_zero() {
        assert_eq!(
            Money::zero("USD").unwrap(),
            Money::new(dec!(0), "USD").unwrap()
        );
        assert_eq!(Money::zero("eur").unwrap().currency(), "EUR");
        assert!(Money::zero("USD").unwrap().is_zero());
    }

    #[test]
    fn test_zero_rejects_blank_currency() {
        assert!(matches!(Money::zero(""), Err(MoneyError::BlankCurrency)));
        assert!(matches!(Money::zero("  "), Err(MoneyError::BlankCurrency)));
    }

    #[test]
    fn test_default_is_zero_usd() {
        let money = Money::default();
        assert!(money.is_zero());
        assert_eq!(money.currency(), DEFAULT_CURRENCY);
    }

    #[test]
    fn test_add_same_currency() {
        let sum = usd(dec!(10)).add(&usd(dec!(5))).unwrap();
        assert_eq!(sum, usd(dec!(15)));
    }

    #[test]
    fn test_add_mismatched_currency_fails() {
        let eur = Money::new(dec!(5), "EUR").unwrap();
        let err = usd(dec!(10)).add(&eur).unwrap_err();
        assert_eq!(
            err,
            MoneyError::CurrencyMismatch {
                left: "USD".to_string(),
                right: "EUR".to_string(),
            }
        );
        assert!(err.to_string().contains("USD"));
        assert!(err.to_string().contains("EUR"));
    }

    #[test]
    fn test_subtract_same_currency() {
        let diff = usd(dec!(10)).subtract(&usd(dec!(4))).unwrap();
        assert_eq!(diff, usd(dec!(6)));
    }

    #[test]
    fn test_subtract_into_negative_fails() {
        let result = usd(dec!(5)).subtract(&usd(dec!(10)));
        assert!(matches!(result, Err(MoneyError::NegativeAmount { .. })));
    }

    #[test]
    fn test_multiply_by_scalar() {
        let result = usd(dec!(100)).multiply(dec!(0.05)).unwrap();
        assert_eq!(result, usd(dec!(5.00)));
    }

    #[test]
    fn test_multiply_by_negative_scalar_fails() {
        let result = usd(dec!(100)).multiply(dec!(-1));
        assert!(matches!(result, Err(MoneyError::NegativeAmount { .. })));
    }

    #[test]
    fn test_times_quantity() {
        let line = usd(dec!(99.99)).times(2);
        assert_eq!(line, usd(dec!(199.98)));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(usd(dec!(1.50)), usd(dec!(1.50)));
        assert_ne!(usd(dec!(1.50)), Money::new(dec!(1.50), "EUR").unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(usd(dec!(12.34)).to_string(), "12.34 USD");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let money = usd(dec!(19.99));
        let json = serde_json::to_string(&money).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }

    #[test]
    fn test_deserialization_validates() {
        let negative = r#"{"amount":"-1","currency":"USD"}"#;
        assert!(serde_json::from_str::<Money>(negative).is_err());

        let blank = r#"{"amount":"1","currency":""}"#;
        assert!(serde_json::from_str::<Money>(blank).is_err());

        let lowercase = r#"{"amount":"1.50","currency":"usd"}"#;
        let money: Money = serde_json::from_str(lowercase).unwrap();
        assert_eq!(money.currency(), "USD");
    }
}
