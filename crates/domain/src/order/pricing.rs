//! Tier-based discount calculation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{Money, MoneyError};

use super::OrderError;

/// Loyalty tier of a customer, driving the discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CustomerTier {
    /// No discount.
    #[default]
    Regular,

    /// 5% discount.
    Silver,

    /// 10% discount.
    Gold,
}

impl CustomerTier {
    /// Returns the discount rate for this tier.
    pub fn discount_rate(&self) -> Decimal {
        match self {
            CustomerTier::Regular => Decimal::ZERO,
            CustomerTier::Silver => Decimal::new(5, 2),
            CustomerTier::Gold => Decimal::new(10, 2),
        }
    }

    /// Returns the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerTier::Regular => "Regular",
            CustomerTier::Silver => "Silver",
            CustomerTier::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CustomerTier {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(CustomerTier::Regular),
            "silver" => Ok(CustomerTier::Silver),
            "gold" => Ok(CustomerTier::Gold),
            _ => Err(OrderError::UnknownCustomerTier {
                value: s.to_string(),
            }),
        }
    }
}

/// Stateless discount calculator.
///
/// Safe to call from any number of threads; holds no state.
pub struct PricingService;

impl PricingService {
    /// Calculates the discount for a customer tier against a subtotal.
    ///
    /// Returns `subtotal * rate` in the subtotal's currency.
    pub fn calculate_discount(tier: CustomerTier, subtotal: &Money) -> Result<Money, MoneyError> {
        subtotal.multiply(tier.discount_rate())
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
    fn test_regular_gets_no_discount() {
        let discount = PricingService::calculate_discount(CustomerTier::Regular, &usd(dec!(100)))
            .unwrap();
        assert!(discount.is_zero());
        assert_eq!(discount.currency(), "USD");
    }

    #[test]
    fn test_silver_gets_five_percent() {
        let discount =
            PricingService::calculate_discount(CustomerTier::Silver, &usd(dec!(100))).unwrap();
        assert_eq!(discount, usd(dec!(5.00)));
    }

    #[test]
    fn test_gold_gets_ten_percent() {
        let discount =
            PricingService::calculate_discount(CustomerTier::Gold, &usd(dec!(199.98))).unwrap();
        assert_eq!(discount, usd(dec!(19.9980)));
    }

    #[test]
    fn test_discount_keeps_subtotal_currency() {
        let eur = Money::new(dec!(200), "EUR").unwrap();
        let discount = PricingService::calculate_discount(CustomerTier::Gold, &eur).unwrap();
        assert_eq!(discount.currency(), "EUR");
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("gold".parse::<CustomerTier>().unwrap(), CustomerTier::Gold);
        assert_eq!(
            "Silver".parse::<CustomerTier>().unwrap(),
            CustomerTier::Silver
        );
        assert_eq!(
            " REGULAR ".parse::<CustomerTier>().unwrap(),
            CustomerTier::Regular
        );
    }

    #[test]
    fn test_unknown_tier_fails() {
        let result = "platinum".parse::<CustomerTier>();
        assert_eq!(
            result,
            Err(OrderError::UnknownCustomerTier {
                value: "platinum".to_string()
            })
        );
    }
}
