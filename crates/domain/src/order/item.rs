//! Order line item.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::Money;

use super::OrderError;

/// A line in an order: a product reference, a quantity, and a unit price.
///
/// Items have no identity of their own and exist only inside an [`Order`];
/// all mutation goes through the owning aggregate.
///
/// [`Order`]: super::Order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    ///
    /// Fails if the quantity is zero or the unit price is not positive.
    pub fn new(
        product_id: ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        if !unit_price.is_positive() {
            return Err(OrderError::InvalidPrice {
                price: unit_price.amount(),
            });
        }
        Ok(Self {
            product_id,
            quantity,
            unit_price,
        })
    }

    /// Returns the product this line refers to.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the quantity ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the price per unit.
    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    /// Returns the total for this line, always recomputed as
    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Changes the quantity. Same positivity rule as construction.
    ///
    /// Only the owning aggregate may call this.
    pub(crate) fn update_quantity(&mut self, new_quantity: u32) -> Result<(), OrderError> {
        if new_quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                quantity: new_quantity,
            });
        }
        self.quantity = new_quantity;
        Ok(())
    }
}
