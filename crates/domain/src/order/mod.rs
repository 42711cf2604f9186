//! Order aggregate and related types.

mod aggregate;
mod events;
mod item;
mod pricing;
mod status;

pub use aggregate::Order;
pub use events::{EventBuffer, OrderConfirmedData, OrderCreatedData, OrderDomainEvent};
pub use item::OrderItem;
pub use pricing::{CustomerTier, PricingService};
pub use status::OrderStatus;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ids::ValidationError;
use crate::money::MoneyError;

/// Business-rule violations raised by order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Operation is not allowed in the order's current status.
    #[error("invalid state transition: cannot {action} a {current_status} order")]
    InvalidStateTransition {
        current_status: OrderStatus,
        action: &'static str,
    },

    /// Order must contain at least one item.
    #[error("order must contain at least one item")]
    NoItems,

    /// No item with the given product exists in the order.
    #[error("item not found: {product_id}")]
    ItemNotFound { product_id: String },

    /// Removing the item would leave the order empty.
    #[error("cannot remove last item from order")]
    CannotRemoveLastItem,

    /// Quantity must be greater than zero.
    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// Unit price must be greater than zero.
    #[error("unit price must be positive, got {price}")]
    InvalidPrice { price: Decimal },

    /// Items in the order do not share a single currency.
    #[error("all items must have the same currency")]
    MixedCurrencies,

    /// Discount currency does not match the subtotal currency.
    #[error("discount currency {discount} does not match order currency {order}")]
    DiscountCurrencyMismatch { discount: String, order: String },

    /// Discount is larger than the subtotal.
    #[error("discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { discount: Decimal, subtotal: Decimal },

    /// Customer tier string was not recognized.
    #[error("unknown customer tier: {value}")]
    UnknownCustomerTier { value: String },

    /// A money operation failed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A value object rejected its raw input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
