//! Domain layer for the order-management reference.
//!
//! This crate provides the aggregate core:
//! - Money and typed identifier value objects
//! - OrderItem child entity
//! - PricingService domain service
//! - Order aggregate root with its lifecycle state machine
//! - Domain events and the event buffer they are collected in

pub mod ids;
pub mod money;
pub mod order;

pub use ids::{CustomerId, OrderId, ProductId, ValidationError};
pub use money::{DEFAULT_CURRENCY, Money, MoneyError};
pub use order::{
    CustomerTier, EventBuffer, Order, OrderConfirmedData, OrderCreatedData, OrderDomainEvent,
    OrderError, OrderItem, OrderStatus, PricingService,
};
