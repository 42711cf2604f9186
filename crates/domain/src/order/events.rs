//! Order domain events and the aggregate's event buffer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CustomerId, OrderId};
use crate::money::Money;

/// Events raised by the order aggregate.
///
/// Events are immutable records of a business-significant occurrence. They
/// are collected in the aggregate's [`EventBuffer`] and published only after
/// the mutation that raised them has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderDomainEvent {
    /// Order was created.
    OrderCreated(OrderCreatedData),

    /// Order was confirmed by the customer.
    OrderConfirmed(OrderConfirmedData),
}

impl OrderDomainEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderDomainEvent::OrderCreated(_) => "OrderCreated",
            OrderDomainEvent::OrderConfirmed(_) => "OrderConfirmed",
        }
    }

    /// Creates an OrderCreated event stamped with the current time.
    pub fn order_created(order_id: OrderId, customer_id: CustomerId, total: Money) -> Self {
        OrderDomainEvent::OrderCreated(OrderCreatedData {
            order_id,
            customer_id,
            total,
            occurred_at: Utc::now(),
        })
    }

    /// Creates an OrderConfirmed event stamped with the current time.
    pub fn order_confirmed(order_id: OrderId, customer_id: CustomerId, total: Money) -> Self {
        OrderDomainEvent::OrderConfirmed(OrderConfirmedData {
            order_id,
            customer_id,
            total,
            confirmed_at: Utc::now(),
        })
    }
}

/// Data for the OrderCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedData {
    /// The newly created order.
    pub order_id: OrderId,

    /// The customer who placed the order.
    pub customer_id: CustomerId,

    /// Order total at creation time.
    pub total: Money,

    /// When the order was created.
    pub occurred_at: DateTime<Utc>,
}

/// Data for the OrderConfirmed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmedData {
    /// The confirmed order.
    pub order_id: OrderId,

    /// The customer who placed the order.
    pub customer_id: CustomerId,

    /// Order total at confirmation time.
    pub total: Money,

    /// When the order was confirmed.
    pub confirmed_at: DateTime<Utc>,
}

/// Ordered buffer of not-yet-published domain events.
///
/// Aggregates own one of these by value instead of inheriting event-raising
/// behavior from a base type. The buffer is exposed read-only by the
/// aggregate; clearing it is reserved for the publication collaborator after
/// a successful persist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBuffer {
    events: Vec<OrderDomainEvent>,
}

impl EventBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the buffer.
    pub(crate) fn record(&mut self, event: OrderDomainEvent) {
        self.events.push(event);
    }

    /// Returns the buffered events in the order they were raised.
    pub fn as_slice(&self) -> &[OrderDomainEvent] {
        &self.events
    }

    /// Returns the number of buffered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events are buffered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Empties the buffer.
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}
