//! Domain-event publication port and notification mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use domain::{Order, OrderDomainEvent};

/// Errors produced while dispatching notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The transport rejected the notification.
    #[error("failed to dispatch notification: {0}")]
    Dispatch(String),
}

/// Transport-level notification, one variant per domain event.
///
/// The mapping in [`notification_for`] is an exhaustive `match`, so adding a
/// domain event variant without a notification is a compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OrderNotification {
    /// An order was created.
    OrderCreated {
        order_id: Uuid,
        customer_id: Uuid,
        total_amount: Decimal,
        currency: String,
        occurred_at: DateTime<Utc>,
    },

    /// An order was confirmed.
    OrderConfirmed {
        order_id: Uuid,
        customer_id: Uuid,
        total_amount: Decimal,
        currency: String,
        confirmed_at: DateTime<Utc>,
    },
}

/// Maps a domain event to its transport notification.
pub fn notification_for(event: &OrderDomainEvent) -> OrderNotification {
    match event {
        OrderDomainEvent::OrderCreated(data) => OrderNotification::OrderCreated {
            order_id: data.order_id.as_uuid(),
            customer_id: data.customer_id.as_uuid(),
            total_amount: data.total.amount(),
            currency: data.total.currency().to_string(),
            occurred_at: data.occurred_at,
        },
        OrderDomainEvent::OrderConfirmed(data) => OrderNotification::OrderConfirmed {
            order_id: data.order_id.as_uuid(),
            customer_id: data.customer_id.as_uuid(),
            total_amount: data.total.amount(),
            currency: data.total.currency().to_string(),
            confirmed_at: data.confirmed_at,
        },
    }
}

/// Publication port for buffered domain events.
///
/// Implementations drain an aggregate's event buffer, dispatch one
/// notification per event, and clear the buffer. Use cases call this only
/// after [`UnitOfWork::save_changes`] has succeeded; if persistence fails,
/// the buffered events must never reach a publisher.
///
/// [`UnitOfWork::save_changes`]: crate::repository::UnitOfWork::save_changes
#[async_trait]
pub trait DomainEventPublisher: Send + Sync {
    /// Publishes and clears the events buffered on one aggregate.
    async fn publish(&self, order: &mut Order) -> Result<(), PublishError>;

    /// Publishes and clears the events buffered on each aggregate in turn.
    async fn publish_all(&self, orders: &mut [Order]) -> Result<(), PublishError> {
        for order in orders {
            self.publish(order).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CustomerId, Money, OrderId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_created_event_maps_to_created_notification() {
        let order_id = OrderId::new();
        let customer_id = CustomerId::new();
        let total = Money::new(dec!(199.98), "USD").unwrap();
        let event = OrderDomainEvent::order_created(order_id, customer_id, total);

        match notification_for(&event) {
            OrderNotification::OrderCreated {
                order_id: oid,
                customer_id: cid,
                total_amount,
                currency,
                ..
            } => {
                assert_eq!(oid, order_id.as_uuid());
                assert_eq!(cid, customer_id.as_uuid());
                assert_eq!(total_amount, dec!(199.98));
                assert_eq!(currency, "USD");
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[test]
    fn test_confirmed_event_maps_to_confirmed_notification() {
        let event = OrderDomainEvent::order_confirmed(
            OrderId::new(),
            CustomerId::new(),
            Money::new(dec!(90), "EUR").unwrap(),
        );

        match notification_for(&event) {
            OrderNotification::OrderConfirmed {
                total_amount,
                currency,
                ..
            } => {
                assert_eq!(total_amount, dec!(90));
                assert_eq!(currency, "EUR");
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[test]
    fn test_notification_serialization() {
        let event = OrderDomainEvent::order_created(
            OrderId::new(),
            CustomerId::new(),
            Money::new(dec!(10), "USD").unwrap(),
        );
        let notification = notification_for(&event);

        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("OrderCreated"));
        let deserialized: OrderNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(notification, deserialized);
    }
}
