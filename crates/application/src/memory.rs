//! In-memory implementations of the persistence and publication ports.
//!
//! These provide the same interfaces a database-backed implementation
//! would, and are used by the service tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use domain::{CustomerId, Money, Order, OrderId, OrderItem, OrderStatus};

use crate::publisher::{DomainEventPublisher, OrderNotification, PublishError, notification_for};
use crate::repository::{OrderRepository, RepositoryError, UnitOfWork};

/// Snapshot of an order's persisted fields, without the event buffer.
#[derive(Debug, Clone)]
struct OrderRecord {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    items: Vec<OrderItem>,
    subtotal: Money,
    discount: Money,
    total: Money,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    fn snapshot(order: &Order) -> Self {
        Self {
            id: order.id(),
            customer_id: order.customer_id(),
            status: order.status(),
            items: order.items().to_vec(),
            subtotal: order.subtotal().clone(),
            discount: order.discount().clone(),
            total: order.total().clone(),
            created_at: order.created_at(),
            confirmed_at: order.confirmed_at(),
        }
    }

    fn rehydrate(&self) -> Order {
        Order::reconstitute(
            self.id,
            self.customer_id,
            self.status,
            self.items.clone(),
            self.subtotal.clone(),
            self.discount.clone(),
            self.total.clone(),
            self.created_at,
            self.confirmed_at,
        )
    }
}

/// In-memory order store implementing both the repository and the unit of
/// work.
///
/// `add`/`update` stage snapshots; nothing becomes visible to readers until
/// [`UnitOfWork::save_changes`] commits the staged records. A failure can be
/// injected with [`fail_next_save`] to exercise the
/// publication-after-persistence contract.
///
/// [`fail_next_save`]: InMemoryOrderStore::fail_next_save
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    committed: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
    pending: Arc<RwLock<Vec<OrderRecord>>>,
    fail_next_save: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `save_changes` call fail.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Returns the number of committed orders.
    pub async fn committed_count(&self) -> usize {
        self.committed.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderStore {
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let committed = self.committed.read().await;
        Ok(committed.get(&id).map(OrderRecord::rehydrate))
    }

    async fn add(&self, order: &Order) -> Result<(), RepositoryError> {
        self.pending.write().await.push(OrderRecord::snapshot(order));
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), RepositoryError> {
        self.pending.write().await.push(OrderRecord::snapshot(order));
        Ok(())
    }

    async fn get_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let committed = self.committed.read().await;
        let mut orders: Vec<_> = committed
            .values()
            .filter(|record| record.customer_id == customer_id)
            .collect();
        orders.sort_by_key(|record| record.created_at);
        Ok(orders.into_iter().map(OrderRecord::rehydrate).collect())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryOrderStore {
    async fn save_changes(&self) -> Result<u64, RepositoryError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            self.pending.write().await.clear();
            return Err(RepositoryError::Storage(
                "injected save failure".to_string(),
            ));
        }

        let mut pending = self.pending.write().await;
        let count = pending.len() as u64;
        let mut committed = self.committed.write().await;
        for record in pending.drain(..) {
            committed.insert(record.id, record);
        }
        Ok(count)
    }
}

/// Publisher that records dispatched notifications in memory.
#[derive(Clone, Default)]
pub struct InMemoryPublisher {
    sent: Arc<RwLock<Vec<OrderNotification>>>,
}

impl InMemoryPublisher {
    /// Creates a new publisher with an empty dispatch log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications dispatched so far.
    pub async fn sent(&self) -> Vec<OrderNotification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl DomainEventPublisher for InMemoryPublisher {
    async fn publish(&self, order: &mut Order) -> Result<(), PublishError> {
        let notifications: Vec<_> = order.domain_events().iter().map(notification_for).collect();

        let mut sent = self.sent.write().await;
        for notification in notifications {
            tracing::debug!(?notification, "dispatching order notification");
            sent.push(notification);
        }
        drop(sent);

        order.clear_domain_events();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ProductId;
    use rust_decimal_macros::dec;

    fn usd_item(amount: rust_decimal::Decimal) -> OrderItem {
        OrderItem::new(ProductId::new(), 1, Money::new(amount, "USD").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_staged_orders_invisible_until_save() {
        let store = InMemoryOrderStore::new();
        let order = Order::create(CustomerId::new(), vec![usd_item(dec!(10))]).unwrap();

        store.add(&order).await.unwrap();
        assert!(store.get_by_id(order.id()).await.unwrap().is_none());

        let affected = store.save_changes().await.unwrap();
        assert_eq!(affected, 1);
        assert!(store.get_by_id(order.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rehydrated_order_matches_snapshot() {
        let store = InMemoryOrderStore::new();
        let order = Order::create(CustomerId::new(), vec![usd_item(dec!(42))]).unwrap();
        store.add(&order).await.unwrap();
        store.save_changes().await.unwrap();

        let loaded = store.get_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(loaded.id(), order.id());
        assert_eq!(loaded.status(), order.status());
        assert_eq!(loaded.items(), order.items());
        assert_eq!(loaded.total(), order.total());
        assert_eq!(loaded.created_at(), order.created_at());
        // The event buffer is not persisted.
        assert!(loaded.domain_events().is_empty());
    }

    #[tokio::test]
    async fn test_injected_save_failure_discards_pending() {
        let store = InMemoryOrderStore::new();
        let order = Order::create(CustomerId::new(), vec![usd_item(dec!(10))]).unwrap();

        store.add(&order).await.unwrap();
        store.fail_next_save();
        assert!(store.save_changes().await.is_err());

        // Failed transaction left nothing behind, and the next save is clean.
        assert_eq!(store.committed_count().await, 0);
        assert_eq!(store.save_changes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_customer_id_filters_and_sorts() {
        let store = InMemoryOrderStore::new();
        let customer_id = CustomerId::new();

        let first = Order::create(customer_id, vec![usd_item(dec!(1))]).unwrap();
        let second = Order::create(customer_id, vec![usd_item(dec!(2))]).unwrap();
        let other = Order::create(CustomerId::new(), vec![usd_item(dec!(3))]).unwrap();

        for order in [&first, &second, &other] {
            store.add(order).await.unwrap();
        }
        store.save_changes().await.unwrap();

        let orders = store.get_by_customer_id(customer_id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.windows(2).all(|w| w[0].created_at() <= w[1].created_at()));
    }

    #[tokio::test]
    async fn test_publisher_drains_buffer() {
        let publisher = InMemoryPublisher::new();
        let mut order = Order::create(CustomerId::new(), vec![usd_item(dec!(10))]).unwrap();
        order.confirm().unwrap();
        assert_eq!(order.domain_events().len(), 2);

        publisher.publish(&mut order).await.unwrap();

        assert!(order.domain_events().is_empty());
        let sent = publisher.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(matches!(sent[0], OrderNotification::OrderCreated { .. }));
        assert!(matches!(sent[1], OrderNotification::OrderConfirmed { .. }));
    }

    #[tokio::test]
    async fn test_publish_all_drains_each_aggregate() {
        let publisher = InMemoryPublisher::new();
        let mut orders = vec![
            Order::create(CustomerId::new(), vec![usd_item(dec!(1))]).unwrap(),
            Order::create(CustomerId::new(), vec![usd_item(dec!(2))]).unwrap(),
        ];

        publisher.publish_all(&mut orders).await.unwrap();

        assert!(orders.iter().all(|o| o.domain_events().is_empty()));
        assert_eq!(publisher.sent().await.len(), 2);
    }
}
