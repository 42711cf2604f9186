//! Order use cases.

use domain::{
    CustomerId, CustomerTier, Money, Order, OrderId, OrderItem, PricingService, ProductId,
};

use crate::error::AppError;
use crate::publisher::DomainEventPublisher;
use crate::repository::{OrderRepository, UnitOfWork};

/// Application service exposing the order use cases.
///
/// Every mutating use case runs the same cycle: load the aggregate, ask it
/// to perform the operation, stage it for persistence, commit the unit of
/// work, and only then hand the aggregate to the publisher so its buffered
/// events are dispatched. If the commit fails, the publisher is never
/// invoked and the aggregate (with its stale buffer) is dropped.
pub struct OrderAppService<S, P>
where
    S: OrderRepository + UnitOfWork,
    P: DomainEventPublisher,
{
    store: S,
    publisher: P,
}

impl<S, P> OrderAppService<S, P>
where
    S: OrderRepository + UnitOfWork,
    P: DomainEventPublisher,
{
    /// Creates a new service over a store and a publisher.
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a new order for a customer.
    #[tracing::instrument(skip(self, items))]
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
    ) -> Result<Order, AppError> {
        let mut order = Order::create(customer_id, items)?;
        self.store.add(&order).await?;
        self.commit_and_publish(&mut order).await?;
        Ok(order)
    }

    /// Adds an item to a draft order.
    #[tracing::instrument(skip(self, item))]
    pub async fn add_item(&self, order_id: OrderId, item: OrderItem) -> Result<Order, AppError> {
        self.mutate(order_id, |order| order.add_item(item)).await
    }

    /// Removes an item from a draft order.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<Order, AppError> {
        self.mutate(order_id, |order| order.remove_item(product_id))
            .await
    }

    /// Changes an item quantity on a draft order.
    #[tracing::instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        new_quantity: u32,
    ) -> Result<Order, AppError> {
        self.mutate(order_id, |order| {
            order.update_item_quantity(product_id, new_quantity)
        })
        .await
    }

    /// Applies a fixed discount to a draft order.
    #[tracing::instrument(skip(self, amount))]
    pub async fn apply_discount(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<Order, AppError> {
        self.mutate(order_id, |order| order.apply_discount(amount))
            .await
    }

    /// Applies the discount for a customer tier, computed by the pricing
    /// service from the order's current subtotal.
    #[tracing::instrument(skip(self))]
    pub async fn apply_tier_discount(
        &self,
        order_id: OrderId,
        tier: CustomerTier,
    ) -> Result<Order, AppError> {
        let mut order = self.load(order_id).await?;
        let discount = PricingService::calculate_discount(tier, order.subtotal())?;
        order.apply_discount(discount)?;
        self.store.update(&order).await?;
        self.commit_and_publish(&mut order).await?;
        Ok(order)
    }

    /// Confirms a draft order.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_order(&self, order_id: OrderId) -> Result<Order, AppError> {
        self.mutate(order_id, |order| order.confirm()).await
    }

    /// Cancels a draft or confirmed order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, AppError> {
        self.mutate(order_id, |order| order.cancel()).await
    }

    /// Ships a confirmed order.
    #[tracing::instrument(skip(self))]
    pub async fn ship_order(&self, order_id: OrderId) -> Result<Order, AppError> {
        self.mutate(order_id, |order| order.ship()).await
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, AppError> {
        self.load(order_id).await
    }

    /// Loads all orders placed by a customer.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, AppError> {
        Ok(self.store.get_by_customer_id(customer_id).await?)
    }

    async fn load(&self, order_id: OrderId) -> Result<Order, AppError> {
        self.store
            .get_by_id(order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))
    }

    async fn mutate<F>(&self, order_id: OrderId, operation: F) -> Result<Order, AppError>
    where
        F: FnOnce(&mut Order) -> Result<(), domain::OrderError>,
    {
        let mut order = self.load(order_id).await?;
        operation(&mut order)?;
        self.store.update(&order).await?;
        self.commit_and_publish(&mut order).await?;
        Ok(order)
    }

    async fn commit_and_publish(&self, order: &mut Order) -> Result<(), AppError> {
        let affected = self.store.save_changes().await?;
        tracing::debug!(order_id = %order.id(), affected, "persisted order");
        self.publisher.publish(order).await?;
        Ok(())
    }
}
