//! Persistence ports for the order aggregate.
//!
//! Cancellation and timeouts are the caller's concern: every method returns
//! a future that can be dropped or wrapped in `tokio::time::timeout`.

use async_trait::async_trait;
use thiserror::Error;

use domain::{CustomerId, Order, OrderId};

/// Errors produced by persistence collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The underlying storage failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Persistence port for orders.
///
/// Implementations are the only callers of [`Order::reconstitute`]: loading
/// rehydrates a previously valid aggregate without re-running creation-time
/// validation.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Loads an order by id, or `None` if it does not exist.
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Stages a new order for persistence.
    async fn add(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Stages an updated order for persistence.
    async fn update(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Loads all orders placed by a customer.
    async fn get_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError>;
}

/// Transaction boundary around persistence calls.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commits all staged changes and returns the number of affected
    /// records.
    async fn save_changes(&self) -> Result<u64, RepositoryError>;
}
