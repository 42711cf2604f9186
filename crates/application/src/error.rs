//! Application-level error type.
//!
//! The presentation layer maps these onto HTTP responses: business-rule
//! violations become 400-class responses, [`AppError::OrderNotFound`]
//! becomes 404, and everything else 500.

use thiserror::Error;

use domain::{MoneyError, OrderError, OrderId};

use crate::publisher::PublishError;
use crate::repository::RepositoryError;

/// Errors returned by the order use cases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// No order exists with the given id.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// A business rule was violated.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A money value was malformed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The persistence collaborator failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The notification transport failed.
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
}
