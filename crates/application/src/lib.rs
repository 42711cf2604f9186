//! Application layer for the order-management reference.
//!
//! This crate defines the collaborator ports around the domain core:
//! - OrderRepository and UnitOfWork persistence ports
//! - DomainEventPublisher with the event-to-notification mapping
//! - OrderAppService use cases tying them together
//! - In-memory implementations of the ports for testing

pub mod error;
pub mod memory;
pub mod publisher;
pub mod repository;
pub mod service;

pub use error::AppError;
pub use memory::{InMemoryOrderStore, InMemoryPublisher};
pub use publisher::{DomainEventPublisher, OrderNotification, PublishError, notification_for};
pub use repository::{OrderRepository, RepositoryError, UnitOfWork};
pub use service::OrderAppService;
