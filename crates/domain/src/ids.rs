//! Typed identifiers for the order domain.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when constructing a value object from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The supplied UUID was the nil UUID.
    #[error("{kind} must not be the nil UUID")]
    NilIdentifier { kind: &'static str },
}

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID, rejecting the nil UUID.
            pub fn from_uuid(uuid: Uuid) -> Result<Self, ValidationError> {
                if uuid.is_nil() {
                    return Err(ValidationError::NilIdentifier { kind: $kind });
                }
                Ok(Self(uuid))
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<Uuid> for $name {
            type Error = ValidationError;

            fn try_from(uuid: Uuid) -> Result<Self, Self::Error> {
                Self::from_uuid(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

identifier!(
    /// Unique identifier for an order aggregate.
    OrderId,
    "order id"
);

identifier!(
    /// Unique identifier for a customer.
    CustomerId,
    "customer id"
);

identifier!(
    /// Unique identifier for a product.
    ProductId,
    "product id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_unique_ids() {
        assert_ne!(OrderId::new(), OrderId::new());
        assert_ne!(CustomerId::new(), CustomerId::new());
        assert_ne!(ProductId::new(), ProductId::new());
    }

    #[test]
    fn test_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = OrderId::from_uuid(uuid).unwrap();
        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_from_nil_uuid_fails() {
        let err = CustomerId::from_uuid(Uuid::nil()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NilIdentifier {
                kind: "customer id"
            }
        );
        assert!(ProductId::try_from(Uuid::nil()).is_err());
        assert!(OrderId::try_from(Uuid::nil()).is_err());
    }

    #[test]
    fn test_value_equality() {
        let uuid = Uuid::new_v4();
        assert_eq!(
            ProductId::from_uuid(uuid).unwrap(),
            ProductId::from_uuid(uuid).unwrap()
        );
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = OrderId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
