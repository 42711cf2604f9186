//! Order aggregate root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CustomerId, OrderId, ProductId};
use crate::money::{DEFAULT_CURRENCY, Money};

use super::{EventBuffer, OrderDomainEvent, OrderError, OrderItem, OrderStatus};

/// Order aggregate root.
///
/// All reads and writes to an order's items, discount, and lifecycle flow
/// through this type. Every mutating operation validates the current status
/// and recomputes totals before any field is written, so a failed operation
/// leaves the aggregate untouched.
///
/// The aggregate is not thread-safe; the owning use case must hold exclusive
/// access for the duration of one load-mutate-persist cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    items: Vec<OrderItem>,
    subtotal: Money,
    discount: Money,
    total: Money,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,

    /// Events raised since the last publication; never persisted.
    #[serde(skip)]
    events: EventBuffer,
}

// Query methods
impl Order {
    /// Returns the order identifier.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the customer who placed the order.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the sum of all line totals.
    pub fn subtotal(&self) -> &Money {
        &self.subtotal
    }

    /// Returns the applied discount.
    pub fn discount(&self) -> &Money {
        &self.discount
    }

    /// Returns the order total (`subtotal - discount`).
    pub fn total(&self) -> &Money {
        &self.total
    }

    /// Returns when the order was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the order was confirmed, if it has been.
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// Returns the buffered, not-yet-published domain events.
    pub fn domain_events(&self) -> &[OrderDomainEvent] {
        self.events.as_slice()
    }

    /// Empties the event buffer.
    ///
    /// Reserved for the publication collaborator after the events have been
    /// dispatched; business logic never calls this.
    pub fn clear_domain_events(&mut self) {
        self.events.clear();
    }
}

// Lifecycle operations
impl Order {
    /// Creates a new draft order with the given items.
    ///
    /// Assigns a fresh id, computes totals, and raises an `OrderCreated`
    /// event. Fails if the item list is empty or the items mix currencies.
    pub fn create(customer_id: CustomerId, items: Vec<OrderItem>) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        let discount = Money::zero(DEFAULT_CURRENCY)?;
        let (subtotal, discount, total) = compute_totals(&items, &discount)?;

        let id = OrderId::new();
        let mut order = Self {
            id,
            customer_id,
            status: OrderStatus::Draft,
            items,
            subtotal,
            discount,
            total,
            created_at: Utc::now(),
            confirmed_at: None,
            events: EventBuffer::new(),
        };
        order.events.record(OrderDomainEvent::order_created(
            id,
            customer_id,
            order.total.clone(),
        ));
        Ok(order)
    }

    /// Rebuilds an order from stored state.
    ///
    /// Performs no validation and no recomputation: the supplied fields are
    /// trusted verbatim. Used exclusively by the persistence collaborator to
    /// rehydrate a previously valid aggregate; the event buffer starts
    /// empty.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: OrderId,
        customer_id: CustomerId,
        status: OrderStatus,
        items: Vec<OrderItem>,
        subtotal: Money,
        discount: Money,
        total: Money,
        created_at: DateTime<Utc>,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            customer_id,
            status,
            items,
            subtotal,
            discount,
            total,
            created_at,
            confirmed_at,
            events: EventBuffer::new(),
        }
    }

    /// Appends an item and recomputes totals.
    pub fn add_item(&mut self, item: OrderItem) -> Result<(), OrderError> {
        self.ensure_can_modify_items("add an item to")?;

        let mut candidate = self.items.clone();
        candidate.push(item);
        let (subtotal, discount, total) = compute_totals(&candidate, &self.discount)?;

        self.items = candidate;
        self.set_totals(subtotal, discount, total);
        Ok(())
    }

    /// Removes the first item matching the product and recomputes totals.
    ///
    /// An order must keep at least one item, so removing the last one fails.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), OrderError> {
        self.ensure_can_modify_items("remove an item from")?;

        let position = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)
            .ok_or_else(|| OrderError::ItemNotFound {
                product_id: product_id.to_string(),
            })?;

        if self.items.len() == 1 {
            return Err(OrderError::CannotRemoveLastItem);
        }

        let mut candidate = self.items.clone();
        candidate.remove(position);
        let (subtotal, discount, total) = compute_totals(&candidate, &self.discount)?;

        self.items = candidate;
        self.set_totals(subtotal, discount, total);
        Ok(())
    }

    /// Changes the quantity of the first item matching the product and
    /// recomputes totals.
    pub fn update_item_quantity(
        &mut self,
        product_id: ProductId,
        new_quantity: u32,
    ) -> Result<(), OrderError> {
        self.ensure_can_modify_items("update an item on")?;

        let position = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)
            .ok_or_else(|| OrderError::ItemNotFound {
                product_id: product_id.to_string(),
            })?;

        let mut candidate = self.items.clone();
        candidate[position].update_quantity(new_quantity)?;
        let (subtotal, discount, total) = compute_totals(&candidate, &self.discount)?;

        self.items = candidate;
        self.set_totals(subtotal, discount, total);
        Ok(())
    }

    /// Applies a discount and recomputes the total.
    ///
    /// The discount must be in the order currency and must not exceed the
    /// subtotal.
    pub fn apply_discount(&mut self, amount: Money) -> Result<(), OrderError> {
        self.ensure_can_modify_items("apply a discount to")?;

        if amount.currency() != self.subtotal.currency() {
            return Err(OrderError::DiscountCurrencyMismatch {
                discount: amount.currency().to_string(),
                order: self.subtotal.currency().to_string(),
            });
        }
        if amount.amount() > self.subtotal.amount() {
            return Err(OrderError::DiscountExceedsSubtotal {
                discount: amount.amount(),
                subtotal: self.subtotal.amount(),
            });
        }

        let (subtotal, discount, total) = compute_totals(&self.items, &amount)?;
        self.set_totals(subtotal, discount, total);
        Ok(())
    }

    /// Confirms the order and raises an `OrderConfirmed` event.
    pub fn confirm(&mut self) -> Result<(), OrderError> {
        if !self.status.can_confirm() {
            return Err(OrderError::InvalidStateTransition {
                current_status: self.status,
                action: "confirm",
            });
        }
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }

        self.status = OrderStatus::Confirmed;
        self.confirmed_at = Some(Utc::now());
        self.events.record(OrderDomainEvent::order_confirmed(
            self.id,
            self.customer_id,
            self.total.clone(),
        ));
        Ok(())
    }

    /// Cancels the order. Allowed from Draft and Confirmed only.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.can_cancel() {
            return Err(OrderError::InvalidStateTransition {
                current_status: self.status,
                action: "cancel",
            });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    /// Ships the order. Allowed from Confirmed only.
    pub fn ship(&mut self) -> Result<(), OrderError> {
        if !self.status.can_ship() {
            return Err(OrderError::InvalidStateTransition {
                current_status: self.status,
                action: "ship",
            });
        }
        self.status = OrderStatus::Shipped;
        Ok(())
    }

    fn ensure_can_modify_items(&self, action: &'static str) -> Result<(), OrderError> {
        if !self.status.can_modify_items() {
            return Err(OrderError::InvalidStateTransition {
                current_status: self.status,
                action,
            });
        }
        Ok(())
    }

    fn set_totals(&mut self, subtotal: Money, discount: Money, total: Money) {
        self.subtotal = subtotal;
        self.discount = discount;
        self.total = total;
    }
}

/// Computes `(subtotal, discount, total)` for a prospective item list.
///
/// Operations call this on candidate state before committing anything, so a
/// failure leaves the aggregate unchanged.
///
/// An empty item list short-circuits to zero subtotal and total without any
/// currency-consistency check; the discount passes through untouched. A
/// discount in a currency other than the subtotal's is silently reset to
/// zero in the subtotal currency.
fn compute_totals(
    items: &[OrderItem],
    discount: &Money,
) -> Result<(Money, Money, Money), OrderError> {
    let Some(first) = items.first() else {
        let zero = Money::zero(DEFAULT_CURRENCY)?;
        return Ok((zero.clone(), discount.clone(), zero));
    };

    let currency = first.unit_price().currency();
    if items
        .iter()
        .any(|item| item.unit_price().currency() != currency)
    {
        return Err(OrderError::MixedCurrencies);
    }

    let mut subtotal = Money::zero(currency)?;
    for item in items {
        subtotal = subtotal.add(&item.line_total())?;
    }

    let discount = if discount.currency() != subtotal.currency() {
        Money::zero(subtotal.currency())?
    } else {
        discount.clone()
    };

    let total = subtotal.subtract(&discount)?;
    Ok((subtotal, discount, total))
}
