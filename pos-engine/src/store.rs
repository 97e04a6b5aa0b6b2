//! Authoritative order store with optimistic concurrency
//!
//! Multiple terminals operate concurrently against one store. Orders are
//! independent units of concurrency control: every write is a per-order
//! compare-and-swap on a monotonically increasing version, and a version
//! mismatch surfaces as `ConcurrentModification` - transient, the caller
//! re-reads and retries. The state machine and settlement logic are pure
//! functions of `(current state, input)`, so retry-on-conflict is safe.
//!
//! Durable persistence is an adapter concern behind the same trait; the
//! in-memory [`MemoryOrderStore`] is the in-process authoritative store.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shared::error::{PosError, PosResult};
use shared::models::order::Order;

/// An order together with the store version it was read at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionedOrder {
    pub order: Order,
    /// Incremented on every successful write
    pub version: u64,
}

/// Per-order atomic read-modify-write storage
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order at version 1
    async fn insert(&self, order: Order) -> PosResult<VersionedOrder>;

    /// Read an order with its current version
    async fn get(&self, order_id: &str) -> PosResult<VersionedOrder>;

    /// Compare-and-swap write: succeeds only when `expected_version` matches
    /// the stored version, otherwise fails with `ConcurrentModification`
    async fn update(&self, order: Order, expected_version: u64) -> PosResult<VersionedOrder>;

    /// All non-terminal orders, for status-board polling. Staleness between
    /// polls is expected; the store is the only source of truth.
    async fn list_active(&self) -> PosResult<Vec<VersionedOrder>>;
}

/// In-memory store on a concurrent map
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: DashMap<String, VersionedOrder>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order) -> PosResult<VersionedOrder> {
        let versioned = VersionedOrder { order, version: 1 };
        self.orders
            .insert(versioned.order.id.clone(), versioned.clone());
        Ok(versioned)
    }

    async fn get(&self, order_id: &str) -> PosResult<VersionedOrder> {
        self.orders
            .get(order_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| PosError::OrderNotFound(order_id.to_string()))
    }

    async fn update(&self, order: Order, expected_version: u64) -> PosResult<VersionedOrder> {
        let order_id = order.id.clone();
        let mut entry = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| PosError::OrderNotFound(order_id.clone()))?;

        if entry.version != expected_version {
            tracing::debug!(
                order_id = %order_id,
                expected = expected_version,
                actual = entry.version,
                "compare-and-swap rejected"
            );
            return Err(PosError::ConcurrentModification { order_id });
        }

        entry.order = order;
        entry.version += 1;
        Ok(entry.clone())
    }

    async fn list_active(&self) -> PosResult<Vec<VersionedOrder>> {
        Ok(self
            .orders
            .iter()
            .filter(|entry| !entry.order.status.is_terminal())
            .map(|entry| entry.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::order::{OrderStatus, OrderType};
    use shared::money::{Currency, Money};

    fn order() -> Order {
        Order::new(
            "ORD20260830-1001".to_string(),
            OrderType::Pickup,
            Vec::new(),
            None,
            None,
            Money::new(10000, Currency::Brl),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryOrderStore::new();
        let inserted = store.insert(order()).await.unwrap();
        assert_eq!(inserted.version, 1);

        let read = store.get(&inserted.order.id).await.unwrap();
        assert_eq!(read, inserted);
    }

    #[tokio::test]
    async fn test_get_missing_fails() {
        let store = MemoryOrderStore::new();
        let result = store.get("ghost").await;
        assert!(matches!(result, Err(PosError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store = MemoryOrderStore::new();
        let inserted = store.insert(order()).await.unwrap();

        let mut changed = inserted.order.clone();
        changed.status = OrderStatus::InPreparation;
        let updated = store.update(changed, 1).await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.order.status, OrderStatus::InPreparation);
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let store = MemoryOrderStore::new();
        let inserted = store.insert(order()).await.unwrap();

        // Terminal A writes at version 1
        let mut a = inserted.order.clone();
        a.status = OrderStatus::InPreparation;
        store.update(a, 1).await.unwrap();

        // Terminal B still holds version 1 - rejected
        let mut b = inserted.order.clone();
        b.status = OrderStatus::Cancelled;
        let result = store.update(b, 1).await;
        assert!(matches!(
            result,
            Err(PosError::ConcurrentModification { .. })
        ));

        // B re-reads and retries at the current version
        let fresh = store.get(&inserted.order.id).await.unwrap();
        assert_eq!(fresh.version, 2);
        assert_eq!(fresh.order.status, OrderStatus::InPreparation);
    }

    #[tokio::test]
    async fn test_list_active_excludes_terminal() {
        let store = MemoryOrderStore::new();
        let a = store.insert(order()).await.unwrap();
        let b = store.insert(order()).await.unwrap();

        let mut completed = b.order.clone();
        completed.status = OrderStatus::Completed;
        store.update(completed, 1).await.unwrap();

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].order.id, a.order.id);
    }
}
