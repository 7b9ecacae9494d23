use crate::domain::order::OrderRecord;
use crate::error::{RelayError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The in-memory store of orders awaiting settlement.
///
/// An entry exists only between `register` and settlement. There is no TTL or
/// eviction: orders that are never settled stay for the life of the process.
/// Cloning shares the underlying map.
#[derive(Default, Clone)]
pub struct PendingOrderRegistry {
    orders: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl PendingOrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an order under the given identifier.
    ///
    /// A re-registration under the same key overwrites silently; the caller
    /// owns the identifier's lifecycle.
    pub async fn register(&self, order_id: &str, record: OrderRecord) -> Result<()> {
        if order_id.trim().is_empty() {
            return Err(RelayError::Validation("orderId is required".to_string()));
        }
        if record.text.trim().is_empty() {
            return Err(RelayError::Validation("text is required".to_string()));
        }

        let mut orders = self.orders.write().await;
        orders.insert(order_id.to_string(), record);
        Ok(())
    }

    pub async fn get(&self, order_id: &str) -> Option<OrderRecord> {
        let orders = self.orders.read().await;
        orders.get(order_id).cloned()
    }

    /// Atomically removes and returns the order, if present.
    ///
    /// Settlement goes through this single primitive so that two concurrent
    /// signals for the same order can never both observe the entry: the loser
    /// gets `None` and no-ops.
    pub async fn take(&self, order_id: &str) -> Option<OrderRecord> {
        let mut orders = self.orders.write().await;
        orders.remove(order_id)
    }

    pub async fn remove(&self, order_id: &str) {
        let mut orders = self.orders.write().await;
        orders.remove(order_id);
    }

    pub async fn contains(&self, order_id: &str) -> bool {
        let orders = self.orders.read().await;
        orders.contains_key(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderRecord;

    fn record(text: &str) -> OrderRecord {
        OrderRecord {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = PendingOrderRegistry::new();
        registry.register("A100", record("2x Vase")).await.unwrap();

        let stored = registry.get("A100").await.unwrap();
        assert_eq!(stored.text, "2x Vase");
    }

    #[tokio::test]
    async fn test_register_rejects_empty_order_id() {
        let registry = PendingOrderRegistry::new();
        let result = registry.register("  ", record("2x Vase")).await;

        assert!(matches!(result, Err(RelayError::Validation(_))));
        assert!(!registry.contains("  ").await);
    }

    #[tokio::test]
    async fn test_register_rejects_empty_text() {
        let registry = PendingOrderRegistry::new();
        let result = registry.register("A100", record("")).await;

        assert!(matches!(result, Err(RelayError::Validation(_))));
        assert!(!registry.contains("A100").await);
    }

    #[tokio::test]
    async fn test_reregistration_overwrites() {
        let registry = PendingOrderRegistry::new();
        registry.register("A100", record("first")).await.unwrap();
        registry.register("A100", record("second")).await.unwrap();

        assert_eq!(registry.get("A100").await.unwrap().text, "second");
    }

    #[tokio::test]
    async fn test_take_is_consume_once() {
        let registry = PendingOrderRegistry::new();
        registry.register("A100", record("2x Vase")).await.unwrap();

        assert!(registry.take("A100").await.is_some());
        assert!(registry.take("A100").await.is_none());
        assert!(!registry.contains("A100").await);
    }

    #[tokio::test]
    async fn test_remove_unknown_is_noop() {
        let registry = PendingOrderRegistry::new();
        registry.register("A100", record("2x Vase")).await.unwrap();

        registry.remove("NOPE").await;
        registry.remove("A100").await;
        registry.remove("A100").await;

        assert!(!registry.contains("A100").await);
    }

    #[tokio::test]
    async fn test_concurrent_takes_yield_one_winner() {
        let registry = PendingOrderRegistry::new();
        registry.register("A100", record("2x Vase")).await.unwrap();

        let r1 = registry.clone();
        let r2 = registry.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { r1.take("A100").await }),
            tokio::spawn(async move { r2.take("A100").await }),
        );

        let winners = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|r| r.is_some())
            .count();
        assert_eq!(winners, 1);
    }
}
