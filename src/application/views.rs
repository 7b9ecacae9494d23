use crate::domain::ports::{OrderLogRef, OrderLogRow};
use crate::error::Result;
use chrono::Utc;

/// Operator-facing views over the order log.
pub struct OrderBoard {
    log: OrderLogRef,
}

impl OrderBoard {
    pub fn new(log: OrderLogRef) -> Self {
        Self { log }
    }

    /// Orders not yet marked done.
    pub async fn active_orders(&self) -> Result<Vec<OrderLogRow>> {
        let rows = self.log.list().await?;
        Ok(rows.into_iter().filter(|r| !r.done).collect())
    }

    /// Orders marked done by an operator.
    pub async fn completed_orders(&self) -> Result<Vec<OrderLogRow>> {
        let rows = self.log.list().await?;
        Ok(rows.into_iter().filter(|r| r.done).collect())
    }

    /// Marks the row matching the order id as done. Idempotent: a repeated
    /// call finds the same row and rewrites the same two fields. Returns
    /// `false` when no row matches.
    pub async fn mark_done(&self, order_id: &str) -> Result<bool> {
        self.log.mark_done(order_id, Utc::now()).await
    }
}
