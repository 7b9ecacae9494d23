use crate::domain::certificate::Certificate;
use crate::domain::order::OrderRecord;
use crate::domain::ports::{
    CertificateLogRef, ChatNotifierRef, OrderLogRef, OrderLogRow, OrderSource,
};
use crate::domain::registry::PendingOrderRegistry;
use chrono::Utc;

/// Status value the provider sends for a settled invoice. Anything else is
/// acknowledged and ignored.
const PROVIDER_SUCCESS: &str = "success";

/// Reacts to payment-success signals: mints certificates, assembles the
/// operator notification, drives the log and chat collaborators, and retires
/// the registry entry.
///
/// The registry entry is consumed atomically before any side effect runs, so a
/// redelivered or concurrent signal for the same order finds nothing and
/// no-ops. External-call failures are logged with the order id and stage and
/// never surfaced to the triggering caller; the provider must always see a
/// successful acknowledgment or it will redeliver.
pub struct SettlementOrchestrator {
    registry: PendingOrderRegistry,
    certificates: CertificateLogRef,
    orders: OrderLogRef,
    notifier: ChatNotifierRef,
}

impl SettlementOrchestrator {
    pub fn new(
        registry: PendingOrderRegistry,
        certificates: CertificateLogRef,
        orders: OrderLogRef,
        notifier: ChatNotifierRef,
    ) -> Self {
        Self {
            registry,
            certificates,
            orders,
            notifier,
        }
    }

    /// Handles an asynchronous status callback from the payment provider.
    pub async fn handle_provider_signal(&self, status: &str, reference: &str) {
        if status != PROVIDER_SUCCESS {
            tracing::debug!(order_id = reference, status, "ignoring non-success signal");
            return;
        }

        let Some(record) = self.registry.take(reference).await else {
            tracing::info!(order_id = reference, "signal for unknown or settled order");
            return;
        };

        let redeemed = record.used_certificates.clone();
        let reference_line = format!("Payment reference: {reference}");
        self.settle(reference, record, OrderSource::Site, &reference_line, redeemed)
            .await;
    }

    /// Settles an order paid entirely with gift certificates, bypassing the
    /// provider. The caller supplies the codes being redeemed.
    pub async fn settle_free_order(&self, order_id: &str, redeemed_codes: &[String]) {
        let Some(record) = self.registry.take(order_id).await else {
            tracing::info!(order_id, "free-order settlement for unknown or settled order");
            return;
        };

        let mut redeemed = redeemed_codes.to_vec();
        for code in &record.used_certificates {
            if !redeemed.contains(code) {
                redeemed.push(code.clone());
            }
        }

        self.settle(
            order_id,
            record,
            OrderSource::Site,
            "Paid in full by gift certificate",
            redeemed,
        )
        .await;
    }

    /// Appends a settled order from the alternate bot channel straight to the
    /// order log. The registry is not involved.
    pub async fn log_bot_order(&self, row: OrderLogRow) {
        let order_id = row.order_id.clone();
        if let Err(e) = self.orders.append(row).await {
            tracing::error!(order_id = %order_id, stage = "order-log", error = %e, "bot order append failed");
        }
    }

    /// The fan-out itself. The registry entry has already been consumed; the
    /// notification text must be fully assembled (all certificate blocks)
    /// before the single chat send.
    async fn settle(
        &self,
        order_id: &str,
        record: OrderRecord,
        source: OrderSource,
        reference_line: &str,
        redeemed: Vec<String>,
    ) {
        let now = Utc::now();
        let mut text = record.text.clone();
        text.push_str("\n\n");
        text.push_str(reference_line);

        for item in &record.certificates {
            let certificate = Certificate::mint(order_id, item.nominal);
            text.push_str("\n\n");
            text.push_str(&certificate.notification_block());
            if let Err(e) = self.certificates.append(certificate).await {
                tracing::error!(order_id, stage = "certificate-log", error = %e, "certificate append failed");
            }
        }

        for code in &redeemed {
            match self.certificates.mark_used(code, now).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(order_id, code = %code, "redeemed certificate not found in log");
                }
                Err(e) => {
                    tracing::error!(order_id, code = %code, stage = "certificate-log", error = %e, "mark-used failed");
                }
            }
        }

        let row = OrderLogRow {
            order_id: order_id.to_string(),
            source,
            settled_at: now,
            total_amount: record.total_amount,
            paid_amount: record.paid_amount,
            due_amount: record.due_amount,
            payment_label: record.payment_label,
            buyer_name: record.buyer.name,
            phone: record.buyer.phone,
            delivery: record.delivery,
            items_text: record.items_text,
            done: false,
            done_at: None,
        };
        if let Err(e) = self.orders.append(row).await {
            tracing::error!(order_id, stage = "order-log", error = %e, "order append failed");
        }

        if let Err(e) = self.notifier.send(&text).await {
            tracing::error!(order_id, stage = "chat", error = %e, "notification send failed");
        }

        tracing::info!(order_id, source = source.as_str(), "order settled");
    }
}
