use crate::domain::certificate::Certificate;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which channel settled an order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    Site,
    Bot,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Bot => "bot",
        }
    }
}

/// One row of the order log, one per settled order.
///
/// This is the single column contract for spreadsheet-backed adapters; columns
/// are located by header name, in this order: `orderId`, `source`,
/// `settledAt`, `totalAmount`, `paidAmount`, `dueAmount`, `paymentLabel`,
/// `buyerName`, `phone`, `delivery`, `itemsText`, `done`, `doneAt`.
/// Amount fields are caller-supplied strings passed through verbatim.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderLogRow {
    pub order_id: String,
    pub source: OrderSource,
    pub settled_at: DateTime<Utc>,
    pub total_amount: String,
    pub paid_amount: String,
    pub due_amount: String,
    pub payment_label: String,
    pub buyer_name: String,
    pub phone: String,
    pub delivery: String,
    pub items_text: String,
    pub done: bool,
    pub done_at: Option<DateTime<Utc>>,
}

/// Append/update access to the certificate table of the external log.
#[async_trait]
pub trait CertificateLog: Send + Sync {
    async fn append(&self, certificate: Certificate) -> Result<()>;
    /// Exact-match scan; always re-reads the log.
    async fn find_by_code(&self, code: &str) -> Result<Option<Certificate>>;
    /// Rewrites the status and usage-timestamp fields of the matching row to
    /// `used`, leaving other fields untouched. Returns `false` when no row
    /// matches the code.
    async fn mark_used(&self, code: &str, used_at: DateTime<Utc>) -> Result<bool>;
}

/// Append/update access to the order table of the external log.
#[async_trait]
pub trait OrderLog: Send + Sync {
    async fn append(&self, row: OrderLogRow) -> Result<()>;
    async fn list(&self) -> Result<Vec<OrderLogRow>>;
    /// Rewrites only the done-flag and done-timestamp columns of the row
    /// matching the order id. Returns `false` when no row matches.
    async fn mark_done(&self, order_id: &str, done_at: DateTime<Utc>) -> Result<bool>;
}

/// Sends a text message to the fixed operator destination.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceRequest {
    /// Amount in the provider's minor units (hundredths).
    pub amount_minor: i64,
    /// Order identifier, echoed back in the settlement callback.
    pub reference: String,
}

/// Creates hosted payment pages with the payment provider.
#[async_trait]
pub trait InvoiceProvider: Send + Sync {
    /// Returns the redirect URL of the hosted payment page.
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<String>;
}

pub type CertificateLogRef = Arc<dyn CertificateLog>;
pub type OrderLogRef = Arc<dyn OrderLog>;
pub type ChatNotifierRef = Arc<dyn ChatNotifier>;
pub type InvoiceProviderRef = Arc<dyn InvoiceProvider>;
