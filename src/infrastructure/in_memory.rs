use crate::domain::certificate::{Certificate, CertificateStatus};
use crate::domain::ports::{
    CertificateLog, ChatNotifier, InvoiceProvider, InvoiceRequest, OrderLog, OrderLogRow,
};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory certificate table.
///
/// Uses `Arc<RwLock<Vec<Certificate>>>` for shared concurrent access. Used by
/// tests and for running the relay without a spreadsheet backend.
#[derive(Default, Clone)]
pub struct InMemoryCertificateLog {
    rows: Arc<RwLock<Vec<Certificate>>>,
}

impl InMemoryCertificateLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<Certificate> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl CertificateLog for InMemoryCertificateLog {
    async fn append(&self, certificate: Certificate) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.push(certificate);
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Certificate>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.code == code).cloned())
    }

    async fn mark_used(&self, code: &str, used_at: DateTime<Utc>) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|c| c.code == code) {
            Some(row) => {
                row.status = CertificateStatus::Used;
                row.used_at = Some(used_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory order table.
#[derive(Default, Clone)]
pub struct InMemoryOrderLog {
    rows: Arc<RwLock<Vec<OrderLogRow>>>,
}

impl InMemoryOrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<OrderLogRow> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl OrderLog for InMemoryOrderLog {
    async fn append(&self, row: OrderLogRow) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.push(row);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<OrderLogRow>> {
        let rows = self.rows.read().await;
        Ok(rows.clone())
    }

    async fn mark_done(&self, order_id: &str, done_at: DateTime<Utc>) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.order_id == order_id) {
            Some(row) => {
                row.done = true;
                row.done_at = Some(done_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Records messages instead of sending them.
#[derive(Default, Clone)]
pub struct InMemoryChatNotifier {
    sent: Arc<RwLock<Vec<String>>>,
}

impl InMemoryChatNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<String> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl ChatNotifier for InMemoryChatNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let mut sent = self.sent.write().await;
        sent.push(text.to_string());
        Ok(())
    }
}

/// Records invoice requests and answers with a canned page URL.
#[derive(Clone)]
pub struct InMemoryInvoiceProvider {
    requests: Arc<RwLock<Vec<InvoiceRequest>>>,
    page_url: String,
    fail: bool,
}

impl Default for InMemoryInvoiceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryInvoiceProvider {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            page_url: "https://pay.example/invoice/stub".to_string(),
            fail: false,
        }
    }

    /// A provider that rejects every request, for exercising the upstream
    /// error path.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub async fn requests(&self) -> Vec<InvoiceRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl InvoiceProvider for InMemoryInvoiceProvider {
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<String> {
        if self.fail {
            return Err(RelayError::Upstream(
                "{\"errText\":\"invalid token\"}".to_string(),
            ));
        }
        let mut requests = self.requests.write().await;
        requests.push(request);
        Ok(self.page_url.clone())
    }
}
