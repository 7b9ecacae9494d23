use crate::domain::ports::{InvoiceProvider, InvoiceRequest};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};

const INVOICE_URL: &str = "https://api.monobank.ua/api/merchant/invoice/create";

/// ISO 4217 numeric code for UAH.
const CURRENCY_UAH: u32 = 980;

/// Hosted-invoice client for the Monobank merchant API.
///
/// Creates an invoice carrying the order id as the reconciliation reference
/// and the relay's webhook URL for settlement signals.
#[derive(Clone)]
pub struct MonobankClient {
    http: reqwest::Client,
    token: String,
    webhook_url: String,
}

impl MonobankClient {
    pub fn new(http: reqwest::Client, token: String, webhook_url: String) -> Self {
        Self {
            http,
            token,
            webhook_url,
        }
    }
}

#[async_trait]
impl InvoiceProvider for MonobankClient {
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<String> {
        let body = json!({
            "amount": request.amount_minor,
            "ccy": CURRENCY_UAH,
            "merchantPaymInfo": {
                "reference": request.reference,
            },
            "webHookUrl": self.webhook_url,
        });

        let response = self
            .http
            .post(INVOICE_URL)
            .header("X-Token", &self.token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(RelayError::Upstream(body.to_string()));
        }

        // The provider body is surfaced for diagnostics when no usable
        // redirect URL comes back.
        match body.get("pageUrl").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(RelayError::Upstream(body.to_string())),
        }
    }
}
