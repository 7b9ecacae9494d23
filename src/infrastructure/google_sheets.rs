use crate::domain::certificate::{Certificate, CertificateStatus};
use crate::domain::ports::{CertificateLog, OrderLog, OrderLogRow, OrderSource};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

/// Tab holding certificate rows.
pub const CERTIFICATES_TAB: &str = "Certificates";
/// Tab holding order rows.
pub const ORDERS_TAB: &str = "Orders";

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Spreadsheet-backed log client over the Google Sheets values API.
///
/// Implements both log ports against two tabs of one spreadsheet. Columns are
/// located by header name (row 1 of each tab), per the contract documented on
/// [`OrderLogRow`]; fixed offsets are never used. Every read fetches the tab
/// in full — the view is eventually consistent and uncached.
///
/// This struct is thread-safe (`Clone` shares the underlying client).
#[derive(Clone)]
pub struct GoogleSheetsLog {
    http: reqwest::Client,
    spreadsheet_id: String,
    token: String,
}

impl GoogleSheetsLog {
    pub fn new(http: reqwest::Client, spreadsheet_id: String, token: String) -> Self {
        Self {
            http,
            spreadsheet_id,
            token,
        }
    }

    /// Reads a tab in full, header row included. An empty tab yields no rows.
    async fn read_tab(&self, tab: &str) -> Result<Vec<Vec<Value>>> {
        let url = format!("{API_BASE}/{}/values/{tab}", self.spreadsheet_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(RelayError::Upstream(body.to_string()));
        }

        let rows = body
            .get("values")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(|r| r.as_array().cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn append_row(&self, tab: &str, row: Vec<Value>) -> Result<()> {
        let url = format!(
            "{API_BASE}/{}/values/{tab}:append?valueInputOption=RAW",
            self.spreadsheet_id
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream(body));
        }
        Ok(())
    }

    /// Overwrites a single cell. `sheet_row` is 1-based (header is row 1),
    /// `column` is 0-based.
    async fn update_cell(&self, tab: &str, sheet_row: usize, column: usize, value: Value) -> Result<()> {
        let a1 = format!("{}{}", column_letter(column), sheet_row);
        let url = format!(
            "{API_BASE}/{}/values/{tab}!{a1}?valueInputOption=RAW",
            self.spreadsheet_id
        );
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream(body));
        }
        Ok(())
    }
}

#[async_trait]
impl CertificateLog for GoogleSheetsLog {
    async fn append(&self, certificate: Certificate) -> Result<()> {
        let row = vec![
            Value::from(certificate.code),
            Value::from(certificate.nominal.to_string()),
            Value::from(certificate.issued_at.to_rfc3339()),
            Value::from(certificate.expires_at.to_rfc3339()),
            Value::from(certificate.order_id),
            Value::from(certificate.status.as_str()),
            Value::from(String::new()),
        ];
        self.append_row(CERTIFICATES_TAB, row).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Certificate>> {
        let rows = self.read_tab(CERTIFICATES_TAB).await?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(None);
        };
        let code_col = require_column(header, "code")?;

        for row in data {
            if cell_string(row.get(code_col)) == code {
                return Ok(parse_certificate(header, row));
            }
        }
        Ok(None)
    }

    async fn mark_used(&self, code: &str, used_at: DateTime<Utc>) -> Result<bool> {
        let rows = self.read_tab(CERTIFICATES_TAB).await?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(false);
        };
        let code_col = require_column(header, "code")?;
        let status_col = require_column(header, "status")?;
        let used_at_col = require_column(header, "usedAt")?;

        for (i, row) in data.iter().enumerate() {
            if cell_string(row.get(code_col)) == code {
                // Header occupies sheet row 1, so data row i lives at i + 2.
                let sheet_row = i + 2;
                self.update_cell(
                    CERTIFICATES_TAB,
                    sheet_row,
                    status_col,
                    Value::from(CertificateStatus::Used.as_str()),
                )
                .await?;
                self.update_cell(
                    CERTIFICATES_TAB,
                    sheet_row,
                    used_at_col,
                    Value::from(used_at.to_rfc3339()),
                )
                .await?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl OrderLog for GoogleSheetsLog {
    async fn append(&self, row: OrderLogRow) -> Result<()> {
        let cells = vec![
            Value::from(row.order_id),
            Value::from(row.source.as_str()),
            Value::from(row.settled_at.to_rfc3339()),
            Value::from(row.total_amount),
            Value::from(row.paid_amount),
            Value::from(row.due_amount),
            Value::from(row.payment_label),
            Value::from(row.buyer_name),
            Value::from(row.phone),
            Value::from(row.delivery),
            Value::from(row.items_text),
            Value::from(row.done.to_string()),
            Value::from(row.done_at.map(|t| t.to_rfc3339()).unwrap_or_default()),
        ];
        self.append_row(ORDERS_TAB, cells).await
    }

    async fn list(&self) -> Result<Vec<OrderLogRow>> {
        let rows = self.read_tab(ORDERS_TAB).await?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(Vec::new());
        };

        let mut parsed = Vec::with_capacity(data.len());
        for row in data {
            match parse_order_row(header, row) {
                Some(order) => parsed.push(order),
                None => tracing::warn!(row = ?row, "skipping unparsable order row"),
            }
        }
        Ok(parsed)
    }

    async fn mark_done(&self, order_id: &str, done_at: DateTime<Utc>) -> Result<bool> {
        let rows = self.read_tab(ORDERS_TAB).await?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(false);
        };
        let id_col = require_column(header, "orderId")?;
        let done_col = require_column(header, "done")?;
        let done_at_col = require_column(header, "doneAt")?;

        for (i, row) in data.iter().enumerate() {
            if cell_string(row.get(id_col)) == order_id {
                let sheet_row = i + 2;
                self.update_cell(ORDERS_TAB, sheet_row, done_col, Value::from("true"))
                    .await?;
                self.update_cell(
                    ORDERS_TAB,
                    sheet_row,
                    done_at_col,
                    Value::from(done_at.to_rfc3339()),
                )
                .await?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn header_index(header: &[Value], name: &str) -> Option<usize> {
    header.iter().position(|cell| cell_string(Some(cell)) == name)
}

fn require_column(header: &[Value], name: &str) -> Result<usize> {
    header_index(header, name)
        .ok_or_else(|| RelayError::Upstream(format!("sheet header missing column: {name}")))
}

/// 0-based column index to A1 letters (0 -> A, 25 -> Z, 26 -> AA).
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn cell_string(cell: Option<&Value>) -> String {
    match cell {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// The done flag accepts a boolean `true` or the strings `"true"`/`"TRUE"`.
fn cell_is_true(cell: Option<&Value>) -> bool {
    match cell {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s == "true" || s == "TRUE" || s == "True"
        }
        _ => false,
    }
}

fn cell_timestamp(cell: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = cell_string(cell);
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn parse_certificate(header: &[Value], row: &[Value]) -> Option<Certificate> {
    let col = |name: &str| header_index(header, name).map(|i| row.get(i));
    let status = match cell_string(col("status")?).trim() {
        "used" => CertificateStatus::Used,
        _ => CertificateStatus::Active,
    };

    Some(Certificate {
        code: cell_string(col("code")?),
        nominal: cell_string(col("nominal")?).trim().parse().ok()?,
        issued_at: cell_timestamp(col("issuedAt")?)?,
        expires_at: cell_timestamp(col("expiresAt")?)?,
        order_id: cell_string(col("orderId")?),
        status,
        used_at: header_index(header, "usedAt").and_then(|i| cell_timestamp(row.get(i))),
    })
}

fn parse_order_row(header: &[Value], row: &[Value]) -> Option<OrderLogRow> {
    let col = |name: &str| header_index(header, name).map(|i| row.get(i));
    let source = match cell_string(col("source")?).trim() {
        "bot" => OrderSource::Bot,
        _ => OrderSource::Site,
    };

    Some(OrderLogRow {
        order_id: cell_string(col("orderId")?),
        source,
        settled_at: cell_timestamp(col("settledAt")?)?,
        total_amount: cell_string(col("totalAmount")?),
        paid_amount: cell_string(col("paidAmount")?),
        due_amount: cell_string(col("dueAmount")?),
        payment_label: cell_string(col("paymentLabel")?),
        buyer_name: cell_string(col("buyerName")?),
        phone: cell_string(col("phone")?),
        delivery: cell_string(col("delivery")?),
        items_text: cell_string(col("itemsText")?),
        done: cell_is_true(col("done")?),
        done_at: header_index(header, "doneAt").and_then(|i| cell_timestamp(row.get(i))),
    })
}
