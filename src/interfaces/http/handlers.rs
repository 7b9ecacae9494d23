use super::AppState;
use crate::domain::order::OrderRecord;
use crate::domain::ports::{OrderLogRow, OrderSource};
use crate::error::RelayError;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

pub async fn health() -> &'static str {
    "Mono webhook is alive"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOrderRequest {
    #[serde(default)]
    pub order_id: String,
    #[serde(flatten)]
    pub record: OrderRecord,
}

pub async fn register_order(
    State(state): State<AppState>,
    Json(request): Json<RegisterOrderRequest>,
) -> Response {
    match state
        .registry
        .register(&request.order_id, request.record)
        .await
    {
        Ok(()) => ok_body(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: Option<String>,
    pub amount: Option<Value>,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Response {
    // The storefront sends the amount either as a JSON number or a string.
    let amount = match request.amount {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    match state
        .invoices
        .create(request.order_id.as_deref(), amount.as_deref())
        .await
    {
        Ok(url) => Json(json!({ "pageUrl": url })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Provider settlement callback. Receipt is always acknowledged with 200 —
/// including malformed bodies and internal failures — so the provider never
/// schedules a redelivery storm.
pub async fn mono_webhook(State(state): State<AppState>, body: Option<Json<Value>>) -> Response {
    if let Some(Json(payload)) = body {
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let reference = payload
            .get("reference")
            .and_then(Value::as_str)
            .unwrap_or_default();
        state.settlement.handle_provider_signal(status, reference).await;
    } else {
        tracing::warn!("webhook delivered an unreadable body");
    }
    ok_body()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeOrderRequest {
    pub order_id: Option<String>,
    #[serde(default)]
    pub used_certificates: Vec<String>,
}

pub async fn send_free_order(
    State(state): State<AppState>,
    Json(request): Json<FreeOrderRequest>,
) -> Response {
    let Some(order_id) = request.order_id.filter(|id| !id.trim().is_empty()) else {
        return error_response(RelayError::Validation("orderId is required".to_string()));
    };

    state
        .settlement
        .settle_free_order(&order_id, &request.used_certificates)
        .await;
    ok_body()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotOrderRequest {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub paid_amount: String,
    #[serde(default)]
    pub due_amount: String,
    #[serde(default)]
    pub payment_label: String,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub items_text: String,
}

pub async fn log_bot_order(
    State(state): State<AppState>,
    Json(request): Json<BotOrderRequest>,
) -> Response {
    let row = OrderLogRow {
        order_id: request.order_id,
        source: OrderSource::Bot,
        settled_at: Utc::now(),
        total_amount: request.total_amount,
        paid_amount: request.paid_amount,
        due_amount: request.due_amount,
        payment_label: request.payment_label,
        buyer_name: request.buyer_name,
        phone: request.phone,
        delivery: request.delivery,
        items_text: request.items_text,
        done: false,
        done_at: None,
    };
    state.settlement.log_bot_order(row).await;
    ok_body()
}

#[derive(Deserialize)]
pub struct CheckCertificateRequest {
    pub code: Option<String>,
}

pub async fn check_certificate(
    State(state): State<AppState>,
    Json(request): Json<CheckCertificateRequest>,
) -> Response {
    let Some(code) = request.code.filter(|c| !c.trim().is_empty()) else {
        return error_response(RelayError::Validation("code is required".to_string()));
    };
    Json(state.certificates.check(code.trim()).await).into_response()
}

pub async fn active_orders(State(state): State<AppState>) -> Response {
    match state.board.active_orders().await {
        Ok(orders) => Json(json!({ "orders": orders })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn completed_orders(State(state): State<AppState>) -> Response {
    match state.board.completed_orders().await {
        Ok(orders) => Json(json!({ "orders": orders })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDoneRequest {
    pub order_id: Option<String>,
}

pub async fn mark_done(
    State(state): State<AppState>,
    Json(request): Json<MarkDoneRequest>,
) -> Response {
    let Some(order_id) = request.order_id.filter(|id| !id.trim().is_empty()) else {
        return error_response(RelayError::Validation("orderId is required".to_string()));
    };
    match state.board.mark_done(&order_id).await {
        Ok(found) => Json(json!({ "ok": true, "found": found })).into_response(),
        Err(e) => error_response(e),
    }
}

fn ok_body() -> Response {
    Json(json!({ "ok": true })).into_response()
}

fn error_response(error: RelayError) -> Response {
    let status = match &error {
        RelayError::Validation(_) => StatusCode::BAD_REQUEST,
        RelayError::Upstream(_) | RelayError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
