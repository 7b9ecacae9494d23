//! HTTP surface of the relay.
//!
//! Routes mirror the storefront contract:
//!
//! - `POST /register-order` — store an order in the registry.
//! - `POST /create-payment` — create a hosted invoice, return the page URL.
//! - `POST /mono-webhook` — provider settlement callback; always 200.
//! - `POST /send-free-order` — settle an order paid entirely by certificate.
//! - `POST /log-bot-order` — append a bot-channel order to the log.
//! - `POST /check-certificate` — certificate validity and nominal.
//! - `GET /admin/active-orders`, `GET /admin/completed-orders`,
//!   `POST /admin/mark-done` — operator views over the order log.

mod handlers;

use crate::application::certificates::CertificateService;
use crate::application::invoice::InvoiceService;
use crate::application::settlement::SettlementOrchestrator;
use crate::application::views::OrderBoard;
use crate::domain::registry::PendingOrderRegistry;
use crate::error::{RelayError, Result};
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub registry: PendingOrderRegistry,
    pub settlement: Arc<SettlementOrchestrator>,
    pub invoices: Arc<InvoiceService>,
    pub certificates: Arc<CertificateService>,
    pub board: Arc<OrderBoard>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/register-order", post(handlers::register_order))
        .route("/create-payment", post(handlers::create_payment))
        .route("/mono-webhook", post(handlers::mono_webhook))
        .route("/send-free-order", post(handlers::send_free_order))
        .route("/log-bot-order", post(handlers::log_bot_order))
        .route("/check-certificate", post(handlers::check_certificate))
        .route("/admin/active-orders", get(handlers::active_orders))
        .route("/admin/completed-orders", get(handlers::completed_orders))
        .route("/admin/mark-done", post(handlers::mark_done))
        .with_state(state)
}

/// CORS restricted to the one allowed browser origin.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .map_err(|_| RelayError::Validation(format!("invalid origin: {allowed_origin}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

pub async fn serve(state: AppState, addr: &str, allowed_origin: &str) -> Result<()> {
    let app = router(state).layer(cors_layer(allowed_origin)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
