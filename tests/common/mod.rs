use monal_relay::application::certificates::CertificateService;
use monal_relay::application::invoice::InvoiceService;
use monal_relay::application::settlement::SettlementOrchestrator;
use monal_relay::application::views::OrderBoard;
use monal_relay::domain::registry::PendingOrderRegistry;
use monal_relay::infrastructure::in_memory::{
    InMemoryCertificateLog, InMemoryChatNotifier, InMemoryInvoiceProvider, InMemoryOrderLog,
};
use monal_relay::interfaces::http::AppState;
use std::sync::Arc;

/// A fully wired relay over in-memory collaborators, with handles kept for
/// inspecting what reached each of them.
pub struct TestApp {
    pub state: AppState,
    pub certificates: InMemoryCertificateLog,
    pub orders: InMemoryOrderLog,
    pub notifier: InMemoryChatNotifier,
    pub provider: InMemoryInvoiceProvider,
}

pub fn test_app() -> TestApp {
    let registry = PendingOrderRegistry::new();
    let certificates = InMemoryCertificateLog::new();
    let orders = InMemoryOrderLog::new();
    let notifier = InMemoryChatNotifier::new();
    let provider = InMemoryInvoiceProvider::new();

    let state = AppState {
        registry: registry.clone(),
        settlement: Arc::new(SettlementOrchestrator::new(
            registry,
            Arc::new(certificates.clone()),
            Arc::new(orders.clone()),
            Arc::new(notifier.clone()),
        )),
        invoices: Arc::new(InvoiceService::new(Arc::new(provider.clone()))),
        certificates: Arc::new(CertificateService::new(Arc::new(certificates.clone()))),
        board: Arc::new(OrderBoard::new(Arc::new(orders.clone()))),
    };

    TestApp {
        state,
        certificates,
        orders,
        notifier,
        provider,
    }
}
