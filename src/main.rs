use clap::Parser;
use miette::{IntoDiagnostic, Result};
use monal_relay::application::certificates::CertificateService;
use monal_relay::application::invoice::InvoiceService;
use monal_relay::application::settlement::SettlementOrchestrator;
use monal_relay::application::views::OrderBoard;
use monal_relay::config::RelayConfig;
use monal_relay::domain::ports::{
    CertificateLogRef, ChatNotifierRef, InvoiceProviderRef, OrderLogRef,
};
use monal_relay::domain::registry::PendingOrderRegistry;
use monal_relay::infrastructure::google_sheets::GoogleSheetsLog;
use monal_relay::infrastructure::monobank::MonobankClient;
use monal_relay::infrastructure::telegram::TelegramNotifier;
use monal_relay::interfaces::http::AppState;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let mut config = RelayConfig::from_env().into_diagnostic()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let http = reqwest::Client::new();
    let sheets = GoogleSheetsLog::new(
        http.clone(),
        config.spreadsheet_id.clone(),
        config.sheets_token.clone(),
    );
    let certificates: CertificateLogRef = Arc::new(sheets.clone());
    let orders: OrderLogRef = Arc::new(sheets);
    let notifier: ChatNotifierRef = Arc::new(TelegramNotifier::new(
        http.clone(),
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
    ));
    let provider: InvoiceProviderRef = Arc::new(MonobankClient::new(
        http,
        config.mono_token.clone(),
        config.mono_webhook_url.clone(),
    ));

    let registry = PendingOrderRegistry::new();
    let state = AppState {
        registry: registry.clone(),
        settlement: Arc::new(SettlementOrchestrator::new(
            registry,
            certificates.clone(),
            orders.clone(),
            notifier,
        )),
        invoices: Arc::new(InvoiceService::new(provider)),
        certificates: Arc::new(CertificateService::new(certificates)),
        board: Arc::new(OrderBoard::new(orders)),
    };

    monal_relay::interfaces::http::serve(state, &config.bind_addr(), &config.allowed_origin)
        .await
        .into_diagnostic()?;

    Ok(())
}

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();
}
