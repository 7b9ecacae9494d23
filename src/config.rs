use crate::error::{RelayError, Result};
use std::env;

/// Environment-provided configuration gating the external collaborators.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Monobank merchant API token.
    pub mono_token: String,
    /// Public URL the provider delivers settlement callbacks to.
    pub mono_webhook_url: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub spreadsheet_id: String,
    /// OAuth bearer token for the Sheets values API.
    pub sheets_token: String,
    /// The one browser origin allowed by CORS.
    pub allowed_origin: String,
    pub host: String,
    pub port: u16,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            mono_token: required("MONO_TOKEN")?,
            mono_webhook_url: required("MONO_WEBHOOK_URL")?,
            telegram_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            spreadsheet_id: required("SPREADSHEET_ID")?,
            sheets_token: required("SHEETS_TOKEN")?,
            allowed_origin: required("ALLOWED_ORIGIN")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .map(|v| {
                    v.parse()
                        .map_err(|_| RelayError::Validation(format!("PORT is not a number: {v}")))
                })
                .transpose()?
                .unwrap_or(3000),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RelayError::Validation(format!(
            "missing environment variable: {name}"
        ))),
    }
}
