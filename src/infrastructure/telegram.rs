use crate::domain::ports::ChatNotifier;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Sends operator notifications through the Telegram Bot API, always to the
/// one configured chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(http: reqwest::Client, token: String, chat_id: String) -> Self {
        Self {
            http,
            token,
            chat_id,
        }
    }
}

#[async_trait]
impl ChatNotifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await?;

        let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(false);
        if !status.is_success() || !ok {
            return Err(RelayError::Upstream(body.to_string()));
        }
        Ok(())
    }
}
