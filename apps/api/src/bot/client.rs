//! Telegram Bot API client.
//!
//! The voice pipeline and webhook depend only on the `BotApi` trait, held
//! in `AppState` as `Arc<dyn BotApi>`; `TelegramBot` is the production
//! implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Awaitable messaging operations the rest of the system is allowed to use.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Sends a text message, returning the new message id.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64>;

    /// Edits a previously sent message in place.
    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;

    /// Resolves a downloadable URL for a file attachment. The returned
    /// handle expires on Telegram's side, so it must be fetched promptly.
    async fn get_file_url(&self, file_id: &str) -> Result<String>;
}

/// Response envelope of the Telegram Bot API.
#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResult {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct FileResult {
    file_path: Option<String>,
}

pub struct TelegramBot {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramBot {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_base(bot_token, TELEGRAM_API_BASE.to_string())
    }

    /// Points the client at an alternate API base. Used by tests to target
    /// a mock server.
    pub fn with_api_base(bot_token: String, api_base: String) -> Self {
        Self {
            bot_token,
            api_base,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.bot_token, file_path)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to call Telegram {method}"))?;

        let result: TelegramResponse<T> = response
            .json()
            .await
            .context("Failed to parse Telegram response")?;

        if !result.ok {
            anyhow::bail!(
                "Telegram API error: {}",
                result.description.unwrap_or_default()
            );
        }

        result
            .result
            .context("Telegram response missing result field")
    }

    /// Registers the webhook URL with Telegram. Called once at startup
    /// when WEBHOOK_URL is configured.
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        let _: serde_json::Value = self.call("setWebhook", json!({ "url": url })).await?;
        Ok(())
    }
}

#[async_trait]
impl BotApi for TelegramBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64> {
        let result: MessageResult = self
            .call(
                "sendMessage",
                json!({ "chat_id": chat_id, "text": text }),
            )
            .await?;
        Ok(result.message_id)
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        // Telegram returns the edited Message object (or `true` for inline
        // messages); neither is needed here.
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    async fn get_file_url(&self, file_id: &str) -> Result<String> {
        let result: FileResult = self
            .call("getFile", json!({ "file_id": file_id }))
            .await?;

        let file_path = result
            .file_path
            .context("Telegram getFile returned no file_path")?;

        Ok(self.file_url(&file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let bot = TelegramBot::new("TOKEN".to_string());
        assert_eq!(
            bot.api_url("sendMessage"),
            "https://api.telegram.org/botTOKEN/sendMessage"
        );
    }

    #[test]
    fn test_file_url() {
        let bot = TelegramBot::new("TOKEN".to_string());
        assert_eq!(
            bot.file_url("voice/file_7.oga"),
            "https://api.telegram.org/file/botTOKEN/voice/file_7.oga"
        );
    }
}
