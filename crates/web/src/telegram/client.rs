//! Telegram Bot API client.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::error::TelegramError;
use crate::config::TelegramConfig;

/// Telegram Bot API base URL.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Upper bound for a single `sendMessage` call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client bound to a single chat.
#[derive(Clone)]
pub struct TelegramClient {
    /// HTTP client.
    client: Client,
    /// Bot token, part of the request path.
    bot_token: SecretString,
    /// Destination chat or channel id.
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new Telegram client.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError::Config` if the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::Config(e.to_string()))?;

        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    /// Get the destination chat ID.
    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Send an HTML-formatted message to the configured chat.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Telegram rejects the message.
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id))]
    pub async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(format!(
                "{TELEGRAM_API_BASE}/bot{}/sendMessage",
                self.bot_token.expose_secret()
            ))
            .json(&body)
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let result: ApiResponse = response
            .json()
            .await
            .map_err(|e| TelegramError::Response(e.without_url().to_string()))?;

        if !status.is_success() || !result.ok {
            error!(
                status = %status,
                description = ?result.description,
                "Telegram API error sending message"
            );
            return Err(TelegramError::Api(
                result
                    .description
                    .unwrap_or_else(|| format!("HTTP {status}")),
            ));
        }

        debug!("Message sent to Telegram");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let client = TelegramClient::new(&TelegramConfig {
            bot_token: SecretString::from("123456:bot-token-value"),
            chat_id: "-100987".to_string(),
        })
        .unwrap();

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("-100987"));
        assert!(!debug_output.contains("bot-token-value"));
    }

    #[test]
    fn test_send_message_body_shape() {
        let body = SendMessage {
            chat_id: "-100987",
            text: "<b>hi</b>",
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["chat_id"], "-100987");
        assert_eq!(json["parse_mode"], "HTML");
        assert_eq!(json["text"], "<b>hi</b>");
    }

    #[test]
    fn test_api_response_without_description() {
        let parsed: ApiResponse = serde_json::from_str(r#"{"ok":true,"result":{}}"#).unwrap();
        assert!(parsed.ok);
        assert!(parsed.description.is_none());
    }
}
