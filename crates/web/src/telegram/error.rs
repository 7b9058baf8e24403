//! Telegram-related errors.

use thiserror::Error;

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed (connection, timeout).
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Telegram response error: {0}")]
    Response(String),

    /// Telegram API returned `ok: false` or a non-success status.
    #[error("Telegram API error: {0}")]
    Api(String),

    /// Configuration error.
    #[error("Telegram configuration error: {0}")]
    Config(String),
}
