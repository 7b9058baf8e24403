//! Telegram integration for order notifications.
//!
//! This module provides:
//! - [`TelegramClient`] for posting messages through the Bot API
//! - Message builders for new orders and status changes
//!
//! Messages use Telegram's HTML parse mode, so every user-supplied value is
//! escaped before it is interpolated.

mod client;
mod error;
mod messages;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use messages::{build_order_created_message, build_status_changed_message, escape_html};
