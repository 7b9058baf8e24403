//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration and password login for staff accounts
//! - `orders` - Order intake, staff edits, lookups, and reporting
//! - `notifications` - Best-effort Telegram notifications for order events

pub mod auth;
pub mod notifications;
pub mod orders;

pub use notifications::{Notifier, OrderEvent};
pub use orders::{OrderError, OrderService};
