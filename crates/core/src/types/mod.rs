//! Core types for Hrom logistics.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod phone;
pub mod status;
pub mod tracking;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{format_tenge, format_tenge_plain};
pub use phone::format_phone;
pub use status::*;
pub use tracking::{TrackingNumber, TrackingNumberError};
