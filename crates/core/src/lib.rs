//! Hrom Core - Shared domain types for the logistics order desk.
//!
//! This crate provides the types used by every Hrom component:
//! - `web` - Order intake, public tracking, and the staff dashboard
//! - `cli` - Migrations and out-of-band staff provisioning
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no database access,
//! no HTTP clients. Randomness is injected by the caller so tracking numbers
//! can be generated deterministically in tests.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, statuses, tracking numbers, and
//!   display helpers for money and phone numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
