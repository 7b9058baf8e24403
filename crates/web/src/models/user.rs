//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use hrom_core::{Email, UserId, UserRole};

/// A staff account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique.
    pub username: String,
    /// Email address, unique.
    pub email: Email,
    pub full_name: String,
    pub phone: String,
    /// Fixed at creation.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a user.
///
/// The password is already hashed; hashing happens in the auth service.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub full_name: String,
    pub phone: String,
    pub password_hash: String,
    pub role: UserRole,
}
