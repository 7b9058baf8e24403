//! Integration tests for Hrom.
//!
//! # Running Tests
//!
//! ```bash
//! # Pure tests (no database or server needed)
//! cargo test -p hrom-integration-tests
//!
//! # Repository and HTTP flow tests against PostgreSQL and a running server
//! DATABASE_URL=postgres://localhost/hrom_test \
//! HROM_BASE_URL=http://localhost:5000 cargo test -p hrom-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `order_rules` - Form validation and edit permissions
//! - `notifications` - Telegram message content
//! - `tracking` - Tracking number format and collision retry
//! - `analytics` - Chart payload shaping
//! - `repositories` - Queries and services against `DATABASE_URL` (ignored by default)
//! - `http_flows` - End-to-end requests against a live server (ignored by default)

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use hrom_core::{
    Email, OrderId, OrderStatus, ShippingType, TrackingNumber, UserId, UserRole,
};
use hrom_web::models::{CurrentUser, NewOrder, Order, User};
use hrom_web::services::auth::{AuthService, Registration};

/// Base URL of a running server for the ignored HTTP tests.
#[must_use]
pub fn base_url() -> String {
    std::env::var("HROM_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A fixed timestamp, 14 March 2025 09:30 UTC.
#[must_use]
pub fn created_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_741_944_600, 0).unwrap_or_default()
}

/// A new, unpriced order placed by `customer`.
#[must_use]
pub fn sample_order(customer: Option<UserId>) -> Order {
    Order {
        id: OrderId::new(42),
        tracking_number: TrackingNumber::parse("HK250314A1B2C3")
            .unwrap_or_else(|_| TrackingNumber::generate_now()),
        customer_name: "ТОО «Степной ветер»".to_string(),
        customer_phone: "+77017654321".to_string(),
        customer_email: None,
        customer_id: customer,
        shipping_type: ShippingType::Kazakhstan,
        pickup_address: "Астана, ул. Сыганак, 18".to_string(),
        pickup_contact: Some("Бауыржан, склад №2".to_string()),
        delivery_address: "Караганда, пр. Бухар-Жырау, 66".to_string(),
        delivery_contact: None,
        cargo_description: "Стройматериалы <паллеты>".to_string(),
        cargo_weight: Some(850.5),
        cargo_dimensions: Some("120×80×150".to_string()),
        status: OrderStatus::New,
        price: None,
        driver_id: None,
        customer_notes: None,
        internal_comments: None,
        created_at: created_at(),
        updated_at: created_at(),
    }
}

#[must_use]
pub fn employee(id: i32) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        username: format!("employee{id}"),
        full_name: "Данияр Нурланов".to_string(),
        role: UserRole::Employee,
    }
}

#[must_use]
pub fn logist() -> CurrentUser {
    CurrentUser {
        id: UserId::new(1),
        username: "logist".to_string(),
        full_name: "Айгерим Садыкова".to_string(),
        role: UserRole::Logist,
    }
}

// =============================================================================
// Database fixtures
// =============================================================================

/// Connect to `DATABASE_URL` and apply pending migrations.
///
/// # Panics
///
/// Panics if the variable is unset or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("../web/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A random suffix so repeated runs against one database don't collide.
#[must_use]
pub fn unique_suffix() -> String {
    format!("{:08x}", rand::random::<u32>())
}

/// Registration data with a unique username and email.
///
/// # Panics
///
/// Panics if the generated email is invalid.
#[must_use]
pub fn registration(prefix: &str) -> Registration {
    let suffix = unique_suffix();
    Registration {
        username: format!("{prefix}_{suffix}"),
        email: Email::parse(&format!("{prefix}_{suffix}@hrom-test.kz")).expect("valid email"),
        full_name: "Тестовый Пользователь".to_string(),
        phone: "+77010000000".to_string(),
        password: "gruzovik-2025".to_string(),
    }
}

/// Create a user with `role` in the test database.
///
/// # Panics
///
/// Panics if the user cannot be created.
pub async fn create_user(pool: &PgPool, prefix: &str, role: UserRole) -> User {
    AuthService::new(pool)
        .create_user(registration(prefix), role)
        .await
        .expect("Failed to create user")
}

/// A valid new order for `customer`.
#[must_use]
pub fn new_order(customer: Option<UserId>) -> NewOrder {
    NewOrder {
        shipping_type: ShippingType::Astana,
        customer_name: "Тестовый Заказчик".to_string(),
        customer_phone: "+77010000000".to_string(),
        customer_email: None,
        customer_id: customer,
        pickup_address: "Астана, ул. Тестовая, 1".to_string(),
        pickup_contact: None,
        delivery_address: "Астана, ул. Тестовая, 2".to_string(),
        delivery_contact: None,
        cargo_description: "Коробки с документами".to_string(),
        cargo_weight: Some(12.5),
        cargo_dimensions: None,
        customer_notes: None,
    }
}
