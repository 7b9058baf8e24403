//! Driver domain types.

use chrono::{DateTime, Utc};

use hrom_core::DriverId;

/// A driver that orders can be assigned to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub phone: String,
    /// Free-form vehicle description (model, plate, capacity).
    pub vehicle_info: Option<String>,
    /// Inactive drivers stay on old orders but cannot be newly assigned.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a driver.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub name: String,
    pub phone: String,
    pub vehicle_info: Option<String>,
}
