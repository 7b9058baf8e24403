//! Driver repository for database operations.

use sqlx::PgPool;

use hrom_core::DriverId;

use super::RepositoryError;
use crate::models::driver::{Driver, NewDriver};

/// Repository for driver database operations.
pub struct DriverRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DriverRepository<'a> {
    /// Create a new driver repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all drivers, active first, then by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Driver>, RepositoryError> {
        let drivers = sqlx::query_as::<_, Driver>(
            r"
            SELECT id, name, phone, vehicle_info, is_active, created_at
            FROM drivers
            ORDER BY is_active DESC, name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(drivers)
    }

    /// Get a driver by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: DriverId) -> Result<Option<Driver>, RepositoryError> {
        let driver = sqlx::query_as::<_, Driver>(
            r"
            SELECT id, name, phone, vehicle_info, is_active, created_at
            FROM drivers
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(driver)
    }

    /// Create a new driver. New drivers are active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_driver: &NewDriver) -> Result<Driver, RepositoryError> {
        let driver = sqlx::query_as::<_, Driver>(
            r"
            INSERT INTO drivers (name, phone, vehicle_info)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, vehicle_info, is_active, created_at
            ",
        )
        .bind(&new_driver.name)
        .bind(&new_driver.phone)
        .bind(&new_driver.vehicle_info)
        .fetch_one(self.pool)
        .await?;

        Ok(driver)
    }
}
