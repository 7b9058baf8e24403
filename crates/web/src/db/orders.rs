//! Order repository for database operations.
//!
//! Reads go through the pool. The edit path locks a row and writes it back
//! inside a caller-owned transaction, so those two operations take a
//! connection instead.

use sqlx::{PgConnection, PgPool};

use hrom_core::{OrderId, TrackingNumber, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderFilter, OrderUpdate};

/// Column list matching the fields of [`Order`].
const ORDER_COLUMNS: &str = "id, tracking_number, customer_name, customer_phone, customer_email, \
     customer_id, shipping_type, pickup_address, pickup_contact, delivery_address, \
     delivery_contact, cargo_description, cargo_weight, cargo_dimensions, status, price, \
     driver_id, customer_notes, internal_comments, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order in status `new` under the given tracking number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the tracking number is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        new_order: &NewOrder,
        tracking_number: &TrackingNumber,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO orders (
                tracking_number, customer_name, customer_phone, customer_email, customer_id,
                shipping_type, pickup_address, pickup_contact, delivery_address,
                delivery_contact, cargo_description, cargo_weight, cargo_dimensions,
                customer_notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {ORDER_COLUMNS}
            "
        );

        sqlx::query_as::<_, Order>(&sql)
            .bind(tracking_number)
            .bind(&new_order.customer_name)
            .bind(&new_order.customer_phone)
            .bind(&new_order.customer_email)
            .bind(new_order.customer_id)
            .bind(new_order.shipping_type)
            .bind(&new_order.pickup_address)
            .bind(&new_order.pickup_contact)
            .bind(&new_order.delivery_address)
            .bind(&new_order.delivery_contact)
            .bind(&new_order.cargo_description)
            .bind(new_order.cargo_weight)
            .bind(&new_order.cargo_dimensions)
            .bind(&new_order.customer_notes)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique_violation(e, "tracking number"))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(order)
    }

    /// Get an order by its (already normalized) tracking number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE tracking_number = $1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(tracking_number)
            .fetch_optional(self.pool)
            .await?;

        Ok(order)
    }

    /// List orders matching `filter`, newest first.
    ///
    /// When `customer` is set only that user's orders are returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        customer: Option<UserId>,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::INTEGER IS NULL OR customer_id = $1)
              AND ($2::order_status IS NULL OR status = $2)
              AND ($3::shipping_type IS NULL OR shipping_type = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR created_at < $5)
            ORDER BY created_at DESC, id DESC
            "
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer)
            .bind(filter.status)
            .bind(filter.shipping_type)
            .bind(filter.created_from())
            .bind(filter.created_before())
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// Most recent orders, optionally restricted to one customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(
        &self,
        customer: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::INTEGER IS NULL OR customer_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// Fetch an order and lock its row until the surrounding transaction ends.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(order)
    }

    /// Write all mutable columns and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        conn: &mut PgConnection,
        id: OrderId,
        update: &OrderUpdate,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            r"
            UPDATE orders
            SET customer_phone = $2,
                customer_email = $3,
                pickup_address = $4,
                pickup_contact = $5,
                delivery_address = $6,
                delivery_contact = $7,
                status = $8,
                price = $9,
                driver_id = $10,
                internal_comments = $11,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        );

        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(&update.customer_phone)
            .bind(&update.customer_email)
            .bind(&update.pickup_address)
            .bind(&update.pickup_contact)
            .bind(&update.delivery_address)
            .bind(&update.delivery_contact)
            .bind(update.status)
            .bind(update.price)
            .bind(update.driver_id)
            .bind(&update.internal_comments)
            .fetch_optional(conn)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
