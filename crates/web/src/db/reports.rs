//! Read-only aggregate queries for the dashboard and analytics pages.
//!
//! Unpriced orders are counted everywhere but contribute nothing to revenue
//! sums or price averages (`SUM`/`AVG` skip NULLs).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use hrom_core::UserId;

use super::RepositoryError;
use crate::models::report::{
    AnalyticsReport, DailyStat, DashboardSummary, DriverStat, RevenueSummary, ShippingStat,
    StatusCount,
};

/// Repository for reporting queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All-time dashboard counters, optionally restricted to one customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard_summary(
        &self,
        customer: Option<UserId>,
    ) -> Result<DashboardSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, DashboardSummary>(
            r"
            SELECT
                COUNT(*) AS total_orders,
                COUNT(*) FILTER (WHERE status = 'new') AS new_orders,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress_orders,
                COUNT(*) FILTER (WHERE status = 'delivered') AS delivered_orders,
                COALESCE(SUM(price), 0) AS total_revenue,
                AVG(price) AS average_price
            FROM orders
            WHERE ($1::INTEGER IS NULL OR customer_id = $1)
            ",
        )
        .bind(customer)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Order counts per status created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<StatusCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r"
            SELECT status, COUNT(*) AS count
            FROM orders
            WHERE created_at >= $1
            GROUP BY status
            ORDER BY status
            ",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts and revenue per shipping type created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn shipping_stats(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<ShippingStat>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShippingStat>(
            r"
            SELECT shipping_type, COUNT(*) AS count, COALESCE(SUM(price), 0) AS revenue
            FROM orders
            WHERE created_at >= $1
            GROUP BY shipping_type
            ORDER BY shipping_type
            ",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts and revenue per UTC day created at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_stats(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyStat>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyStat>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::DATE AS day,
                   COUNT(*) AS orders,
                   COALESCE(SUM(price), 0) AS revenue
            FROM orders
            WHERE created_at >= $1
            GROUP BY day
            ORDER BY day ASC
            ",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-driver counts and revenue for drivers with at least one order
    /// created at or after `since`, busiest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn driver_stats(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DriverStat>, RepositoryError> {
        let rows = sqlx::query_as::<_, DriverStat>(
            r"
            SELECT d.id AS driver_id,
                   d.name,
                   COUNT(o.id) AS orders,
                   COALESCE(SUM(o.price), 0) AS revenue
            FROM drivers d
            JOIN orders o ON o.driver_id = d.id
            WHERE o.created_at >= $1
            GROUP BY d.id, d.name
            ORDER BY orders DESC, d.name ASC
            ",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Window-wide revenue totals for orders created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_summary(
        &self,
        since: DateTime<Utc>,
    ) -> Result<RevenueSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, RevenueSummary>(
            r"
            SELECT COUNT(*) AS total_orders,
                   COUNT(price) AS priced_orders,
                   COALESCE(SUM(price), 0) AS total_revenue,
                   AVG(price) AS average_price
            FROM orders
            WHERE created_at >= $1
            ",
        )
        .bind(since)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Run every analytics query for the window starting at `since`.
    ///
    /// # Errors
    ///
    /// Returns the first `RepositoryError` encountered.
    #[instrument(skip(self))]
    pub async fn analytics(&self, since: DateTime<Utc>) -> Result<AnalyticsReport, RepositoryError> {
        let (statuses, shipping, daily, drivers, revenue) = tokio::try_join!(
            self.status_counts(since),
            self.shipping_stats(since),
            self.daily_stats(since),
            self.driver_stats(since),
            self.revenue_summary(since),
        )?;

        Ok(AnalyticsReport {
            statuses,
            shipping,
            daily,
            drivers,
            revenue,
        })
    }
}
