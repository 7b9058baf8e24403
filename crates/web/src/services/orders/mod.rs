//! Order lifecycle: intake, lookup, staff edits, and reporting.
//!
//! Every operation that acts on behalf of a logged-in user takes the actor
//! explicitly. Role checks live in [`policy`] and are applied before any
//! write.

mod error;
pub mod policy;
mod retry;

pub use error::{Denial, OrderError};
pub use retry::{MAX_TRACKING_ATTEMPTS, retry_on_conflict};

use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;
use tracing::instrument;

use hrom_core::{OrderId, ShippingType, TrackingNumber, UserId};

use crate::db::{DriverRepository, OrderRepository, ReportRepository};
use crate::forms::OrderForm;
use crate::models::{
    AnalyticsData, AnalyticsReport, CurrentUser, DashboardSummary, Order, OrderChanges,
    OrderFilter,
};
use crate::services::notifications::{Notifier, OrderEvent};

/// Length of the trailing analytics window.
pub const ANALYTICS_WINDOW_DAYS: i64 = 30;

/// Orders listed on the dashboard.
pub const RECENT_ORDERS_LIMIT: i64 = 10;

/// Dashboard counters plus the latest orders.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub recent: Vec<Order>,
}

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    notifier: &'a Notifier,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, notifier: &'a Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Accept a new order from the public form.
    ///
    /// The order is linked to `actor` when one is logged in. A creation
    /// notification is sent in the background.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidShippingType` for an unknown shipping type.
    /// Returns `OrderError::Validation` if the form is invalid.
    /// Returns `OrderError::TrackingNumberExhausted` if no unique tracking
    /// number could be allocated.
    #[instrument(skip(self, form, actor), fields(user_id = actor.map(|a| a.id.as_i32())))]
    pub async fn create_order(
        &self,
        shipping_type: &str,
        form: &OrderForm,
        actor: Option<&CurrentUser>,
    ) -> Result<Order, OrderError> {
        let shipping_type = parse_shipping_type(shipping_type)?;
        let new_order = form.validate(shipping_type, actor.map(|a| a.id))?;

        let repo = OrderRepository::new(self.pool);
        let orders = &repo;
        let new_order = &new_order;
        let order = retry_on_conflict(MAX_TRACKING_ATTEMPTS, |_| {
            let tracking_number = TrackingNumber::generate_now();
            async move { orders.insert(new_order, &tracking_number).await }
        })
        .await?;

        tracing::info!(
            order_id = %order.id,
            tracking_number = %order.tracking_number,
            shipping_type = %order.shipping_type,
            "Order created"
        );

        self.notifier.spawn(OrderEvent::Created(order.clone()));
        Ok(order)
    }

    /// Apply staff edits to an order.
    ///
    /// The row is locked for the duration of the transaction. A status-change
    /// notification is sent when the status moved.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    /// Returns `OrderError::Forbidden` if `actor` may not make these changes.
    /// Returns `OrderError::InvalidDriver` when assigning a missing or
    /// inactive driver.
    #[instrument(skip(self, actor, changes), fields(user_id = %actor.id, role = %actor.role))]
    pub async fn edit_order(
        &self,
        id: OrderId,
        actor: &CurrentUser,
        changes: OrderChanges,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let current = OrderRepository::lock_for_update(&mut *tx, id)
            .await?
            .ok_or(OrderError::NotFound)?;

        policy::authorize_edit(actor, &current, &changes)?;

        let drivers = DriverRepository::new(self.pool);
        if let Some(Some(driver_id)) = changes.driver_id
            && Some(driver_id) != current.driver_id
        {
            let available = drivers
                .get_by_id(driver_id)
                .await?
                .is_some_and(|d| d.is_active);
            if !available {
                return Err(OrderError::InvalidDriver);
            }
        }

        let update = changes.apply_to(&current);
        let updated = OrderRepository::update(&mut *tx, id, &update).await?;
        tx.commit().await?;

        tracing::info!(order_id = %id, status = %updated.status, "Order updated");

        if updated.status != current.status {
            let driver_name = match updated.driver_id {
                Some(driver_id) => drivers.get_by_id(driver_id).await?.map(|d| d.name),
                None => None,
            };
            self.notifier.spawn(OrderEvent::StatusChanged {
                order: updated.clone(),
                previous: current.status,
                driver_name,
            });
        }

        Ok(updated)
    }

    /// Orders visible to `actor`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn list_orders(
        &self,
        actor: &CurrentUser,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>, OrderError> {
        let orders = OrderRepository::new(self.pool)
            .list(scope(actor), filter)
            .await?;
        Ok(orders)
    }

    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        OrderRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)
    }

    /// Load an order for the edit page.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` or `OrderError::Forbidden`.
    pub async fn get_order_for(
        &self,
        actor: &CurrentUser,
        id: OrderId,
    ) -> Result<Order, OrderError> {
        let order = self.get_order(id).await?;
        policy::authorize_access(actor, &order)?;
        Ok(order)
    }

    /// Public lookup by tracking number, case-insensitive and trimmed.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for unknown numbers.
    #[instrument(skip(self))]
    pub async fn track_order(&self, tracking_number: &str) -> Result<Order, OrderError> {
        let normalized = TrackingNumber::normalize(tracking_number);
        if normalized.is_empty() {
            return Err(OrderError::NotFound);
        }
        OrderRepository::new(self.pool)
            .get_by_tracking_number(&normalized)
            .await?
            .ok_or(OrderError::NotFound)
    }

    /// Dashboard counters and recent orders, scoped like [`Self::list_orders`].
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn dashboard(&self, actor: &CurrentUser) -> Result<Dashboard, OrderError> {
        let customer = scope(actor);
        let orders = OrderRepository::new(self.pool);
        let reports = ReportRepository::new(self.pool);
        let (summary, recent) = tokio::try_join!(
            reports.dashboard_summary(customer),
            orders.recent(customer, RECENT_ORDERS_LIMIT),
        )?;
        Ok(Dashboard { summary, recent })
    }

    /// Aggregates over the trailing analytics window. Logists only.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` for employees.
    pub async fn analytics(&self, actor: &CurrentUser) -> Result<AnalyticsReport, OrderError> {
        policy::require_logist(actor)?;
        let report = ReportRepository::new(self.pool)
            .analytics(analytics_window_start(Utc::now()))
            .await?;
        Ok(report)
    }

    /// Chart payload for the analytics page. Logists only.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` for employees.
    pub async fn analytics_data(&self, actor: &CurrentUser) -> Result<AnalyticsData, OrderError> {
        policy::require_logist(actor)?;
        let since = analytics_window_start(Utc::now());
        let reports = ReportRepository::new(self.pool);
        let (daily, statuses) =
            tokio::try_join!(reports.daily_stats(since), reports.status_counts(since))?;
        Ok(AnalyticsData::from_stats(&daily, &statuses))
    }
}

/// Customer restriction applied to list queries for `actor`.
#[must_use]
pub const fn scope(actor: &CurrentUser) -> Option<UserId> {
    if actor.is_logist() {
        None
    } else {
        Some(actor.id)
    }
}

/// # Errors
///
/// Returns `OrderError::InvalidShippingType` unless `raw` is `astana` or
/// `kazakhstan`.
pub fn parse_shipping_type(raw: &str) -> Result<ShippingType, OrderError> {
    ShippingType::from_str(raw).map_err(|_| OrderError::InvalidShippingType(raw.to_owned()))
}

/// Start of the analytics window ending at `now`.
#[must_use]
pub fn analytics_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_signed(TimeDelta::days(ANALYTICS_WINDOW_DAYS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
