//! Aggregate figures for the dashboard and analytics pages.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use hrom_core::{DriverId, OrderStatus, ShippingType};

/// All-time counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct DashboardSummary {
    pub total_orders: i64,
    pub new_orders: i64,
    pub in_progress_orders: i64,
    pub delivered_orders: i64,
    /// Sum over priced orders; zero when none are priced.
    pub total_revenue: Decimal,
    /// Mean over priced orders.
    pub average_price: Option<Decimal>,
}

/// Order count for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Count and revenue for one shipping type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ShippingStat {
    pub shipping_type: ShippingType,
    pub count: i64,
    pub revenue: Decimal,
}

/// Count and revenue for one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyStat {
    pub day: NaiveDate,
    pub orders: i64,
    pub revenue: Decimal,
}

/// Orders handled by one driver.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DriverStat {
    pub driver_id: DriverId,
    pub name: String,
    pub orders: i64,
    pub revenue: Decimal,
}

/// Window-wide totals. Unpriced orders count towards `total_orders` only.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct RevenueSummary {
    pub total_orders: i64,
    pub priced_orders: i64,
    pub total_revenue: Decimal,
    pub average_price: Option<Decimal>,
}

/// Everything on the analytics page for one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub statuses: Vec<StatusCount>,
    pub shipping: Vec<ShippingStat>,
    pub daily: Vec<DailyStat>,
    pub drivers: Vec<DriverStat>,
    pub revenue: RevenueSummary,
}

/// Body of `GET /admin/analytics/data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsData {
    pub daily_orders: Vec<DailyPoint>,
    pub status_distribution: Vec<StatusSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub orders: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: OrderStatus,
    pub count: i64,
    pub label: &'static str,
}

impl AnalyticsData {
    /// Shape daily and status aggregates into the chart payload.
    #[must_use]
    pub fn from_stats(daily: &[DailyStat], statuses: &[StatusCount]) -> Self {
        Self {
            daily_orders: daily
                .iter()
                .map(|d| DailyPoint {
                    date: d.day.format("%Y-%m-%d").to_string(),
                    orders: d.orders,
                    revenue: d.revenue.to_f64().unwrap_or(0.0),
                })
                .collect(),
            status_distribution: statuses
                .iter()
                .map(|s| StatusSlice {
                    status: s.status,
                    count: s.count,
                    label: s.status.label(),
                })
                .collect(),
        }
    }
}
