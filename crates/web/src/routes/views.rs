//! Display-ready projections of domain models for templates.
//!
//! Templates only print strings; formatting of money, labels, dates and
//! blanks happens here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use hrom_core::{DriverId, OrderStatus, format_tenge};

use crate::forms::EditOrderForm;
use crate::models::{
    AnalyticsReport, DailyStat, DashboardSummary, Driver, DriverStat, Order, ShippingStat,
    StatusCount,
};

/// Date and time as shown to users (UTC).
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

fn text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_owned()
}

/// Order as rendered in tables and detail pages.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub tracking_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub shipping_type: &'static str,
    pub shipping_type_label: &'static str,
    pub pickup_address: String,
    pub pickup_contact: String,
    pub delivery_address: String,
    pub delivery_contact: String,
    pub cargo_description: String,
    /// Empty when unknown.
    pub cargo_weight: String,
    pub cargo_dimensions: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub price: String,
    pub driver_name: String,
    pub customer_notes: String,
    pub internal_comments: String,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderView {
    /// Attach the assigned driver's name.
    #[must_use]
    pub fn with_driver(mut self, name: Option<&str>) -> Self {
        self.driver_name = text(name);
        self
    }

    /// Build views for `orders`, resolving driver names from `drivers`.
    #[must_use]
    pub fn list(orders: &[Order], drivers: &[Driver]) -> Vec<Self> {
        let names: HashMap<DriverId, &str> =
            drivers.iter().map(|d| (d.id, d.name.as_str())).collect();
        orders
            .iter()
            .map(|o| {
                let name = o.driver_id.and_then(|id| names.get(&id).copied());
                Self::from(o).with_driver(name)
            })
            .collect()
    }
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            tracking_number: order.tracking_number.to_string(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_email: order
                .customer_email
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            shipping_type: order.shipping_type.as_str(),
            shipping_type_label: order.shipping_type.label(),
            pickup_address: order.pickup_address.clone(),
            pickup_contact: text(order.pickup_contact.as_deref()),
            delivery_address: order.delivery_address.clone(),
            delivery_contact: text(order.delivery_contact.as_deref()),
            cargo_description: order.cargo_description.clone(),
            cargo_weight: order
                .cargo_weight
                .map(|w| format!("{w} кг"))
                .unwrap_or_default(),
            cargo_dimensions: text(order.cargo_dimensions.as_deref()),
            status: order.status.as_str(),
            status_label: order.status.label(),
            price: format_tenge(order.price),
            driver_name: String::new(),
            customer_notes: text(order.customer_notes.as_deref()),
            internal_comments: text(order.internal_comments.as_deref()),
            created_at: format_datetime(&order.created_at),
            updated_at: format_datetime(&order.updated_at),
        }
    }
}

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Status choices for the edit form and list filter.
#[must_use]
pub fn status_options() -> Vec<SelectOption> {
    OrderStatus::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect()
}

/// Shipping type choices for the list filter.
#[must_use]
pub fn shipping_type_options() -> Vec<SelectOption> {
    hrom_core::ShippingType::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect()
}

/// Driver choices: "unassigned", then active drivers as `Name (phone)`.
///
/// The currently assigned driver stays selectable even when inactive.
#[must_use]
pub fn driver_options(drivers: &[Driver], current: Option<DriverId>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption::new("0", "Не назначен")];
    options.extend(
        drivers
            .iter()
            .filter(|d| d.is_active || Some(d.id) == current)
            .map(|d| SelectOption::new(d.id.to_string(), format!("{} ({})", d.name, d.phone))),
    );
    options
}

/// Edit form input values, from the stored order or a rejected submission.
#[derive(Debug, Clone, Default)]
pub struct EditOrderValues {
    pub customer_phone: String,
    pub customer_email: String,
    pub pickup_address: String,
    pub pickup_contact: String,
    pub delivery_address: String,
    pub delivery_contact: String,
    pub status: String,
    pub price: String,
    pub driver_id: String,
    pub internal_comments: String,
}

impl From<&Order> for EditOrderValues {
    fn from(order: &Order) -> Self {
        Self {
            customer_phone: order.customer_phone.clone(),
            customer_email: order
                .customer_email
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            pickup_address: order.pickup_address.clone(),
            pickup_contact: text(order.pickup_contact.as_deref()),
            delivery_address: order.delivery_address.clone(),
            delivery_contact: text(order.delivery_contact.as_deref()),
            status: order.status.as_str().to_owned(),
            price: order.price.map(|p| p.normalize().to_string()).unwrap_or_default(),
            driver_id: order
                .driver_id
                .map_or_else(|| "0".to_owned(), |id| id.to_string()),
            internal_comments: text(order.internal_comments.as_deref()),
        }
    }
}

impl EditOrderValues {
    /// Values echoed back after a rejected submission. Staff-only inputs that
    /// were not submitted keep the stored value.
    #[must_use]
    pub fn from_submission(form: &EditOrderForm, order: &Order) -> Self {
        let stored = Self::from(order);
        Self {
            customer_phone: form.customer_phone.clone(),
            customer_email: form.customer_email.clone(),
            pickup_address: form.pickup_address.clone(),
            pickup_contact: form.pickup_contact.clone(),
            delivery_address: form.delivery_address.clone(),
            delivery_contact: form.delivery_contact.clone(),
            status: form.status.clone().unwrap_or(stored.status),
            price: form.price.clone().unwrap_or(stored.price),
            driver_id: form.driver_id.clone().unwrap_or(stored.driver_id),
            internal_comments: form
                .internal_comments
                .clone()
                .unwrap_or(stored.internal_comments),
        }
    }
}

/// Driver row on the drivers page.
#[derive(Debug, Clone)]
pub struct DriverView {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub vehicle_info: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&Driver> for DriverView {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.as_i32(),
            name: driver.name.clone(),
            phone: driver.phone.clone(),
            vehicle_info: text(driver.vehicle_info.as_deref()),
            is_active: driver.is_active,
            created_at: driver.created_at.format("%d.%m.%Y").to_string(),
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub total_orders: i64,
    pub new_orders: i64,
    pub in_progress_orders: i64,
    pub delivered_orders: i64,
    pub total_revenue: String,
    pub average_price: String,
}

impl From<&DashboardSummary> for SummaryView {
    fn from(summary: &DashboardSummary) -> Self {
        Self {
            total_orders: summary.total_orders,
            new_orders: summary.new_orders,
            in_progress_orders: summary.in_progress_orders,
            delivered_orders: summary.delivered_orders,
            total_revenue: format_tenge(Some(summary.total_revenue)),
            average_price: format_tenge(Some(summary.average_price.unwrap_or(Decimal::ZERO))),
        }
    }
}

/// One row of an analytics breakdown.
#[derive(Debug, Clone)]
pub struct StatRow {
    pub label: String,
    pub count: i64,
    pub revenue: String,
}

/// Analytics page content.
#[derive(Debug, Clone)]
pub struct AnalyticsView {
    pub total_orders: i64,
    pub priced_orders: i64,
    pub total_revenue: String,
    pub average_price: String,
    pub statuses: Vec<StatRow>,
    pub shipping: Vec<StatRow>,
    pub daily: Vec<StatRow>,
    pub drivers: Vec<StatRow>,
}

impl From<&AnalyticsReport> for AnalyticsView {
    fn from(report: &AnalyticsReport) -> Self {
        Self {
            total_orders: report.revenue.total_orders,
            priced_orders: report.revenue.priced_orders,
            total_revenue: format_tenge(Some(report.revenue.total_revenue)),
            average_price: format_tenge(Some(
                report.revenue.average_price.unwrap_or(Decimal::ZERO),
            )),
            statuses: report.statuses.iter().map(StatRow::from).collect(),
            shipping: report.shipping.iter().map(StatRow::from).collect(),
            daily: report.daily.iter().map(StatRow::from).collect(),
            drivers: report.drivers.iter().map(StatRow::from).collect(),
        }
    }
}

impl From<&StatusCount> for StatRow {
    fn from(s: &StatusCount) -> Self {
        Self {
            label: s.status.label().to_owned(),
            count: s.count,
            revenue: String::new(),
        }
    }
}

impl From<&ShippingStat> for StatRow {
    fn from(s: &ShippingStat) -> Self {
        Self {
            label: s.shipping_type.label().to_owned(),
            count: s.count,
            revenue: format_tenge(Some(s.revenue)),
        }
    }
}

impl From<&DailyStat> for StatRow {
    fn from(s: &DailyStat) -> Self {
        Self {
            label: s.day.format("%d.%m.%Y").to_string(),
            count: s.orders,
            revenue: format_tenge(Some(s.revenue)),
        }
    }
}

impl From<&DriverStat> for StatRow {
    fn from(s: &DriverStat) -> Self {
        Self {
            label: s.name.clone(),
            count: s.orders,
            revenue: format_tenge(Some(s.revenue)),
        }
    }
}
