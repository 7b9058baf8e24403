//! Staff order list and edit form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use hrom_core::{OrderId, OrderStatus, ShippingType};

use crate::db::DriverRepository;
use crate::error::AppError;
use crate::filters;
use crate::forms::{EditOrderForm, ValidationErrors};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Order, OrderFilter};
use crate::routes::views::{
    EditOrderValues, OrderView, SelectOption, driver_options, shipping_type_options,
    status_options,
};
use crate::routes::{Flash, MessageQuery};
use crate::services::orders::{OrderError, OrderService};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Filters of the order list. Empty or unparseable values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub shipping_type: String,
    #[serde(default)]
    pub date_from: String,
    #[serde(default)]
    pub date_to: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

impl OrderListQuery {
    #[must_use]
    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            status: self.status.trim().parse::<OrderStatus>().ok(),
            shipping_type: self.shipping_type.trim().parse::<ShippingType>().ok(),
            date_from: parse_date(&self.date_from),
            date_to: parse_date(&self.date_to),
        }
    }

    fn flash(&self) -> Flash {
        Flash::from(&MessageQuery {
            error: self.error.clone(),
            success: self.success.clone(),
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub orders: Vec<OrderView>,
    pub status_filter: String,
    pub shipping_type_filter: String,
    pub date_from: String,
    pub date_to: String,
    pub statuses: Vec<SelectOption>,
    pub shipping_types: Vec<SelectOption>,
}

/// Order edit template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_order.html")]
pub struct EditOrderTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub is_logist: bool,
    pub order: OrderView,
    pub values: EditOrderValues,
    pub errors: ValidationErrors,
    pub statuses: Vec<SelectOption>,
    pub drivers: Vec<SelectOption>,
}

async fn edit_template(
    state: &AppState,
    user: CurrentUser,
    order: &Order,
    values: EditOrderValues,
    errors: ValidationErrors,
) -> Result<EditOrderTemplate, AppError> {
    let drivers = DriverRepository::new(state.pool()).list_all().await?;
    let driver_name = order
        .driver_id
        .and_then(|id| drivers.iter().find(|d| d.id == id))
        .map(|d| d.name.as_str());

    Ok(EditOrderTemplate {
        is_logist: user.is_logist(),
        user: Some(user),
        flash: Flash::default(),
        order: OrderView::from(order).with_driver(driver_name),
        values,
        errors,
        statuses: status_options(),
        drivers: driver_options(&drivers, order.driver_id),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Order list handler.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<OrdersTemplate, AppError> {
    let service = OrderService::new(state.pool(), state.notifier());
    let orders = service.list_orders(&user, &query.filter()).await?;
    let drivers = DriverRepository::new(state.pool()).list_all().await?;

    Ok(OrdersTemplate {
        user: Some(user),
        flash: query.flash(),
        orders: OrderView::list(&orders, &drivers),
        status_filter: query.status.trim().to_owned(),
        shipping_type_filter: query.shipping_type.trim().to_owned(),
        date_from: query.date_from.trim().to_owned(),
        date_to: query.date_to.trim().to_owned(),
        statuses: status_options(),
        shipping_types: shipping_type_options(),
    })
}

/// Edit form handler.
#[instrument(skip(user, state), fields(user_id = %user.id))]
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<EditOrderTemplate, AppError> {
    let service = OrderService::new(state.pool(), state.notifier());
    let order = service.get_order_for(&user, OrderId::new(id)).await?;

    edit_template(
        &state,
        user,
        &order,
        EditOrderValues::from(&order),
        ValidationErrors::new(),
    )
    .await
}

/// Edit submission handler.
///
/// Re-renders the form with 422 when validation fails or the selected driver
/// is unavailable.
#[instrument(skip(user, state, form), fields(user_id = %user.id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<EditOrderForm>,
) -> Result<Response, AppError> {
    let id = OrderId::new(id);
    let service = OrderService::new(state.pool(), state.notifier());

    let errors = match form.validate() {
        Ok(changes) => match service.edit_order(id, &user, changes).await {
            Ok(_) => return Ok(Redirect::to("/admin/orders?success=order_updated").into_response()),
            Err(OrderError::InvalidDriver) => {
                let mut errors = ValidationErrors::new();
                errors.add("driver_id", "Водитель не найден или неактивен");
                errors
            }
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    let order = service.get_order_for(&user, id).await?;
    let values = EditOrderValues::from_submission(&form, &order);
    let template = edit_template(&state, user, &order, values, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_ignores_empty_and_invalid_values() {
        let query = OrderListQuery {
            status: "in_progress".to_string(),
            shipping_type: String::new(),
            date_from: "2025-03-01".to_string(),
            date_to: "31.03.2025".to_string(),
            ..OrderListQuery::default()
        };
        let filter = query.filter();
        assert_eq!(filter.status, Some(OrderStatus::InProgress));
        assert_eq!(filter.shipping_type, None);
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(filter.date_to, None);
    }

    #[test]
    fn test_unknown_status_is_ignored() {
        let query = OrderListQuery {
            status: "lost".to_string(),
            ..OrderListQuery::default()
        };
        assert_eq!(query.filter(), OrderFilter::default());
    }
}
