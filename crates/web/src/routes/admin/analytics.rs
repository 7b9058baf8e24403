//! Analytics page and chart data. Logists only.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, RequireLogist};
use crate::models::CurrentUser;
use crate::routes::Flash;
use crate::routes::views::{AnalyticsView, format_datetime};
use crate::services::orders::{OrderError, OrderService, analytics_window_start};
use crate::state::AppState;

/// Analytics template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/analytics.html")]
pub struct AnalyticsTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub start_date: String,
    pub end_date: String,
    pub report: AnalyticsView,
}

/// Analytics page handler.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    RequireLogist(user): RequireLogist,
    State(state): State<AppState>,
) -> Result<AnalyticsTemplate, AppError> {
    let now = Utc::now();
    let service = OrderService::new(state.pool(), state.notifier());
    let report = service.analytics(&user).await?;

    Ok(AnalyticsTemplate {
        user: Some(user),
        flash: Flash::default(),
        start_date: format_datetime(&analytics_window_start(now)),
        end_date: format_datetime(&now),
        report: AnalyticsView::from(&report),
    })
}

/// Chart data for the analytics page.
///
/// Employees get `403 {"error": "Access denied"}` rather than a redirect.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn data(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let service = OrderService::new(state.pool(), state.notifier());
    match service.analytics_data(&user).await {
        Ok(data) => Ok(Json(data).into_response()),
        Err(OrderError::Forbidden(_)) => Ok(access_denied()),
        Err(e) => Err(e.into()),
    }
}

fn access_denied() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Access denied" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_is_403() {
        assert_eq!(access_denied().status(), StatusCode::FORBIDDEN);
    }
}
