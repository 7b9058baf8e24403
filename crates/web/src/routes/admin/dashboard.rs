//! Staff dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::db::DriverRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::views::{OrderView, SummaryView};
use crate::routes::{Flash, MessageQuery};
use crate::services::OrderService;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub is_logist: bool,
    pub summary: SummaryView,
    pub recent_orders: Vec<OrderView>,
}

/// Dashboard handler.
///
/// Employees see counters and recent orders for their own orders only.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<DashboardTemplate, AppError> {
    let service = OrderService::new(state.pool(), state.notifier());
    let dashboard = service.dashboard(&user).await?;
    let drivers = DriverRepository::new(state.pool()).list_all().await?;

    Ok(DashboardTemplate {
        flash: Flash::from(&query),
        is_logist: user.is_logist(),
        summary: SummaryView::from(&dashboard.summary),
        recent_orders: OrderView::list(&dashboard.recent, &drivers),
        user: Some(user),
    })
}
