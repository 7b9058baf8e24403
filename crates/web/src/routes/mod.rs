//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Landing page with the two shipping options
//! GET  /health                    - Liveness probe
//! GET  /health/ready              - Readiness probe (database)
//!
//! # Orders (public)
//! GET  /order/{shipping_type}     - Order form (astana | kazakhstan)
//! POST /order/{shipping_type}     - Submit order
//! GET  /track                     - Tracking search page
//! GET  /track/{tracking_number}   - Tracking result
//! POST /track_search              - Tracking search action
//!
//! # Auth
//! GET  /register                  - Registration page
//! POST /register                  - Registration action
//! GET  /login                     - Login page
//! POST /login                     - Login action
//! GET  /logout                    - Logout action
//! GET  /profile                   - Own orders (requires auth)
//!
//! # Staff (requires auth)
//! GET  /admin                     - Dashboard
//! GET  /admin/orders              - Order list with filters
//! GET  /admin/orders/{id}/edit    - Edit form
//! POST /admin/orders/{id}/edit    - Edit action
//! GET  /admin/analytics           - Analytics (logist)
//! GET  /admin/analytics/data      - Chart data as JSON (logist)
//! GET  /admin/drivers             - Driver list (logist)
//! GET  /admin/drivers/new         - New driver form (logist)
//! POST /admin/drivers/new         - Create driver (logist)
//! ```

pub mod admin;
pub mod auth;
pub mod home;
pub mod orders;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

// =============================================================================
// Flash messages
// =============================================================================

/// Query parameters for error/success display after a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Messages shown at the top of a page.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Flash {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            success: None,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            error: None,
            success: Some(message.into()),
        }
    }
}

impl From<&MessageQuery> for Flash {
    fn from(query: &MessageQuery) -> Self {
        Self {
            error: query.error.as_deref().map(|c| error_message(c).to_owned()),
            success: query
                .success
                .as_deref()
                .and_then(success_message)
                .map(str::to_owned),
        }
    }
}

/// Text for an `?error=` code. Unknown codes get a generic message.
#[must_use]
pub fn error_message(code: &str) -> &'static str {
    match code {
        "access_denied" => "У вас нет доступа к этой странице",
        "not_owner" => "У вас нет прав для редактирования этого заказа",
        "permission_denied" => {
            "Статус, цену, водителя и внутренние комментарии может изменять только логист"
        }
        "invalid_shipping_type" => "Недопустимый тип отгрузки",
        "invalid_tracking" => "Номер отслеживания должен содержать от 5 до 20 символов",
        _ => "Произошла ошибка",
    }
}

/// Text for a `?success=` code. Unknown codes show nothing.
#[must_use]
pub fn success_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "order_created" => "Ваша заявка принята!",
        "order_updated" => "Заказ успешно обновлен!",
        "registered" => "Регистрация успешно завершена!",
        "logged_in" => "Вы успешно вошли в систему!",
        "logged_out" => "Вы вышли из системы",
        "driver_created" => "Водитель успешно добавлен!",
        _ => return None,
    })
}

// =============================================================================
// Routers
// =============================================================================

/// Create the staff routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard::show))
        .route("/orders", get(admin::orders::index))
        .route(
            "/orders/{id}/edit",
            get(admin::orders::edit_page).post(admin::orders::update),
        )
        .route("/analytics", get(admin::analytics::show))
        .route("/analytics/data", get(admin::analytics::data))
        .route("/drivers", get(admin::drivers::index))
        .route(
            "/drivers/new",
            get(admin::drivers::new_page).post(admin::drivers::create),
        )
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        // Public order intake and tracking
        .route(
            "/order/{shipping_type}",
            get(orders::new_page).post(orders::create),
        )
        .route("/track", get(orders::track_page))
        .route("/track/{tracking_number}", get(orders::track))
        .route("/track_search", post(orders::track_search))
        // Auth
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/profile", get(auth::profile))
        // Staff
        .nest("/admin", admin_routes())
}
