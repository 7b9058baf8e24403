//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server faults are captured to
//! Sentry and answered with a generic 500 page. Authorization failures become
//! redirects carrying an `?error=` code for the target page to display.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::orders::{Denial, OrderError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {e}"))
    }
}

/// 404 page.
#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate;

/// 500 page.
#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate;

/// Render the 404 page.
#[must_use]
pub fn not_found_page() -> Response {
    let body = NotFoundTemplate.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Страница не найдена".to_string()
    });
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

fn server_error_page() -> Response {
    let body = ServerErrorTemplate.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Внутренняя ошибка сервера".to_string()
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}

/// Where a refused actor is sent.
fn denial_redirect(denial: Denial) -> Redirect {
    match denial {
        Denial::NotOwner | Denial::StaffOnlyField(_) => {
            Redirect::to(&format!("/admin/orders?error={}", denial.code()))
        }
        Denial::LogistOnly => Redirect::to(&format!("/admin?error={}", denial.code())),
    }
}

impl AppError {
    /// Whether this error is a server fault worth reporting.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
                | Self::Order(OrderError::Repository(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            return server_error_page();
        }

        match self {
            Self::Order(OrderError::NotFound) => not_found_page(),
            Self::Order(OrderError::Forbidden(denial)) => {
                denial_redirect(denial).into_response()
            }
            Self::Order(OrderError::InvalidShippingType(_)) => {
                Redirect::to("/?error=invalid_shipping_type").into_response()
            }
            Self::Order(OrderError::Validation(errors)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()).into_response()
            }
            Self::Order(OrderError::TrackingNumberExhausted { .. }) => (
                StatusCode::CONFLICT,
                "Не удалось присвоить номер отслеживания, повторите попытку",
            )
                .into_response(),
            Self::Order(OrderError::InvalidDriver) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Водитель недоступен для назначения",
            )
                .into_response(),
            Self::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "Неверное имя пользователя или пароль").into_response()
            }
            Self::Auth(AuthError::UserAlreadyExists) => (
                StatusCode::CONFLICT,
                "Пользователь с таким именем или email уже существует",
            )
                .into_response(),
            Self::Auth(AuthError::WeakPassword(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            // Server faults returned above.
            other => {
                tracing::error!(error = %other, "Unclassified request error");
                server_error_page()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;
    use crate::forms::ValidationErrors;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    fn location_of(err: AppError) -> Option<String> {
        err.into_response()
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Order(OrderError::NotFound);
        assert_eq!(err.to_string(), "Order error: order not found");

        let err = AppError::Internal("session store unavailable".to_string());
        assert_eq!(err.to_string(), "Internal error: session store unavailable");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::Order(OrderError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Order(OrderError::Validation(ValidationErrors::form("x")))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Order(OrderError::TrackingNumberExhausted { attempts: 5 })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_tracking_exhaustion_is_not_a_server_fault() {
        let err = AppError::Order(OrderError::TrackingNumberExhausted { attempts: 5 });
        assert!(!err.is_server_error());
        assert!(AppError::Order(OrderError::Repository(RepositoryError::NotFound)).is_server_error());
    }

    #[test]
    fn test_forbidden_redirects_with_code() {
        assert_eq!(
            location_of(AppError::Order(OrderError::Forbidden(Denial::NotOwner))).as_deref(),
            Some("/admin/orders?error=not_owner")
        );
        assert_eq!(
            location_of(AppError::Order(OrderError::Forbidden(Denial::StaffOnlyField(
                "price"
            ))))
            .as_deref(),
            Some("/admin/orders?error=permission_denied")
        );
        assert_eq!(
            location_of(AppError::Order(OrderError::Forbidden(Denial::LogistOnly))).as_deref(),
            Some("/admin?error=access_denied")
        );
    }

    #[test]
    fn test_invalid_shipping_type_goes_home() {
        assert_eq!(
            location_of(AppError::Order(OrderError::InvalidShippingType(
                "moscow".to_string()
            )))
            .as_deref(),
            Some("/?error=invalid_shipping_type")
        );
    }
}
