//! Authentication extractors.
//!
//! Handlers declare what they need by taking one of these extractors:
//! [`RequireAuth`] for any logged-in user, [`RequireLogist`] for the
//! elevated role, [`OptionalAuth`] where a login only changes behavior.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// Anonymous requests are redirected to `/login?next=<path>`.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in logist.
///
/// Employees are redirected to the dashboard with `?error=access_denied`.
pub struct RequireLogist(pub CurrentUser);

/// Why an authentication extractor refused the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// Not logged in; carries the path to come back to.
    RedirectToLogin(String),
    /// Logged in without the logist role.
    AccessDenied,
    /// The session layer is missing.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => Redirect::to(&login_redirect(&next)).into_response(),
            Self::AccessDenied => Redirect::to("/admin?error=access_denied").into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// `/login?next=...` for the given path and query.
#[must_use]
pub fn login_redirect(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

/// Whether `next` is safe to redirect to after login.
///
/// Only local absolute paths are accepted. Protocol-relative (`//host`) and
/// backslash forms are rejected.
#[must_use]
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

async fn current_user(parts: &Parts) -> Result<Option<CurrentUser>, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::SessionUnavailable)?;

    Ok(session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten())
}

fn requested_path(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned())
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)
            .await?
            .ok_or_else(|| AuthRejection::RedirectToLogin(requested_path(parts)))?;

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireLogist
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.is_logist() {
            tracing::warn!(user_id = %user.id, path = %parts.uri.path(), "Logist-only page refused");
            return Err(AuthRejection::AccessDenied);
        }
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Never rejects. Used by the public order form to link orders to a
/// logged-in employee.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await.ok().flatten()))
    }
}

/// Store the logged-in user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Log out by discarding the whole session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_next() {
        assert_eq!(
            login_redirect("/admin/orders?status=new"),
            "/login?next=%2Fadmin%2Forders%3Fstatus%3Dnew"
        );
    }

    #[test]
    fn test_safe_next() {
        assert!(is_safe_next("/admin/orders"));
        assert!(is_safe_next("/profile?tab=orders"));
        assert!(!is_safe_next("//evil.example"));
        assert!(!is_safe_next("https://evil.example"));
        assert!(!is_safe_next("/\\evil.example"));
        assert!(!is_safe_next(""));
    }

    #[test]
    fn test_rejection_redirects() {
        let response = AuthRejection::RedirectToLogin("/admin".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/login?next=%2Fadmin")
        );

        let response = AuthRejection::AccessDenied.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
