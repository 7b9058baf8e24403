//! Authentication route handlers.
//!
//! Handles registration, password login, logout, and the profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{DriverRepository, OrderRepository};
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{LoginForm, RegisterForm, ValidationErrors};
use crate::middleware::{
    OptionalAuth, RequireAuth, clear_current_user, is_safe_next, set_current_user,
};
use crate::models::{CurrentUser, OrderFilter};
use crate::routes::views::OrderView;
use crate::routes::{Flash, MessageQuery};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub username: String,
    pub next: String,
    pub errors: ValidationErrors,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub form: RegisterForm,
    pub errors: ValidationErrors,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub full_name: String,
    pub username: String,
    pub role_label: &'static str,
    pub orders: Vec<OrderView>,
}

/// Where to go after login: `next` when it is a local path, else `/admin`.
#[must_use]
pub fn post_login_target(next: Option<&str>) -> String {
    next.map(str::trim)
        .filter(|n| is_safe_next(n))
        .unwrap_or("/admin")
        .to_owned()
}

async fn start_session(session: &Session, user: &CurrentUser) -> Result<(), AppError> {
    set_current_user(session, user).await?;
    set_sentry_user(&user.id, &user.username);
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page. Logged-in users go to the dashboard.
#[instrument(skip_all)]
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/admin").into_response();
    }

    LoginTemplate {
        user: None,
        flash: Flash::from(&MessageQuery {
            error: query.error,
            success: query.success,
        }),
        username: String::new(),
        next: query.next.unwrap_or_default(),
        errors: ValidationErrors::new(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let rejected = |errors: ValidationErrors, status: StatusCode| {
        let template = LoginTemplate {
            user: None,
            flash: Flash::default(),
            username: form.username.clone(),
            next: form.next.clone().unwrap_or_default(),
            errors,
        };
        (status, template).into_response()
    };

    if let Err(errors) = form.validate() {
        return Ok(rejected(errors, StatusCode::UNPROCESSABLE_ENTITY));
    }

    let auth = AuthService::new(state.pool());
    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            start_session(&session, &current).await?;
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Redirect::to(&post_login_target(form.next.as_deref())).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed");
            Ok(rejected(
                ValidationErrors::form("Неверное имя пользователя или пароль"),
                StatusCode::UNAUTHORIZED,
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Log out and return to the landing page.
///
/// Anonymous visitors are sent to the login page by the extractor.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!(user_id = %user.id, "User logged out");
    Ok(Redirect::to("/?success=logged_out"))
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page. Logged-in users go to their profile.
#[instrument(skip_all)]
pub async fn register_page(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/profile").into_response();
    }

    RegisterTemplate {
        user: None,
        flash: Flash::default(),
        form: RegisterForm::default(),
        errors: ValidationErrors::new(),
    }
    .into_response()
}

/// Handle registration form submission.
///
/// New accounts are always employees and are logged in immediately.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => return Ok(rejected_registration(form, errors)),
    };

    let auth = AuthService::new(state.pool());
    match auth.register(registration).await {
        Ok(user) => {
            start_session(&session, &CurrentUser::from(&user)).await?;
            Ok(Redirect::to("/profile?success=registered").into_response())
        }
        Err(AuthError::UserAlreadyExists) => Ok(rejected_registration(
            form,
            ValidationErrors::form("Пользователь с таким именем или email уже существует"),
        )),
        Err(AuthError::WeakPassword(message)) => {
            let mut errors = ValidationErrors::new();
            errors.add("password", message);
            Ok(rejected_registration(form, errors))
        }
        Err(e) => Err(e.into()),
    }
}

fn rejected_registration(mut form: RegisterForm, errors: ValidationErrors) -> Response {
    form.password.clear();
    let template = RegisterTemplate {
        user: None,
        flash: Flash::default(),
        form,
        errors,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

// =============================================================================
// Profile
// =============================================================================

/// The logged-in user's own orders, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<ProfileTemplate, AppError> {
    let orders_repo = OrderRepository::new(state.pool());
    let drivers_repo = DriverRepository::new(state.pool());
    let filter = OrderFilter::default();
    let (orders, drivers) = tokio::try_join!(
        orders_repo.list(Some(user.id), &filter),
        drivers_repo.list_all(),
    )?;

    Ok(ProfileTemplate {
        full_name: user.full_name.clone(),
        username: user.username.clone(),
        role_label: user.role.label(),
        orders: OrderView::list(&orders, &drivers),
        flash: Flash::from(&query),
        user: Some(user),
    })
}
