//! Driver management. Logists only.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::db::DriverRepository;
use crate::error::AppError;
use crate::filters;
use crate::forms::{DriverForm, ValidationErrors};
use crate::middleware::RequireLogist;
use crate::models::CurrentUser;
use crate::routes::views::DriverView;
use crate::routes::{Flash, MessageQuery};
use crate::state::AppState;

/// Driver list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/drivers.html")]
pub struct DriversTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub drivers: Vec<DriverView>,
}

/// New driver template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/new_driver.html")]
pub struct NewDriverTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub form: DriverForm,
    pub errors: ValidationErrors,
}

/// Driver list handler.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    RequireLogist(user): RequireLogist,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<DriversTemplate, AppError> {
    let drivers = DriverRepository::new(state.pool()).list_all().await?;

    Ok(DriversTemplate {
        user: Some(user),
        flash: Flash::from(&query),
        drivers: drivers.iter().map(DriverView::from).collect(),
    })
}

/// New driver form handler.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn new_page(RequireLogist(user): RequireLogist) -> NewDriverTemplate {
    NewDriverTemplate {
        user: Some(user),
        flash: Flash::default(),
        form: DriverForm::default(),
        errors: ValidationErrors::new(),
    }
}

/// Create driver handler.
#[instrument(skip(user, state, form), fields(user_id = %user.id))]
pub async fn create(
    RequireLogist(user): RequireLogist,
    State(state): State<AppState>,
    Form(form): Form<DriverForm>,
) -> Result<Response, AppError> {
    let new_driver = match form.validate() {
        Ok(new_driver) => new_driver,
        Err(errors) => {
            let template = NewDriverTemplate {
                user: Some(user),
                flash: Flash::default(),
                form,
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let driver = DriverRepository::new(state.pool()).create(&new_driver).await?;
    tracing::info!(driver_id = %driver.id, "Driver created");

    Ok(Redirect::to("/admin/drivers?success=driver_created").into_response())
}
