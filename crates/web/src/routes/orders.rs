//! Public order intake and tracking.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use hrom_core::ShippingType;

use crate::error::AppError;
use crate::filters;
use crate::forms::{OrderForm, TrackingForm, ValidationErrors};
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::routes::views::OrderView;
use crate::routes::{Flash, MessageQuery};
use crate::services::orders::{OrderError, OrderService, parse_shipping_type};
use crate::state::AppState;

const TRACKING_CONFLICT_MESSAGE: &str =
    "Не удалось присвоить номер отслеживания. Пожалуйста, отправьте форму ещё раз.";

// =============================================================================
// Templates
// =============================================================================

/// Order form template.
#[derive(Template, WebTemplate)]
#[template(path = "order_form.html")]
pub struct OrderFormTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub shipping_type: &'static str,
    pub shipping_title: &'static str,
    pub form: OrderForm,
    pub errors: ValidationErrors,
}

impl OrderFormTemplate {
    fn new(
        user: Option<CurrentUser>,
        shipping_type: ShippingType,
        form: OrderForm,
        errors: ValidationErrors,
    ) -> Self {
        Self {
            user,
            flash: Flash::default(),
            shipping_type: shipping_type.as_str(),
            shipping_title: shipping_type.label(),
            form,
            errors,
        }
    }
}

/// Tracking search page, also used for unknown tracking numbers.
#[derive(Template, WebTemplate)]
#[template(path = "track.html")]
pub struct TrackTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub tracking_number: String,
}

/// Tracking result page.
#[derive(Template, WebTemplate)]
#[template(path = "track_result.html")]
pub struct TrackResultTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    pub order: OrderView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Order form page handler.
#[instrument(skip(user))]
pub async fn new_page(
    OptionalAuth(user): OptionalAuth,
    Path(shipping_type): Path<String>,
) -> Result<OrderFormTemplate, AppError> {
    let shipping_type = parse_shipping_type(&shipping_type)?;
    Ok(OrderFormTemplate::new(
        user,
        shipping_type,
        OrderForm::default(),
        ValidationErrors::new(),
    ))
}

/// Order submission handler.
///
/// Re-renders the form with 422 on validation errors and 409 when no
/// tracking number could be allocated. On success redirects
/// to the tracking page of the new order.
#[instrument(skip(user, state, form))]
pub async fn create(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
    Path(shipping_type): Path<String>,
    Form(form): Form<OrderForm>,
) -> Result<Response, AppError> {
    let service = OrderService::new(state.pool(), state.notifier());

    match service
        .create_order(&shipping_type, &form, user.as_ref())
        .await
    {
        Ok(order) => Ok(Redirect::to(&format!(
            "/track/{}?success=order_created",
            order.tracking_number
        ))
        .into_response()),
        Err(e) => {
            let (status, errors) = resubmittable(e)?;
            let shipping_type = parse_shipping_type(&shipping_type)?;
            let template = OrderFormTemplate::new(user, shipping_type, form, errors);
            Ok((status, template).into_response())
        }
    }
}

/// Creation failures shown on the form so the user can submit again.
fn resubmittable(error: OrderError) -> Result<(StatusCode, ValidationErrors), OrderError> {
    match error {
        OrderError::Validation(errors) => Ok((StatusCode::UNPROCESSABLE_ENTITY, errors)),
        OrderError::TrackingNumberExhausted { attempts } => {
            tracing::warn!(attempts, "Tracking number allocation exhausted");
            Ok((
                StatusCode::CONFLICT,
                ValidationErrors::form(TRACKING_CONFLICT_MESSAGE),
            ))
        }
        other => Err(other),
    }
}

/// Tracking search page handler.
#[instrument(skip_all)]
pub async fn track_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> TrackTemplate {
    TrackTemplate {
        user,
        flash: Flash::from(&query),
        tracking_number: String::new(),
    }
}

/// Tracking result handler.
///
/// Unknown numbers render the search page with a 404 status.
#[instrument(skip(user, state, query))]
pub async fn track(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let service = OrderService::new(state.pool(), state.notifier());

    match service.track_order(&tracking_number).await {
        Ok(order) => {
            let mut flash = Flash::from(&query);
            if query.success.as_deref() == Some("order_created") {
                flash.success = Some(format!(
                    "Ваша заявка принята! Номер отслеживания: {}",
                    order.tracking_number
                ));
            }
            Ok(TrackResultTemplate {
                user,
                flash,
                order: OrderView::from(&order),
            }
            .into_response())
        }
        Err(OrderError::NotFound) => {
            let template = TrackTemplate {
                user,
                flash: Flash::error("Заказ с указанным номером не найден"),
                tracking_number,
            };
            Ok((StatusCode::NOT_FOUND, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Tracking search action: validates and redirects to the result page.
#[instrument(skip_all)]
pub async fn track_search(Form(form): Form<TrackingForm>) -> Redirect {
    match form.validate() {
        Ok(tracking_number) => {
            Redirect::to(&format!("/track/{}", urlencoding::encode(&tracking_number)))
        }
        Err(_) => Redirect::to("/track?error=invalid_tracking"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_exhaustion_is_resubmittable() {
        let (status, errors) =
            resubmittable(OrderError::TrackingNumberExhausted { attempts: 5 }).unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(errors.for_field("form"), Some(TRACKING_CONFLICT_MESSAGE));
    }

    #[test]
    fn test_validation_is_resubmittable() {
        let (status, errors) =
            resubmittable(OrderError::Validation(ValidationErrors::form("x"))).unwrap();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(errors.has("form"));
    }

    #[test]
    fn test_other_errors_propagate() {
        assert!(matches!(
            resubmittable(OrderError::InvalidShippingType("moscow".to_string())),
            Err(OrderError::InvalidShippingType(_))
        ));
    }
}
