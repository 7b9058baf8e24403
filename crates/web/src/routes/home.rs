//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::routes::{Flash, MessageQuery};

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
}

/// Landing page handler.
#[instrument(skip_all)]
pub async fn index(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> IndexTemplate {
    IndexTemplate {
        user,
        flash: Flash::from(&query),
    }
}
