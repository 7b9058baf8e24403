//! Order lifecycle error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::forms::ValidationErrors;

/// Why an actor was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// An employee touched an order they are not linked to.
    NotOwner,
    /// An employee changed a field reserved for logists.
    StaffOnlyField(&'static str),
    /// The page or action requires the logist role.
    LogistOnly,
}

impl Denial {
    /// Code carried in the `?error=` query parameter of the redirect.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotOwner => "not_owner",
            Self::StaffOnlyField(_) => "permission_denied",
            Self::LogistOnly => "access_denied",
        }
    }
}

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Submitted fields failed validation; nothing was stored.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The URL named a shipping type other than `astana` or `kazakhstan`.
    #[error("invalid shipping type: {0}")]
    InvalidShippingType(String),

    #[error("forbidden: {0:?}")]
    Forbidden(Denial),

    #[error("order not found")]
    NotFound,

    /// The selected driver does not exist or is inactive.
    #[error("driver is not available for assignment")]
    InvalidDriver,

    /// Every generated tracking number collided with an existing one.
    #[error("no free tracking number after {attempts} attempts")]
    TrackingNumberExhausted { attempts: u32 },

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<ValidationErrors> for OrderError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}
