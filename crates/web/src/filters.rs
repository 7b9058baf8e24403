//! Custom Askama template filters.
//!
//! Templates that use these must have `crate::filters` in scope.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a Kazakh phone number as `+7 (XXX) XXX-XX-XX`.
///
/// Anything that isn't an 11-digit number starting with 7 or 8 is shown as
/// entered.
///
/// Usage in templates: `{{ order.customer_phone|phone }}`
#[askama::filter_fn]
pub fn phone(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(hrom_core::format_phone(&value.to_string()))
}
