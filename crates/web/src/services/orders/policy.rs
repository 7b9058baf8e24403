//! Who may see and change which orders.

use crate::models::{CurrentUser, Order, OrderChanges};

use super::error::{Denial, OrderError};

/// Whether `actor` may open `order` at all.
///
/// Logists may open any order; employees only those linked to them.
///
/// # Errors
///
/// Returns `OrderError::Forbidden(Denial::NotOwner)` otherwise.
pub fn authorize_access(actor: &CurrentUser, order: &Order) -> Result<(), OrderError> {
    if actor.is_logist() || order.customer_id == Some(actor.id) {
        Ok(())
    } else {
        Err(OrderError::Forbidden(Denial::NotOwner))
    }
}

/// Whether `actor` may apply `changes` to `order`.
///
/// Employees may edit contact and address fields of their own orders.
/// Submitting a staff-only field with its current value is allowed.
///
/// # Errors
///
/// Returns `OrderError::Forbidden` naming the first refused field.
pub fn authorize_edit(
    actor: &CurrentUser,
    order: &Order,
    changes: &OrderChanges,
) -> Result<(), OrderError> {
    authorize_access(actor, order)?;

    if actor.is_logist() {
        return Ok(());
    }

    match changes.changed_staff_fields(order).first() {
        Some(&field) => Err(OrderError::Forbidden(Denial::StaffOnlyField(field))),
        None => Ok(()),
    }
}

/// # Errors
///
/// Returns `OrderError::Forbidden(Denial::LogistOnly)` for employees.
pub const fn require_logist(actor: &CurrentUser) -> Result<(), OrderError> {
    if actor.is_logist() {
        Ok(())
    } else {
        Err(OrderError::Forbidden(Denial::LogistOnly))
    }
}
