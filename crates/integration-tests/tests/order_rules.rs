//! Integration tests for order form validation and edit permissions.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use hrom_core::{DriverId, OrderStatus, ShippingType, UserId};
use hrom_integration_tests::{employee, logist, sample_order};
use hrom_web::forms::{EditOrderForm, OrderForm};
use hrom_web::services::orders::policy::{authorize_access, authorize_edit, require_logist};
use hrom_web::services::orders::{Denial, OrderError, parse_shipping_type};

fn valid_order_form() -> OrderForm {
    OrderForm {
        customer_name: "  Ерлан Ахметов ".to_string(),
        customer_phone: "+7 701 765 43 21".to_string(),
        pickup_address: "Астана, ул. Сыганак, 18".to_string(),
        delivery_address: "Астана, пр. Абая, 2".to_string(),
        cargo_description: "Холодильник".to_string(),
        cargo_weight: "75,5".to_string(),
        ..OrderForm::default()
    }
}

// =============================================================================
// Order intake
// =============================================================================

#[test]
fn test_order_form_builds_new_order() {
    let new_order = valid_order_form()
        .validate(ShippingType::Astana, Some(UserId::new(3)))
        .unwrap();

    assert_eq!(new_order.customer_name, "Ерлан Ахметов");
    assert_eq!(new_order.shipping_type, ShippingType::Astana);
    assert_eq!(new_order.customer_id, Some(UserId::new(3)));
    assert_eq!(new_order.cargo_weight, Some(75.5));
    assert_eq!(new_order.customer_email, None);
    assert_eq!(new_order.pickup_contact, None);
}

#[test]
fn test_order_form_reports_every_missing_field() {
    let errors = OrderForm::default()
        .validate(ShippingType::Kazakhstan, None)
        .unwrap_err();

    for field in [
        "customer_name",
        "customer_phone",
        "pickup_address",
        "delivery_address",
        "cargo_description",
    ] {
        assert!(errors.has(field), "missing error for {field}");
    }
}

#[test]
fn test_order_form_rejects_negative_weight_and_bad_email() {
    let form = OrderForm {
        cargo_weight: "-1".to_string(),
        customer_email: "not-an-email".to_string(),
        ..valid_order_form()
    };
    let errors = form.validate(ShippingType::Astana, None).unwrap_err();
    assert!(errors.has("cargo_weight"));
    assert!(errors.has("customer_email"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_shipping_type_must_be_known() {
    assert_eq!(parse_shipping_type("astana").unwrap(), ShippingType::Astana);
    assert!(matches!(
        parse_shipping_type("almaty"),
        Err(OrderError::InvalidShippingType(_))
    ));
}

// =============================================================================
// Access and edit permissions
// =============================================================================

#[test]
fn test_owner_and_logist_can_open_order() {
    let order = sample_order(Some(UserId::new(7)));
    assert!(authorize_access(&employee(7), &order).is_ok());
    assert!(authorize_access(&logist(), &order).is_ok());
}

#[test]
fn test_other_employee_cannot_open_order() {
    let order = sample_order(Some(UserId::new(7)));
    assert!(matches!(
        authorize_access(&employee(8), &order),
        Err(OrderError::Forbidden(Denial::NotOwner))
    ));

    let anonymous = sample_order(None);
    assert!(authorize_access(&employee(7), &anonymous).is_err());
}

#[test]
fn test_employee_edit_without_staff_fields_is_allowed() {
    let order = sample_order(Some(UserId::new(7)));
    let form = EditOrderForm {
        customer_phone: "+77017654321".to_string(),
        pickup_address: "Астана, ул. Сыганак, 20".to_string(),
        delivery_address: order.delivery_address.clone(),
        ..EditOrderForm::default()
    };
    let changes = form.validate().unwrap();

    assert!(authorize_edit(&employee(7), &order, &changes).is_ok());
}

#[test]
fn test_employee_cannot_change_price() {
    let order = sample_order(Some(UserId::new(7)));
    let form = EditOrderForm {
        customer_phone: order.customer_phone.clone(),
        pickup_address: order.pickup_address.clone(),
        delivery_address: order.delivery_address.clone(),
        price: Some("15000".to_string()),
        ..EditOrderForm::default()
    };
    let changes = form.validate().unwrap();
    assert_eq!(changes.price, Some(Some(Decimal::new(15000, 0))));

    assert!(matches!(
        authorize_edit(&employee(7), &order, &changes),
        Err(OrderError::Forbidden(Denial::StaffOnlyField("price")))
    ));
    assert!(authorize_edit(&logist(), &order, &changes).is_ok());
}

#[test]
fn test_resubmitting_unchanged_staff_values_is_not_a_change() {
    let order = sample_order(Some(UserId::new(7)));
    let form = EditOrderForm {
        customer_phone: order.customer_phone.clone(),
        pickup_address: order.pickup_address.clone(),
        delivery_address: order.delivery_address.clone(),
        status: Some("new".to_string()),
        driver_id: Some("0".to_string()),
        ..EditOrderForm::default()
    };
    let changes = form.validate().unwrap();
    assert!(changes.changed_staff_fields(&order).is_empty());
    assert!(authorize_edit(&employee(7), &order, &changes).is_ok());
}

#[test]
fn test_logist_update_applies_staff_fields() {
    let order = sample_order(None);
    let form = EditOrderForm {
        customer_phone: order.customer_phone.clone(),
        pickup_address: order.pickup_address.clone(),
        delivery_address: order.delivery_address.clone(),
        status: Some("in_progress".to_string()),
        price: Some("42 500,00".to_string()),
        driver_id: Some("3".to_string()),
        internal_comments: Some("Позвонить за час".to_string()),
        ..EditOrderForm::default()
    };
    let changes = form.validate().unwrap();
    authorize_edit(&logist(), &order, &changes).unwrap();

    let update = changes.apply_to(&order);
    assert_eq!(update.status, OrderStatus::InProgress);
    assert_eq!(update.price, Some(Decimal::new(42500, 0)));
    assert_eq!(update.driver_id, Some(DriverId::new(3)));
    assert_eq!(update.internal_comments.as_deref(), Some("Позвонить за час"));
}

#[test]
fn test_only_logists_pass_logist_gate() {
    assert!(require_logist(&logist()).is_ok());
    assert!(matches!(
        require_logist(&employee(2)),
        Err(OrderError::Forbidden(Denial::LogistOnly))
    ));
}
