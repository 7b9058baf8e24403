//! HTML form payloads and their validation.
//!
//! Every form deserializes from `application/x-www-form-urlencoded` into
//! plain strings so a rejected submission can be re-rendered exactly as the
//! user typed it. `validate()` turns the raw strings into domain values or a
//! [`ValidationErrors`] list keyed by field name.
//!
//! Lengths are counted in characters after trimming. Blank optional fields
//! become `None` and are stored as `NULL`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use hrom_core::{DriverId, Email, OrderStatus, ShippingType, TrackingNumber, UserId};

use crate::models::{NewDriver, NewOrder, OrderChanges};
use crate::services::auth::{MIN_PASSWORD_LENGTH, Registration};

// =============================================================================
// Errors
// =============================================================================

/// A message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// A single error not tied to an input, shown above the form.
    #[must_use]
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add("form", message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message for `field`, used by templates next to the input.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.for_field(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Field helpers
// =============================================================================

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> String {
    let value = value.trim();
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, "Обязательное поле");
    } else if len < min || len > max {
        errors.add(field, format!("Длина должна быть от {min} до {max} символов"));
    }
    value.to_owned()
}

fn optional(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: usize,
) -> Option<String> {
    let value = Some(value.trim()).filter(|v| !v.is_empty())?;
    if value.chars().count() > max {
        errors.add(field, format!("Не более {max} символов"));
    }
    Some(value.to_owned())
}

fn optional_email(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<Email> {
    let value = Some(value.trim()).filter(|v| !v.is_empty())?;
    match Email::parse(value) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add(field, "Некорректный email адрес");
            None
        }
    }
}

/// Accepts `15000`, `15 000`, and `15000,50`.
fn parse_amount(value: &str) -> Option<String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn optional_weight(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<f64> {
    let cleaned = parse_amount(value)?;
    match cleaned.parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => Some(weight),
        Ok(_) => {
            errors.add(field, "Вес не может быть отрицательным");
            None
        }
        Err(_) => {
            errors.add(field, "Введите число");
            None
        }
    }
}

/// Exclusive upper bound; prices are stored as `NUMERIC(12, 2)`.
fn price_limit() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

fn optional_price(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<Decimal> {
    let cleaned = parse_amount(value)?;
    match Decimal::from_str(&cleaned) {
        Ok(price) if price.is_sign_negative() && !price.is_zero() => {
            errors.add(field, "Цена не может быть отрицательной");
            None
        }
        Ok(price) if price.round_dp(2) >= price_limit() => {
            errors.add(field, "Цена слишком большая");
            None
        }
        Ok(price) => Some(price.round_dp(2)),
        Err(_) => {
            errors.add(field, "Введите число");
            None
        }
    }
}

// =============================================================================
// Order intake
// =============================================================================

/// Public order form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub pickup_address: String,
    pub pickup_contact: String,
    pub delivery_address: String,
    pub delivery_contact: String,
    pub cargo_description: String,
    pub cargo_weight: String,
    pub cargo_dimensions: String,
    pub customer_notes: String,
}

impl OrderForm {
    /// Validate into a [`NewOrder`] for `shipping_type`, linked to
    /// `customer_id` when the submitter is logged in.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate(
        &self,
        shipping_type: ShippingType,
        customer_id: Option<UserId>,
    ) -> Result<NewOrder, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer_name = required(&mut errors, "customer_name", &self.customer_name, 2, 100);
        let customer_phone = required(&mut errors, "customer_phone", &self.customer_phone, 10, 20);
        let customer_email =
            optional_email(&mut errors, "customer_email", &self.customer_email);
        let pickup_address = required(&mut errors, "pickup_address", &self.pickup_address, 5, 500);
        let pickup_contact =
            optional(&mut errors, "pickup_contact", &self.pickup_contact, 200);
        let delivery_address =
            required(&mut errors, "delivery_address", &self.delivery_address, 5, 500);
        let delivery_contact =
            optional(&mut errors, "delivery_contact", &self.delivery_contact, 200);
        let cargo_description =
            required(&mut errors, "cargo_description", &self.cargo_description, 5, 1000);
        let cargo_weight = optional_weight(&mut errors, "cargo_weight", &self.cargo_weight);
        let cargo_dimensions =
            optional(&mut errors, "cargo_dimensions", &self.cargo_dimensions, 100);
        let customer_notes =
            optional(&mut errors, "customer_notes", &self.customer_notes, 500);

        errors.finish(NewOrder {
            shipping_type,
            customer_name,
            customer_phone,
            customer_email,
            customer_id,
            pickup_address,
            pickup_contact,
            delivery_address,
            delivery_contact,
            cargo_description,
            cargo_weight,
            cargo_dimensions,
            customer_notes,
        })
    }
}

/// Tracking lookup form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackingForm {
    pub tracking_number: String,
}

impl TrackingForm {
    /// Normalized tracking number (trimmed, uppercase).
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is 5 to 20 characters.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "tracking_number", &self.tracking_number, 5, 20);
        errors.finish(TrackingNumber::normalize(&self.tracking_number))
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Self-service registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate(&self) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = required(&mut errors, "username", &self.username, 3, 64);
        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(_) if self.email.trim().is_empty() => {
                errors.add("email", "Обязательное поле");
                None
            }
            Err(_) => {
                errors.add("email", "Некорректный email адрес");
                None
            }
        };
        let full_name = required(&mut errors, "full_name", &self.full_name, 2, 100);
        let phone = required(&mut errors, "phone", &self.phone, 10, 20);
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("Пароль должен содержать не менее {MIN_PASSWORD_LENGTH} символов"),
            );
        }

        match email {
            Some(email) => errors.finish(Registration {
                username,
                email,
                full_name,
                phone,
                password: self.password.clone(),
            }),
            None => Err(errors),
        }
    }
}

/// Login form. `next` carries the page the user was sent away from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns an error for each empty field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", "Обязательное поле");
        }
        if self.password.is_empty() {
            errors.add("password", "Обязательное поле");
        }
        errors.finish(())
    }
}

// =============================================================================
// Staff
// =============================================================================

/// Staff order edit form.
///
/// The staff-only inputs are rendered for logists only. When absent from the
/// submission they are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditOrderForm {
    pub customer_phone: String,
    pub customer_email: String,
    pub pickup_address: String,
    pub pickup_contact: String,
    pub delivery_address: String,
    pub delivery_contact: String,

    pub status: Option<String>,
    pub price: Option<String>,
    /// `""` or `"0"` means unassigned.
    pub driver_id: Option<String>,
    pub internal_comments: Option<String>,
}

impl EditOrderForm {
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate(&self) -> Result<OrderChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer_phone = required(&mut errors, "customer_phone", &self.customer_phone, 10, 20);
        let customer_email =
            optional_email(&mut errors, "customer_email", &self.customer_email);
        let pickup_address = required(&mut errors, "pickup_address", &self.pickup_address, 5, 500);
        let pickup_contact =
            optional(&mut errors, "pickup_contact", &self.pickup_contact, 200);
        let delivery_address =
            required(&mut errors, "delivery_address", &self.delivery_address, 5, 500);
        let delivery_contact =
            optional(&mut errors, "delivery_contact", &self.delivery_contact, 200);

        let status = self.status.as_deref().and_then(|raw| {
            OrderStatus::from_str(raw.trim())
                .map_err(|_| errors.add("status", "Выберите статус из списка"))
                .ok()
        });
        let price = self
            .price
            .as_deref()
            .map(|raw| optional_price(&mut errors, "price", raw));
        let driver_id = self.driver_id.as_deref().map(|raw| match raw.trim() {
            "" | "0" => None,
            value => DriverId::from_str(value)
                .map_err(|_| errors.add("driver_id", "Выберите водителя из списка"))
                .ok(),
        });
        let internal_comments = self.internal_comments.as_deref().map(|raw| {
            optional(&mut errors, "internal_comments", raw, 1000)
        });

        errors.finish(OrderChanges {
            customer_phone: Some(customer_phone),
            customer_email: Some(customer_email),
            pickup_address: Some(pickup_address),
            pickup_contact: Some(pickup_contact),
            delivery_address: Some(delivery_address),
            delivery_contact: Some(delivery_contact),
            status,
            price,
            driver_id,
            internal_comments,
        })
    }
}

/// New driver form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverForm {
    pub name: String,
    pub phone: String,
    pub vehicle_info: String,
}

impl DriverForm {
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate(&self) -> Result<NewDriver, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required(&mut errors, "name", &self.name, 2, 100);
        let phone = required(&mut errors, "phone", &self.phone, 10, 20);
        let vehicle_info = optional(&mut errors, "vehicle_info", &self.vehicle_info, 200);
        errors.finish(NewDriver {
            name,
            phone,
            vehicle_info,
        })
    }
}
