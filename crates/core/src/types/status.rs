//! Closed enumerations for order status, shipping type, and staff role.
//!
//! Each enum maps to a `PostgreSQL` enum type (with the `postgres` feature),
//! serializes as `snake_case`, and carries the Russian label shown to users.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Lifecycle status of a shipment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted by the customer, not yet reviewed.
    #[default]
    New,
    /// Reviewed and accepted by a logist.
    Confirmed,
    /// Cargo picked up and on the road.
    InProgress,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Confirmed,
        Self::InProgress,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire and database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "Новая заявка",
            Self::Confirmed => "Подтверждена",
            Self::InProgress => "В пути",
            Self::Delivered => "Доставлена",
            Self::Cancelled => "Отменена",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("order status", s)),
        }
    }
}

/// Service category chosen when the order is created. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shipping_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShippingType {
    /// Delivery within Astana.
    Astana,
    /// Delivery between cities of Kazakhstan.
    Kazakhstan,
}

impl ShippingType {
    pub const ALL: [Self; 2] = [Self::Astana, Self::Kazakhstan];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Astana => "astana",
            Self::Kazakhstan => "kazakhstan",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Astana => "Отгрузка по Астане",
            Self::Kazakhstan => "Отгрузка по Казахстану",
        }
    }
}

impl std::fmt::Display for ShippingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShippingType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "astana" => Ok(Self::Astana),
            "kazakhstan" => Ok(Self::Kazakhstan),
            _ => Err(ParseEnumError::new("shipping type", s)),
        }
    }
}

/// Staff role with different permission levels.
///
/// Self-service registration always yields [`UserRole::Employee`]; logists
/// are provisioned from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// May edit contact and address fields of orders they placed.
    #[default]
    Employee,
    /// Full access: pricing, status, drivers, analytics.
    Logist,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Logist => "logist",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Employee => "Сотрудник",
            Self::Logist => "Логист",
        }
    }

    #[must_use]
    pub const fn is_logist(self) -> bool {
        matches!(self, Self::Logist)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "logist" => Ok(Self::Logist),
            _ => Err(ParseEnumError::new("user role", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse_matches_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.kind, "order status");
        assert_eq!(err.value, "shipped");
    }

    #[test]
    fn test_order_status_default_is_new() {
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn test_order_status_labels() {
        assert_eq!(OrderStatus::New.label(), "Новая заявка");
        assert_eq!(OrderStatus::InProgress.label(), "В пути");
        assert_eq!(OrderStatus::Cancelled.label(), "Отменена");
    }

    #[test]
    fn test_order_status_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_shipping_type_parse() {
        assert_eq!("astana".parse::<ShippingType>().unwrap(), ShippingType::Astana);
        assert_eq!(
            "kazakhstan".parse::<ShippingType>().unwrap(),
            ShippingType::Kazakhstan
        );
        assert!("almaty".parse::<ShippingType>().is_err());
        assert!("Astana".parse::<ShippingType>().is_err());
    }

    #[test]
    fn test_shipping_type_labels() {
        assert_eq!(ShippingType::Astana.label(), "Отгрузка по Астане");
        assert_eq!(ShippingType::Kazakhstan.label(), "Отгрузка по Казахстану");
    }

    #[test]
    fn test_user_role_default_is_employee() {
        assert_eq!(UserRole::default(), UserRole::Employee);
        assert!(!UserRole::Employee.is_logist());
        assert!(UserRole::Logist.is_logist());
    }

    #[test]
    fn test_user_role_roundtrip() {
        assert_eq!("logist".parse::<UserRole>().unwrap(), UserRole::Logist);
        assert_eq!(UserRole::Employee.to_string(), "employee");
        assert!("admin".parse::<UserRole>().is_err());
    }
}
