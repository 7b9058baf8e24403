//! Order domain types.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use hrom_core::{
    DriverId, Email, OrderId, OrderStatus, ShippingType, TrackingNumber, UserId,
};

/// A shipment order.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Public lookup handle, immutable once assigned.
    pub tracking_number: TrackingNumber,

    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<Email>,
    /// Staff account that placed the order, if any.
    pub customer_id: Option<UserId>,

    pub shipping_type: ShippingType,

    pub pickup_address: String,
    pub pickup_contact: Option<String>,
    pub delivery_address: String,
    pub delivery_contact: Option<String>,

    pub cargo_description: String,
    /// Kilograms.
    pub cargo_weight: Option<f64>,
    pub cargo_dimensions: Option<String>,

    pub status: OrderStatus,
    pub price: Option<Decimal>,
    pub driver_id: Option<DriverId>,

    pub customer_notes: Option<String>,
    /// Staff-only notes, never shown on the public tracking page.
    pub internal_comments: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated data for a new order. Status, price, and driver are not part of
/// creation: every order starts as `new`, unpriced and unassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub shipping_type: ShippingType,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<Email>,
    pub customer_id: Option<UserId>,
    pub pickup_address: String,
    pub pickup_contact: Option<String>,
    pub delivery_address: String,
    pub delivery_contact: Option<String>,
    pub cargo_description: String,
    pub cargo_weight: Option<f64>,
    pub cargo_dimensions: Option<String>,
    pub customer_notes: Option<String>,
}

/// Fields submitted by an edit form.
///
/// `None` means the field was not submitted. For nullable columns the inner
/// `Option` is the requested value, so `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub customer_phone: Option<String>,
    pub customer_email: Option<Option<Email>>,
    pub pickup_address: Option<String>,
    pub pickup_contact: Option<Option<String>>,
    pub delivery_address: Option<String>,
    pub delivery_contact: Option<Option<String>>,

    pub status: Option<OrderStatus>,
    pub price: Option<Option<Decimal>>,
    pub driver_id: Option<Option<DriverId>>,
    pub internal_comments: Option<Option<String>>,
}

/// Names of the fields only a logist may change.
pub const STAFF_ONLY_FIELDS: [&str; 4] = ["status", "price", "driver_id", "internal_comments"];

impl OrderChanges {
    /// Staff-only fields whose submitted value differs from `order`.
    ///
    /// Resubmitting the current value is not a change.
    #[must_use]
    pub fn changed_staff_fields(&self, order: &Order) -> Vec<&'static str> {
        STAFF_ONLY_FIELDS
            .into_iter()
            .filter(|field| self.staff_field_changed(field, order))
            .collect()
    }

    fn staff_field_changed(&self, field: &str, order: &Order) -> bool {
        match field {
            "status" => self.status.is_some_and(|s| s != order.status),
            "price" => self.price.is_some_and(|p| p != order.price),
            "driver_id" => self.driver_id.is_some_and(|d| d != order.driver_id),
            "internal_comments" => self
                .internal_comments
                .as_ref()
                .is_some_and(|c| *c != order.internal_comments),
            _ => false,
        }
    }

    /// The full set of mutable values after applying these changes to `order`.
    #[must_use]
    pub fn apply_to(&self, order: &Order) -> OrderUpdate {
        OrderUpdate {
            customer_phone: self
                .customer_phone
                .clone()
                .unwrap_or_else(|| order.customer_phone.clone()),
            customer_email: self
                .customer_email
                .clone()
                .unwrap_or_else(|| order.customer_email.clone()),
            pickup_address: self
                .pickup_address
                .clone()
                .unwrap_or_else(|| order.pickup_address.clone()),
            pickup_contact: self
                .pickup_contact
                .clone()
                .unwrap_or_else(|| order.pickup_contact.clone()),
            delivery_address: self
                .delivery_address
                .clone()
                .unwrap_or_else(|| order.delivery_address.clone()),
            delivery_contact: self
                .delivery_contact
                .clone()
                .unwrap_or_else(|| order.delivery_contact.clone()),
            status: self.status.unwrap_or(order.status),
            price: self.price.unwrap_or(order.price),
            driver_id: self.driver_id.unwrap_or(order.driver_id),
            internal_comments: self
                .internal_comments
                .clone()
                .unwrap_or_else(|| order.internal_comments.clone()),
        }
    }
}

/// Every mutable column of an order, written back in a single `UPDATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdate {
    pub customer_phone: String,
    pub customer_email: Option<Email>,
    pub pickup_address: String,
    pub pickup_contact: Option<String>,
    pub delivery_address: String,
    pub delivery_contact: Option<String>,
    pub status: OrderStatus,
    pub price: Option<Decimal>,
    pub driver_id: Option<DriverId>,
    pub internal_comments: Option<String>,
}

/// Filters for the staff order list. All set filters must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub shipping_type: Option<ShippingType>,
    /// First day included (UTC).
    pub date_from: Option<NaiveDate>,
    /// Last day included (UTC).
    pub date_to: Option<NaiveDate>,
}

impl OrderFilter {
    /// Inclusive lower bound: midnight UTC at the start of `date_from`.
    #[must_use]
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.date_from
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound: midnight UTC at the start of the day after `date_to`.
    #[must_use]
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.date_to
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// An unpriced, unassigned order placed by user 1.
    #[must_use]
    pub fn order() -> Order {
        let created = DateTime::parse_from_rfc3339("2025-03-14T09:30:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default();
        Order {
            id: OrderId::new(10),
            tracking_number: TrackingNumber::parse("HK250314Q7ZP0B")
                .unwrap_or_else(|_| TrackingNumber::generate_now()),
            customer_name: "Айгерим Садыкова".to_string(),
            customer_phone: "+77011234567".to_string(),
            customer_email: None,
            customer_id: Some(UserId::new(1)),
            shipping_type: ShippingType::Astana,
            pickup_address: "пр. Мангилик Ел, 55".to_string(),
            pickup_contact: None,
            delivery_address: "ул. Кенесары, 40".to_string(),
            delivery_contact: None,
            cargo_description: "Офисная мебель".to_string(),
            cargo_weight: Some(120.0),
            cargo_dimensions: None,
            status: OrderStatus::New,
            price: None,
            driver_id: None,
            customer_notes: None,
            internal_comments: None,
            created_at: created,
            updated_at: created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubmitted_staff_fields_are_unchanged() {
        let order = fixtures::order();
        let changes = OrderChanges {
            customer_phone: Some("+77015554433".to_string()),
            ..OrderChanges::default()
        };
        assert!(changes.changed_staff_fields(&order).is_empty());
    }

    #[test]
    fn test_resubmitted_values_are_unchanged() {
        let order = fixtures::order();
        let changes = OrderChanges {
            status: Some(OrderStatus::New),
            price: Some(None),
            driver_id: Some(None),
            internal_comments: Some(None),
            ..OrderChanges::default()
        };
        assert!(changes.changed_staff_fields(&order).is_empty());
    }

    #[test]
    fn test_changed_staff_fields_are_reported() {
        let order = fixtures::order();
        let changes = OrderChanges {
            status: Some(OrderStatus::Delivered),
            price: Some(Some(Decimal::new(15000, 0))),
            ..OrderChanges::default()
        };
        assert_eq!(changes.changed_staff_fields(&order), vec!["status", "price"]);
    }

    #[test]
    fn test_every_staff_field_is_checked() {
        let order = fixtures::order();
        let changes = OrderChanges {
            status: Some(OrderStatus::Cancelled),
            price: Some(Some(Decimal::new(5000, 0))),
            driver_id: Some(Some(DriverId::new(2))),
            internal_comments: Some(Some("Перезвонить".to_string())),
            ..OrderChanges::default()
        };
        assert_eq!(changes.changed_staff_fields(&order), STAFF_ONLY_FIELDS.to_vec());
    }

    #[test]
    fn test_apply_keeps_unsubmitted_fields() {
        let order = fixtures::order();
        let changes = OrderChanges {
            delivery_contact: Some(Some("Ерлан, +77017778899".to_string())),
            ..OrderChanges::default()
        };
        let update = changes.apply_to(&order);
        assert_eq!(update.delivery_contact.as_deref(), Some("Ерлан, +77017778899"));
        assert_eq!(update.customer_phone, order.customer_phone);
        assert_eq!(update.status, OrderStatus::New);
        assert_eq!(update.price, None);
    }

    #[test]
    fn test_apply_can_clear_nullable_fields() {
        let mut order = fixtures::order();
        order.price = Some(Decimal::new(9000, 0));
        let changes = OrderChanges {
            price: Some(None),
            ..OrderChanges::default()
        };
        assert_eq!(changes.apply_to(&order).price, None);
    }

    #[test]
    fn test_filter_date_bounds_cover_whole_days() {
        let filter = OrderFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 3, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..OrderFilter::default()
        };
        assert_eq!(
            filter.created_from().map(|d| d.to_rfc3339()),
            Some("2025-03-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            filter.created_before().map(|d| d.to_rfc3339()),
            Some("2025-04-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_filter_without_dates_has_no_bounds() {
        let filter = OrderFilter::default();
        assert!(filter.created_from().is_none());
        assert!(filter.created_before().is_none());
    }
}
