//! Best-effort order notifications.
//!
//! Delivery never blocks or fails the request that triggered it: events are
//! sent from a spawned task and failures are only logged. Without Telegram
//! configuration the message is logged at `info` instead.

use tracing::{Instrument, instrument};

use hrom_core::OrderStatus;

use crate::config::TelegramConfig;
use crate::models::order::Order;
use crate::telegram::{
    TelegramClient, build_order_created_message, build_status_changed_message,
};

/// Something staff should hear about.
#[derive(Debug, Clone)]
pub enum OrderEvent {
    /// A customer submitted a new order.
    Created(Order),
    /// A logist moved an order to a different status.
    StatusChanged {
        order: Order,
        previous: OrderStatus,
        driver_name: Option<String>,
    },
}

impl OrderEvent {
    /// Short name used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "order_created",
            Self::StatusChanged { .. } => "status_changed",
        }
    }

    #[must_use]
    pub const fn order(&self) -> &Order {
        match self {
            Self::Created(order) | Self::StatusChanged { order, .. } => order,
        }
    }

    /// Render the notification text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Created(order) => build_order_created_message(order),
            Self::StatusChanged {
                order,
                previous,
                driver_name,
            } => build_status_changed_message(order, *previous, driver_name.as_deref()),
        }
    }
}

/// Notification sink shared through application state.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    telegram: Option<TelegramClient>,
}

impl Notifier {
    /// Build a notifier from optional Telegram settings.
    ///
    /// A client that cannot be constructed disables delivery with a warning.
    #[must_use]
    pub fn new(config: Option<&TelegramConfig>) -> Self {
        let telegram = config.and_then(|config| match TelegramClient::new(config) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "Telegram client unavailable, notifications disabled");
                None
            }
        });
        Self { telegram }
    }

    /// A notifier that only logs.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { telegram: None }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.telegram.is_some()
    }

    /// Deliver `event`. Returns whether Telegram accepted the message.
    #[instrument(skip(self, event), fields(kind = event.kind(), tracking_number = %event.order().tracking_number))]
    pub async fn notify(&self, event: &OrderEvent) -> bool {
        let text = event.render();

        let Some(client) = &self.telegram else {
            tracing::info!(message = %text, "Telegram not configured, notification logged only");
            return false;
        };

        match client.send_message(&text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send Telegram notification");
                false
            }
        }
    }

    /// Deliver `event` from a background task.
    pub fn spawn(&self, event: OrderEvent) {
        let notifier = self.clone();
        let span = tracing::info_span!("notify_background");
        tokio::spawn(
            async move {
                notifier.notify(&event).await;
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::order::fixtures;

    #[tokio::test]
    async fn test_unconfigured_notifier_returns_false() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_enabled());
        assert!(!notifier.notify(&OrderEvent::Created(fixtures::order())).await);
    }

    #[test]
    fn test_render_created_mentions_tracking_number() {
        let text = OrderEvent::Created(fixtures::order()).render();
        assert!(text.contains("HK250314Q7ZP0B"));
        assert!(text.contains("Отгрузка по Астане"));
    }

    #[test]
    fn test_render_status_changed() {
        let mut order = fixtures::order();
        order.status = OrderStatus::Delivered;
        order.price = Some(Decimal::new(15000, 0));
        let text = OrderEvent::StatusChanged {
            order,
            previous: OrderStatus::InProgress,
            driver_name: Some("Серик".to_string()),
        }
        .render();
        assert!(text.contains("В пути → Доставлена"));
        assert!(text.contains("15,000 ₸"));
        assert!(text.contains("Серик"));
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(OrderEvent::Created(fixtures::order()).kind(), "order_created");
    }
}
