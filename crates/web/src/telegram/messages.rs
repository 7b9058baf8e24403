//! Message builders for order notifications.

use std::fmt::Write as _;

use hrom_core::{OrderStatus, format_tenge};

use crate::models::order::Order;

/// Escape text for Telegram's HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| placeholder.to_owned(), escape_html)
}

/// Build the message posted when a customer submits an order.
#[must_use]
pub fn build_order_created_message(order: &Order) -> String {
    let mut text = String::new();

    let _ = writeln!(
        text,
        "🚚 <b>Новая заявка #{}</b>\n",
        escape_html(order.tracking_number.as_str())
    );
    let _ = writeln!(text, "👤 <b>Клиент:</b> {}", escape_html(&order.customer_name));
    let _ = writeln!(text, "📱 <b>Телефон:</b> {}", escape_html(&order.customer_phone));
    let _ = writeln!(
        text,
        "📧 <b>Email:</b> {}\n",
        or_placeholder(
            order.customer_email.as_ref().map(hrom_core::Email::as_str),
            "Не указан"
        )
    );
    let _ = writeln!(
        text,
        "📍 <b>Тип доставки:</b> {}\n",
        order.shipping_type.label()
    );
    let _ = writeln!(
        text,
        "📦 <b>Описание груза:</b> {}",
        escape_html(&order.cargo_description)
    );
    let weight = order
        .cargo_weight
        .map_or_else(|| "Не указан".to_owned(), |w| format!("{w}"));
    let _ = writeln!(text, "⚖️ <b>Вес:</b> {weight} кг");
    let _ = writeln!(
        text,
        "📏 <b>Габариты:</b> {}\n",
        or_placeholder(order.cargo_dimensions.as_deref(), "Не указаны")
    );
    let _ = writeln!(
        text,
        "🏠 <b>Адрес погрузки:</b> {}",
        escape_html(&order.pickup_address)
    );
    let _ = writeln!(
        text,
        "🏢 <b>Адрес выгрузки:</b> {}\n",
        escape_html(&order.delivery_address)
    );
    let _ = writeln!(
        text,
        "📝 <b>Комментарии:</b> {}\n",
        or_placeholder(order.customer_notes.as_deref(), "Нет")
    );
    let _ = write!(
        text,
        "⏰ <b>Время создания:</b> {}",
        order.created_at.format("%d.%m.%Y %H:%M")
    );

    text
}

/// Build the message posted when a logist changes an order's status.
#[must_use]
pub fn build_status_changed_message(
    order: &Order,
    previous: OrderStatus,
    driver_name: Option<&str>,
) -> String {
    let price = if order.price.is_some() {
        format_tenge(order.price)
    } else {
        "Не назначена".to_owned()
    };

    let mut text = String::new();
    let _ = writeln!(
        text,
        "📊 <b>Изменение статуса заказа #{}</b>\n",
        escape_html(order.tracking_number.as_str())
    );
    let _ = writeln!(text, "👤 <b>Клиент:</b> {}", escape_html(&order.customer_name));
    let _ = writeln!(
        text,
        "📱 <b>Телефон:</b> {}\n",
        escape_html(&order.customer_phone)
    );
    let _ = writeln!(
        text,
        "📈 <b>Статус изменен:</b> {} → {}\n",
        previous.label(),
        order.status.label()
    );
    let _ = writeln!(text, "💰 <b>Цена:</b> {price}");
    let _ = write!(
        text,
        "🚛 <b>Водитель:</b> {}",
        or_placeholder(driver_name, "Не назначен")
    );

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
        assert_eq!(escape_html("ТОО \"Хром\""), "ТОО &quot;Хром&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_or_placeholder_blank_uses_placeholder() {
        assert_eq!(or_placeholder(None, "Нет"), "Нет");
        assert_eq!(or_placeholder(Some("   "), "Нет"), "Нет");
        assert_eq!(or_placeholder(Some(" <x> "), "Нет"), "&lt;x&gt;");
    }
}
