//! Integration tests for Telegram notification content.

use rust_decimal::Decimal;

use hrom_core::{Email, OrderStatus, UserId};
use hrom_integration_tests::sample_order;
use hrom_web::telegram::{build_order_created_message, build_status_changed_message};

#[test]
fn test_created_message_lists_order_details() {
    let order = sample_order(Some(UserId::new(5)));
    let text = build_order_created_message(&order);

    assert!(text.starts_with("🚚 <b>Новая заявка #HK250314A1B2C3</b>"));
    assert!(text.contains("👤 <b>Клиент:</b> ТОО «Степной ветер»"));
    assert!(text.contains("📍 <b>Тип доставки:</b> Отгрузка по Казахстану"));
    assert!(text.contains("⚖️ <b>Вес:</b> 850.5 кг"));
    assert!(text.contains("📏 <b>Габариты:</b> 120×80×150"));
    assert!(text.contains("⏰ <b>Время создания:</b> 14.03.2025 09:30"));
}

#[test]
fn test_created_message_escapes_customer_input() {
    let order = sample_order(None);
    let text = build_order_created_message(&order);

    assert!(text.contains("Стройматериалы &lt;паллеты&gt;"));
    assert!(!text.contains("<паллеты>"));
}

#[test]
fn test_created_message_placeholders_for_missing_values() {
    let mut order = sample_order(None);
    order.cargo_weight = None;
    order.cargo_dimensions = None;
    let text = build_order_created_message(&order);

    assert!(text.contains("📧 <b>Email:</b> Не указан"));
    assert!(text.contains("⚖️ <b>Вес:</b> Не указан кг"));
    assert!(text.contains("📏 <b>Габариты:</b> Не указаны"));
    assert!(text.contains("📝 <b>Комментарии:</b> Нет"));
}

#[test]
fn test_created_message_shows_email_when_present() {
    let mut order = sample_order(None);
    order.customer_email = Some(Email::parse("logistics@steppe.kz").unwrap());
    let text = build_order_created_message(&order);

    assert!(text.contains("📧 <b>Email:</b> logistics@steppe.kz"));
}

#[test]
fn test_status_message_shows_transition_price_and_driver() {
    let mut order = sample_order(None);
    order.status = OrderStatus::InProgress;
    order.price = Some(Decimal::new(15000, 0));
    let text = build_status_changed_message(&order, OrderStatus::New, Some("Ерлан Ахметов"));

    assert!(text.starts_with("📊 <b>Изменение статуса заказа #HK250314A1B2C3</b>"));
    assert!(text.contains(&format!(
        "📈 <b>Статус изменен:</b> {} → {}",
        OrderStatus::New.label(),
        OrderStatus::InProgress.label()
    )));
    assert!(text.contains("💰 <b>Цена:</b> 15,000 ₸"));
    assert!(text.contains("🚛 <b>Водитель:</b> Ерлан Ахметов"));
}

#[test]
fn test_status_message_without_price_or_driver() {
    let mut order = sample_order(None);
    order.status = OrderStatus::Cancelled;
    let text = build_status_changed_message(&order, OrderStatus::New, None);

    assert!(text.contains("💰 <b>Цена:</b> Не назначена"));
    assert!(text.contains("🚛 <b>Водитель:</b> Не назначен"));
}
