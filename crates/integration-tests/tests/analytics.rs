//! Integration tests for the analytics chart payload.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::NaiveDate;
use rust_decimal::Decimal;

use hrom_core::OrderStatus;
use hrom_web::models::{AnalyticsData, DailyStat, StatusCount};

#[test]
fn test_chart_payload_shape() {
    let daily = vec![
        DailyStat {
            day: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            orders: 4,
            revenue: Decimal::new(6_000_050, 2),
        },
        DailyStat {
            day: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            orders: 1,
            revenue: Decimal::ZERO,
        },
    ];
    let statuses = vec![
        StatusCount {
            status: OrderStatus::New,
            count: 3,
        },
        StatusCount {
            status: OrderStatus::Delivered,
            count: 2,
        },
    ];

    let data = AnalyticsData::from_stats(&daily, &statuses);

    assert_eq!(data.daily_orders.len(), 2);
    assert_eq!(data.daily_orders[0].date, "2025-03-01");
    assert_eq!(data.daily_orders[0].orders, 4);
    assert!((data.daily_orders[0].revenue - 60_000.5).abs() < 1e-9);
    assert_eq!(data.status_distribution[1].label, OrderStatus::Delivered.label());

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["daily_orders"][1]["date"], "2025-03-02");
    assert_eq!(json["status_distribution"][0]["status"], "new");
    assert_eq!(json["status_distribution"][0]["count"], 3);
}

#[test]
fn test_empty_window() {
    let data = AnalyticsData::from_stats(&[], &[]);
    assert!(data.daily_orders.is_empty());
    assert!(data.status_distribution.is_empty());
}
