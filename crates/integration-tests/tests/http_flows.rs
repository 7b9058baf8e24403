//! End-to-end HTTP tests.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`hrom-cli migrate`)
//! - The web server running (`cargo run -p hrom-web`)
//!
//! Run with: `cargo test -p hrom-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, redirect::Policy};

use hrom_integration_tests::base_url;

/// A client that keeps cookies and does not follow redirects, so tests can
/// assert on `Location`.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_endpoints() {
    let client = client();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Public order intake
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_submit_order_then_track_it() {
    let client = client();

    let resp = client
        .post(format!("{}/order/astana", base_url()))
        .form(&[
            ("customer_name", "Тестовый Заказчик"),
            ("customer_phone", "+77010000000"),
            ("pickup_address", "Астана, ул. Тестовая, 1"),
            ("delivery_address", "Астана, ул. Тестовая, 2"),
            ("cargo_description", "Коробки с документами"),
            ("cargo_weight", "12,5"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let target = location(&resp);
    assert!(target.starts_with("/track/HK"), "unexpected redirect {target}");
    assert!(target.ends_with("?success=order_created"));

    let resp = client
        .get(format!("{}{target}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Ваша заявка принята!"));
    assert!(body.contains("Новая заявка"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_order_rerenders_with_errors() {
    let resp = client()
        .post(format!("{}/order/kazakhstan", base_url()))
        .form(&[("customer_name", "Я")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Обязательное поле"));
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_unknown_shipping_type_redirects_home() {
    let resp = client()
        .get(format!("{}/order/almaty", base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?error=invalid_shipping_type");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_tracking_number_is_404() {
    let resp = client()
        .get(format!("{}/track/HK000000ZZZZZZ", base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("не найден"));
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_track_search_validates_length() {
    let resp = client()
        .post(format!("{}/track_search", base_url()))
        .form(&[("tracking_number", "HK1")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/track?error=invalid_tracking");
}

// ============================================================================
// Staff area
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_admin_requires_login() {
    let resp = client()
        .get(format!("{}/admin/orders", base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Fadmin%2Forders");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_logout_requires_login() {
    let resp = client()
        .get(format!("{}/logout", base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Flogout");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_employee_cannot_open_analytics() {
    let client = client();
    let suffix = std::process::id();
    let username = format!("it_employee_{suffix}");
    let email = format!("it_employee_{suffix}@example.com");

    let resp = client
        .post(format!("{}/register", base_url()))
        .form(&[
            ("username", username.as_str()),
            ("email", email.as_str()),
            ("full_name", "Тестовый Сотрудник"),
            ("phone", "+77010000001"),
            ("password", "correct-horse-battery"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/profile?success=registered");

    let resp = client
        .get(format!("{}/profile", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains(&username));

    let resp = client
        .get(format!("{}/admin/analytics", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin?error=access_denied");

    let resp = client
        .get(format!("{}/admin/analytics/data", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Access denied");

    let resp = client
        .get(format!("{}/logout", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?success=logged_out");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_bad_login_is_rejected() {
    let resp = client()
        .post(format!("{}/login", base_url()))
        .form(&[("username", "nobody"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Неверное имя пользователя или пароль")
    );
}
