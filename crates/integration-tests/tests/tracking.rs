//! Integration tests for tracking numbers and collision retry.

#![allow(clippy::unwrap_used)]

use std::cell::Cell;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hrom_core::TrackingNumber;
use hrom_web::db::RepositoryError;
use hrom_web::forms::TrackingForm;
use hrom_web::services::orders::{MAX_TRACKING_ATTEMPTS, OrderError, retry_on_conflict};

#[test]
fn test_generated_numbers_parse_back() {
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let number = TrackingNumber::generate(date, &mut rng);
        assert!(number.as_str().starts_with("HK250314"));
        assert_eq!(number.as_str().len(), TrackingNumber::LENGTH);
        assert_eq!(TrackingNumber::parse(number.as_str()).unwrap(), number);
    }
}

#[test]
fn test_lookup_input_is_normalized() {
    let form = TrackingForm {
        tracking_number: "  hk250314a1b2c3 ".to_string(),
    };
    assert_eq!(form.validate().unwrap(), "HK250314A1B2C3");
}

#[test]
fn test_lookup_input_length_bounds() {
    for input in ["", "HK25", "HK250314A1B2C3XXXXXXX"] {
        let form = TrackingForm {
            tracking_number: input.to_string(),
        };
        assert!(form.validate().is_err(), "{input:?} should be rejected");
    }
}

#[tokio::test]
async fn test_conflicts_are_retried_with_new_candidates() {
    let seen = Cell::new(0);
    let result = retry_on_conflict(MAX_TRACKING_ATTEMPTS, |attempt| {
        seen.set(attempt);
        async move {
            if attempt < 3 {
                Err(RepositoryError::Conflict("tracking_number".to_string()))
            } else {
                Ok(format!("candidate-{attempt}"))
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "candidate-3");
    assert_eq!(seen.get(), 3);
}

#[tokio::test]
async fn test_persistent_conflicts_give_up() {
    let result: Result<(), OrderError> = retry_on_conflict(MAX_TRACKING_ATTEMPTS, |_| async {
        Err(RepositoryError::Conflict("tracking_number".to_string()))
    })
    .await;

    assert!(matches!(
        result,
        Err(OrderError::TrackingNumberExhausted { attempts }) if attempts == MAX_TRACKING_ATTEMPTS
    ));
}

#[tokio::test]
async fn test_other_errors_stop_immediately() {
    let calls = Cell::new(0);
    let result: Result<(), OrderError> = retry_on_conflict(MAX_TRACKING_ATTEMPTS, |_| {
        calls.set(calls.get() + 1);
        async { Err(RepositoryError::NotFound) }
    })
    .await;

    assert!(matches!(
        result,
        Err(OrderError::Repository(RepositoryError::NotFound))
    ));
    assert_eq!(calls.get(), 1);
}
