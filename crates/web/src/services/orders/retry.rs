//! Bounded retry for tracking-number collisions.

use std::future::Future;

use crate::db::RepositoryError;

use super::error::OrderError;

/// Attempts made before giving up on a fresh tracking number.
pub const MAX_TRACKING_ATTEMPTS: u32 = 5;

/// Run `attempt` until it succeeds or fails with something other than a
/// uniqueness conflict, at most `max_attempts` times.
///
/// `attempt` receives the 1-based attempt number and must generate a new
/// candidate each call.
///
/// # Errors
///
/// Returns `OrderError::TrackingNumberExhausted` when every attempt
/// conflicted, or the first non-conflict error.
pub async fn retry_on_conflict<T, F, Fut>(max_attempts: u32, mut attempt: F) -> Result<T, OrderError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    for n in 1..=max_attempts {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(RepositoryError::Conflict(reason)) => {
                tracing::warn!(attempt = n, %reason, "Tracking number collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(OrderError::TrackingNumberExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[tokio::test]
    async fn test_succeeds_after_collisions() {
        let calls = Cell::new(0);
        let result = retry_on_conflict(5, |n| {
            calls.set(n);
            async move {
                if n < 3 {
                    Err(RepositoryError::Conflict("tracking number already exists".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert!(matches!(result, Ok(3)));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), _> = retry_on_conflict(MAX_TRACKING_ATTEMPTS, |n| {
            calls.set(n);
            async { Err(RepositoryError::Conflict("taken".into())) }
        })
        .await;
        assert!(matches!(
            result,
            Err(OrderError::TrackingNumberExhausted { attempts: 5 })
        ));
        assert_eq!(calls.get(), 5);
    }

    #[tokio::test]
    async fn test_other_errors_stop_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), _> = retry_on_conflict(5, |n| {
            calls.set(n);
            async { Err(RepositoryError::NotFound) }
        })
        .await;
        assert!(matches!(
            result,
            Err(OrderError::Repository(RepositoryError::NotFound))
        ));
        assert_eq!(calls.get(), 1);
    }
}
