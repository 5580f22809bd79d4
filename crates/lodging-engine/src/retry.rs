//! Bounded retry of whole transactions.

use std::future::Future;

use tracing::{debug, warn};

use lodging_core::config::BookingConfig;

use crate::error::BookingError;

/// Run `attempt` until it succeeds, fails with a non-transient error, or
/// `max_commit_attempts` is reached. Exhaustion surfaces as
/// [`BookingError::ConcurrencyConflict`].
///
/// Each call of `attempt` must open and commit its own transaction.
pub async fn with_retry<T, F, Fut>(
    config: &BookingConfig,
    operation: &'static str,
    mut attempt: F,
) -> Result<T, BookingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BookingError>>,
{
    let max_attempts = config.max_commit_attempts.max(1);
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(err) if err.is_transient() => {
                if tries >= max_attempts {
                    warn!(operation, attempts = tries, error = %err, "Giving up after repeated conflicts");
                    return Err(BookingError::ConcurrencyConflict);
                }
                let backoff = config.backoff_after(tries);
                debug!(
                    operation,
                    attempt = tries,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Transaction conflict, retrying"
                );
                tokio::time::sleep(backoff).await;
                tries += 1;
            }
            outcome => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use lodging_core::AppError;

    fn config() -> BookingConfig {
        BookingConfig {
            max_commit_attempts: 3,
            retry_backoff_ms: 1,
            ..BookingConfig::default()
        }
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&config(), "test", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(BookingError::Persistence(AppError::conflict("40001")))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_is_concurrency_conflict() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&config(), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(BookingError::Persistence(AppError::conflict("40P01")))
        })
        .await;
        assert!(matches!(result, Err(BookingError::ConcurrencyConflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&config(), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(BookingError::InvalidRoomsCount)
        })
        .await;
        assert!(matches!(result, Err(BookingError::InvalidRoomsCount)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
