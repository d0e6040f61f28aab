use crate::core::error::MarketError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries an async market operation with configurable attempts and delays.
///
/// Only transient failures (transport errors, 429, 5xx) are retried; missing
/// keys and client errors surface immediately. Total runs = 1 initial try +
/// `retries`.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, MarketError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || !err.is_transient() {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(MarketError::Upstream {
                        status: 503,
                        endpoint: "/coins/markets".into(),
                    })
                } else {
                    Ok(7u32)
                }
            },
            2,
            1,
        )
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_bounded_retries() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(MarketError::Upstream {
                    status: 500,
                    endpoint: "/search".into(),
                })
            },
            2,
            1,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(MarketError::NotFound("bitcoin.usd".into()))
            },
            3,
            1,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
