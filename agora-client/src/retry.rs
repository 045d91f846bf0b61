use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ClientError;

/// Exponential backoff with jitter, applied around any retryable client
/// call. Not grounded on a prior-art crate in the pack — nothing here
/// wraps an HTTP call with its own retry loop — so this is built directly
/// from first principles to the documented contract: `base * 2^attempt`,
/// capped, then perturbed by a symmetric jitter fraction.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.saturating_mul(1u32 << attempt.min(20));
        let capped = exponential.min(self.max_delay);

        let jitter_fraction = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        let millis = capped.as_millis() as f64 * (1.0 + jitter_fraction);
        Duration::from_millis(millis.max(0.0) as u64)
    }

    /// Runs `attempt` until it succeeds, returns a non-retryable error, or
    /// the attempt budget is exhausted.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut last_err = None;
        for n in 0..self.max_attempts {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && n + 1 < self.max_attempts => {
                    tracing::debug!(attempt = n, delay = ?self.delay_for(n), "retrying after retryable error: {err}");
                    tokio::time::sleep(self.delay_for(n)).await;
                    last_err = Some(err);
                }
                Err(err) => {
                    return Err(match last_err {
                        None => err,
                        Some(_) => ClientError::RetriesExhausted {
                            attempts: n + 1,
                            last: Box::new(err),
                        },
                    });
                }
            }
        }
        unreachable!("loop always returns before exhausting max_attempts iterations")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn succeeds_without_retrying_on_the_first_try() {
        let config = RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter: 0.0,
        };
        let calls = AtomicU32::new(0);
        let result = config
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ClientError>(42) }
            })
            .await
            .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_a_retryable_error_until_it_succeeds() {
        let config = RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter: 0.0,
        };
        let calls = AtomicU32::new(0);
        let result = config
            .run(|| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(ClientError::Api {
                            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                            message: "busy".to_string(),
                        })
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_return_immediately() {
        let config = RetryConfig::default();
        let calls = AtomicU32::new(0);
        let result: Result<(), ClientError> = config
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ClientError::Api {
                        status: reqwest::StatusCode::NOT_FOUND,
                        message: "missing".to_string(),
                    })
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausting_the_budget_surfaces_retries_exhausted() {
        let config = RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            jitter: 0.0,
        };
        let result: Result<(), ClientError> = config
            .run(|| async {
                Err(ClientError::Api {
                    status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                    message: "busy".to_string(),
                })
            })
            .await;
        match result {
            Err(ClientError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }
}
