use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
            backoff_multiplier,
        }
    }
}

/// Why a retried operation gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation failed with an error the caller does not retry.
    Aborted(E),
    /// Every attempt failed with a retryable error.
    Exhausted { attempts: u32, last_error: E },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Aborted(e) => write!(f, "{}", e),
            RetryError::Exhausted {
                attempts,
                last_error,
            } => write!(f, "failed after {} attempts. Last error: {}", attempts, last_error),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Runs `operation` until it succeeds, fails with an error `should_retry`
/// rejects, or `max_attempts` is reached. No delay follows the last attempt.
pub async fn execute_with_retry<F, Fut, T, E, P>(
    operation: F,
    retry_config: &RetryConfig,
    operation_name: &str,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = retry_config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("✅ {} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if !should_retry(&e) => {
                warn!("❌ {} failed: {}", operation_name, e);
                return Err(RetryError::Aborted(e));
            }
            Err(e) => {
                if attempt >= max_attempts {
                    warn!(
                        "❌ {} failed on attempt {}/{}: {}",
                        operation_name, attempt, max_attempts, e
                    );
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }

                let delay = calculate_delay(attempt, retry_config);
                warn!(
                    "⏳ {} attempt {}/{} failed ({}), retrying in {:?}",
                    operation_name, attempt, max_attempts, e, delay
                );
                sleep(delay).await;
            }
        }

        attempt += 1;
    }
}

pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let exponential_delay =
        config.base_delay.as_secs_f64() * config.backoff_multiplier.powi((attempt - 1) as i32);

    // NaN and negative products clamp into [0, max_delay]
    let delay_seconds = exponential_delay
        .min(config.max_delay.as_secs_f64())
        .max(0.0);
    Duration::from_secs_f64(delay_seconds)
}
