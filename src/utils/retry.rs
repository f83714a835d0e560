//! Retry with exponential backoff for provider requests.

use std::time::Duration;
use tokio::time::sleep;

use crate::config::HttpConfig;
use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Build from the `[http]` configuration section
    pub fn from_http(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.retry_delay_ms),
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.initial_delay.as_millis() as f64
            * self
                .backoff_multiplier
                .powi(attempt.saturating_sub(1) as i32);
        let capped = exp.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped.round() as u64)
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientError {
    /// Timeout, refused connection, reset
    Network,
    /// 429 from the provider
    RateLimit,
    /// 5xx from the provider
    ServerError,
}

impl TransientError {
    /// Classify a SourceError; `None` means retrying cannot help
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::Network(_) => Some(TransientError::Network),
            SourceError::RateLimit => Some(TransientError::RateLimit),
            SourceError::Api(_) => Some(TransientError::ServerError),
            _ => None,
        }
    }
}

/// Execute an async operation, retrying transient failures
///
/// Permanent errors (not found, parse failures, bad requests) are returned
/// immediately. Transient errors are retried until `max_attempts` is reached.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    tracing::info!("Request succeeded on attempt {}", attempts);
                }
                return Ok(result);
            }
            Err(error) => {
                let Some(transient) = TransientError::from_source_error(&error) else {
                    return Err(error);
                };

                if attempts >= config.max_attempts {
                    if config.max_attempts > 1 {
                        tracing::warn!(
                            "Request failed after {} attempts: {}",
                            attempts,
                            error
                        );
                    }
                    return Err(error);
                }

                let delay = config.delay_for(attempts);
                tracing::debug!(
                    "Transient error on attempt {}: {:?}, retrying in {:?}",
                    attempts,
                    transient,
                    delay
                );
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let calls = &AtomicU32::new(0);

        let result = with_retry(fast(3), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, SourceError>("success")
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let calls = &AtomicU32::new(0);

        let result = with_retry(fast(4), || async move {
            let count = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if count < 3 {
                Err(SourceError::Network("temporary error".to_string()))
            } else {
                Ok("success")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = with_retry(fast(2), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::RateLimit)
        })
        .await;

        assert_eq!(result, Err(SourceError::RateLimit));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_returns_permanent_error() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = with_retry(fast(5), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::NotFound("DOI not found".to_string()))
        })
        .await;

        assert!(matches!(result, Err(SourceError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_error_detection() {
        assert_eq!(
            TransientError::from_source_error(&SourceError::RateLimit),
            Some(TransientError::RateLimit)
        );
        assert_eq!(
            TransientError::from_source_error(&SourceError::Network("reset".into())),
            Some(TransientError::Network)
        );
        assert!(
            TransientError::from_source_error(&SourceError::Parse("invalid json".into())).is_none()
        );
    }

    #[test]
    fn test_delay_backoff_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.delay_for(1), Duration::from_millis(100));
        assert_eq!(config.delay_for(2), Duration::from_millis(200));
        assert_eq!(config.delay_for(3), Duration::from_millis(350));
    }

    #[test]
    fn test_from_http_config() {
        let http = HttpConfig {
            max_attempts: 0,
            retry_delay_ms: 250,
            ..HttpConfig::default()
        };
        let config = RetryConfig::from_http(&http);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.initial_delay, Duration::from_millis(250));
    }
}
