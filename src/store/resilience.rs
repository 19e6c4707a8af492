use std::time::Duration;
use tokio::time::sleep;
use tracing::{warn, info, error};

use crate::config::RetrySettings;

/// Backoff schedule for store reads. Built from [`RetrySettings`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            backoff_multiplier: settings.backoff_multiplier,
        }
    }
}

/// Retry with exponential backoff. Always makes at least one attempt.
pub async fn retry_with_backoff<F, T, Fut, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("Operation {} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!("Operation {} failed on attempt {}: {}", operation_name, attempt, e);
                sleep(calculate_delay(config, attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                error!("Operation {} failed after {} attempts: {}", operation_name, max_attempts, e);
                return Err(e);
            }
        }
    }
}

/// Delay before retry number `attempt + 1`, capped at `max_delay`. A
/// multiplier that produces a non-finite or negative delay also yields the
/// cap.
fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
    let nanos = config.base_delay.as_nanos() as f64 * config.backoff_multiplier.powi(exponent);

    if nanos.is_finite() && nanos >= 0.0 && nanos < config.max_delay.as_nanos() as f64 {
        Duration::from_nanos(nanos as u64)
    } else {
        config.max_delay
    }
}
