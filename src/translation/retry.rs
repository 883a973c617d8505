/*!
 * Bounded retry with exponential backoff.
 *
 * The operation is attempted up to `max_attempts` times. After a failed
 * attempt `k` (0-indexed) that is not the last one, the helper sleeps for
 * `base_delay * 2^k` before trying again. No sleep follows the final attempt.
 */

use log::error;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::app_config::TranslationCommonConfig;

/// Default number of attempts
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default base backoff
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Attempt count and backoff for LLM calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1
    pub max_attempts: usize,
    /// Delay after the first failure; doubled after each further failure
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is raised to 1 if zero
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Build the policy from the translation section of the config
    pub fn from_config(config: &TranslationCommonConfig) -> Self {
        Self::new(config.retry_count as usize, Duration::from_millis(config.retry_backoff_ms))
    }

    /// Sleep duration after failed attempt `attempt` (0-indexed)
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// `op` receives the 0-indexed attempt number. Every failure is logged
    /// with `label`; the last error is returned on exhaustion.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    error!(
                        "{} attempt {}/{} failed: {}",
                        label,
                        attempt + 1,
                        self.max_attempts,
                        e
                    );

                    if attempt + 1 >= self.max_attempts {
                        error!("All {} attempts failed for {}", self.max_attempts, label);
                        return Err(e);
                    }

                    tokio::time::sleep(self.delay_for(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}
