//! Retry executor with exponential backoff
//!
//! Wraps one unit of work performing a single remote call. Transient
//! transport failures are retried up to the policy's bound with a backoff
//! delay between attempts; everything else propagates immediately. The
//! executor never swallows errors: it returns the successful value or the
//! last failure once attempts are exhausted.
//!
//! Blocking callers get the same behavior through [`crate::blocking`], which
//! drives this executor on a private runtime; the retry logic exists once.

use crate::error::{ApiError, ApiResult};
use crate::mark::Mark;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

/// Retry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy for mutating submit calls: patient, suited to throttled endpoints
    #[must_use]
    pub fn submit() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Policy for read-side queries: quick, short delays
    #[must_use]
    pub fn query() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Policy with a single attempt and no waiting
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Calculate the delay preceding a given attempt (attempt 0 is the first)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_delay =
            self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32 - 1);
        let delay_secs = base_delay.min(self.max_delay.as_secs_f64());

        let final_delay = if self.jitter {
            // Up to 25% jitter
            delay_secs * (1.0 + rand_simple() * 0.25)
        } else {
            delay_secs
        };

        Duration::from_secs_f64(final_delay)
    }
}

/// Simple pseudo-random number generator (0.0 to 1.0)
fn rand_simple() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64,
    );
    (hasher.finish() % 1000) as f64 / 1000.0
}

/// Execute a unit of work under a retry policy.
///
/// `f` is invoked once per attempt. Failures that report
/// [`ApiError::is_retryable`] are retried after the policy's delay; the rest
/// propagate immediately. On exhaustion the last failure is returned as-is —
/// the facade is responsible for adding operation context.
pub async fn run<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mark: &Mark,
    mut f: F,
) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut last_error: Option<ApiError> = None;

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.delay_for_attempt(attempt);
            debug!(
                mark = %mark,
                operation,
                attempt,
                delay_ms = delay.as_millis(),
                "retrying after delay"
            );
            tokio::time::sleep(delay).await;
        }

        trace!(mark = %mark, operation, attempt = attempt + 1, "attempt started");
        match f().await {
            Ok(value) => {
                trace!(mark = %mark, operation, attempt = attempt + 1, "attempt succeeded");
                return Ok(value);
            }
            Err(e) => {
                if e.is_retryable() && attempt + 1 < policy.max_attempts {
                    debug!(
                        mark = %mark,
                        operation,
                        attempt = attempt + 1,
                        error = %e,
                        "attempt failed, will retry"
                    );
                    last_error = Some(e);
                } else {
                    debug!(
                        mark = %mark,
                        operation,
                        attempt = attempt + 1,
                        error = %e,
                        "attempt failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }
    }

    // max_attempts >= 1 is enforced by config validation; the loop body either
    // returned or stored the error before falling through.
    Err(last_error
        .unwrap_or_else(|| ApiError::Config("retry policy allowed zero attempts".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::cell::Cell;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    fn transient() -> ApiError {
        ApiError::from(TransportError::Throttled)
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let attempts = Cell::new(0u32);
        let result = run(&fast_policy(3), "op", &Mark::new(), || {
            attempts.set(attempts.get() + 1);
            async { Ok::<_, ApiError>("ok") }
        })
        .await
        .unwrap();

        assert_eq!(result, "ok");
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test]
    async fn fails_twice_then_succeeds() {
        let attempts = Cell::new(0u32);
        let result = run(&fast_policy(3), "op", &Mark::new(), || {
            let n = attempts.get() + 1;
            attempts.set(n);
            async move {
                if n < 3 {
                    Err(transient())
                } else {
                    Ok("ok")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "ok");
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test]
    async fn exhaustion_propagates_last_failure() {
        let attempts = Cell::new(0u32);
        let result: ApiResult<()> = run(&fast_policy(4), "op", &Mark::new(), || {
            attempts.set(attempts.get() + 1);
            async { Err(transient()) }
        })
        .await;

        assert_eq!(attempts.get(), 4);
        assert!(matches!(
            result,
            Err(ApiError::Transport(TransportError::Throttled))
        ));
    }

    #[tokio::test]
    async fn non_retryable_failure_stops_immediately() {
        let attempts = Cell::new(0u32);
        let result: ApiResult<()> = run(&fast_policy(5), "op", &Mark::new(), || {
            attempts.set(attempts.get() + 1);
            async {
                Err(ApiError::Remote {
                    code: None,
                    message: "rejected".to_string(),
                })
            }
        })
        .await;

        assert_eq!(attempts.get(), 1);
        assert!(matches!(result, Err(ApiError::Remote { .. })));
    }

    #[test]
    fn delay_calculation_without_jitter() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: false,
        };

        assert_eq!(policy.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn delay_is_capped_at_max() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
            backoff_multiplier: 2.0,
            jitter: false,
        };
        assert_eq!(policy.delay_for_attempt(8), Duration::from_secs(4));
    }
}
