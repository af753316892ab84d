//! Timeout and retry policy applied to every tool invocation.

use std::future::Future;
use std::time::Duration;

use super::config::ConfigError;
use super::ToolFailure;

/// Hard ceiling on retries regardless of configuration.
pub const MAX_RETRIES_CEILING: u32 = 2;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Per-call time bound plus bounded exponential backoff for unreachable
/// providers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPolicy {
    /// Bound on a single attempt
    pub timeout: Duration,
    /// Retries after the first attempt, only for `Unreachable`
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub backoff_multiplier: f32,
    pub max_backoff: Duration,
}

impl Default for ToolPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_secs(4),
        }
    }
}

impl ToolPolicy {
    /// Load the policy from environment variables.
    ///
    /// Optional:
    /// - `LARDER_TOOL_TIMEOUT_SECS`: per-attempt timeout (default: 20)
    /// - `LARDER_TOOL_MAX_RETRIES`: retries for unreachable providers (default: 2, max: 2)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut policy = Self::default();

        if let Ok(value) = std::env::var("LARDER_TOOL_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "LARDER_TOOL_TIMEOUT_SECS".to_string(),
                value: value.clone(),
            })?;
            policy.timeout = Duration::from_secs(secs.max(1));
        }

        if let Ok(value) = std::env::var("LARDER_TOOL_MAX_RETRIES") {
            let retries: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "LARDER_TOOL_MAX_RETRIES".to_string(),
                value: value.clone(),
            })?;
            policy.max_retries = retries;
        }

        Ok(policy.clamped())
    }

    /// Builder-style timeout override.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style retry override, clamped to [`MAX_RETRIES_CEILING`].
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self.clamped()
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    fn clamped(mut self) -> Self {
        self.max_retries = self.max_retries.min(MAX_RETRIES_CEILING);
        self
    }

    /// Delay before retry number `attempt + 1` (attempt is 0-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(attempt as i32);
        let delay_ms = (self.initial_backoff.as_millis() as f32 * factor) as u64;
        Duration::from_millis(delay_ms).min(self.max_backoff)
    }
}

/// Run one tool operation under the policy.
///
/// Each attempt is bounded by `policy.timeout`; a timeout counts as
/// `Unreachable`. Only `Unreachable` is retried, with exponential backoff,
/// up to `policy.max_retries` times. `Rejected` and `MalformedResponse`
/// return immediately.
pub async fn invoke_with_policy<T, Op, Fut>(
    operation: &str,
    policy: &ToolPolicy,
    mut call: Op,
) -> Result<T, ToolFailure>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ToolFailure>>,
{
    let mut attempt: u32 = 0;

    loop {
        let outcome = match tokio::time::timeout(policy.timeout, call(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(ToolFailure::Unreachable(format!(
                "{} timed out after {:?}",
                operation, policy.timeout
            ))),
        };

        match outcome {
            Ok(value) => {
                if attempt > 0 {
                    tracing::debug!(operation, attempt, "Tool call succeeded after retry");
                }
                return Ok(value);
            }
            Err(failure) if failure.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.backoff_delay(attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    "Tool unreachable, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(failure) => {
                tracing::warn!(operation, attempt, error = %failure, "Tool call failed");
                return Err(failure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn fast_policy() -> ToolPolicy {
        ToolPolicy::default()
            .with_timeout(Duration::from_millis(50))
            .with_backoff(Duration::from_millis(1), Duration::from_millis(4))
    }

    #[test]
    fn test_backoff_progression_and_cap() {
        let policy = ToolPolicy {
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(250),
            backoff_multiplier: 2.0,
            ..ToolPolicy::default()
        };
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(250));
    }

    #[test]
    fn test_retries_are_clamped() {
        let policy = ToolPolicy::default().with_max_retries(10);
        assert_eq!(policy.max_retries, MAX_RETRIES_CEILING);
    }

    #[tokio::test]
    async fn test_unreachable_is_retried_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = invoke_with_policy("lookup", &fast_policy(), move |_| {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(ToolFailure::Unreachable("connection refused".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unreachable_exhausts_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = invoke_with_policy("lookup", &fast_policy(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(ToolFailure::Unreachable("down".into())) }
        })
        .await;

        assert!(matches!(result, Err(ToolFailure::Unreachable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1 + DEFAULT_MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_rejected_and_malformed_are_not_retried() {
        for failure in [
            ToolFailure::Rejected {
                status: Some(429),
                message: "quota".into(),
            },
            ToolFailure::MalformedResponse("not json".into()),
        ] {
            let calls = Arc::new(AtomicU32::new(0));
            let counter = calls.clone();
            let expected = failure.clone();

            let result: Result<(), _> =
                invoke_with_policy("complete", &fast_policy(), move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let failure = failure.clone();
                    async move { Err(failure) }
                })
                .await;

            assert_eq!(result, Err(expected));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let policy = fast_policy().with_max_retries(0);
        let result: Result<(), _> = invoke_with_policy("lookup", &policy, |_| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        match result {
            Err(ToolFailure::Unreachable(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
