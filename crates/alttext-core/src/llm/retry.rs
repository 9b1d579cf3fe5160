//! Bounded retry with a fixed delay between failed attempts.
//!
//! Every failure is retried (non-200 responses, malformed bodies, transport
//! errors) until the attempt budget is spent. The caller always gets an
//! [`AltTextOutcome`] back; exhausting the budget is a value, not an error.

use std::time::Duration;

use super::provider::{AltTextProvider, AltTextRequest};
use crate::config::RetryConfig;
use crate::error::PipelineError;

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Pause between two consecutive failed attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.attempts, Duration::from_millis(config.delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// Which kind of failure ended the last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Non-200 HTTP status
    Request,
    /// 200 with an unusable body
    ResponseFormat,
    /// No HTTP response at all
    Transport,
}

impl FailureKind {
    /// Classify a provider error.
    pub fn of(error: &PipelineError) -> Self {
        match error {
            PipelineError::Request { .. } => FailureKind::Request,
            PipelineError::ResponseFormat { .. } => FailureKind::ResponseFormat,
            _ => FailureKind::Transport,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Request => write!(f, "request failed"),
            FailureKind::ResponseFormat => write!(f, "bad response format"),
            FailureKind::Transport => write!(f, "transport error"),
        }
    }
}

/// Result of describing one (image, size) pair under a retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AltTextOutcome {
    Success {
        text: String,
        status: u16,
        attempts: u32,
    },
    Failed {
        kind: FailureKind,
        last_error: String,
        /// Last HTTP status seen, if the server answered
        status: Option<u16>,
        attempts: u32,
    },
}

impl AltTextOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AltTextOutcome::Success { .. })
    }

    /// Number of API calls made.
    pub fn attempts(&self) -> u32 {
        match self {
            AltTextOutcome::Success { attempts, .. } | AltTextOutcome::Failed { attempts, .. } => {
                *attempts
            }
        }
    }

    /// HTTP status of the final attempt, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AltTextOutcome::Success { status, .. } => Some(*status),
            AltTextOutcome::Failed { status, .. } => *status,
        }
    }
}

/// Call the provider until it succeeds or the policy's attempts run out.
///
/// Sleeps `policy.delay` between consecutive failures, never after the last.
pub async fn describe_with_retry(
    provider: &dyn AltTextProvider,
    request: &AltTextRequest,
    policy: RetryPolicy,
) -> AltTextOutcome {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match provider.describe(request).await {
            Ok(response) => {
                tracing::debug!(
                    "{} answered in {}ms (attempt {attempt}, model {}, tokens {})",
                    provider.name(),
                    response.latency_ms,
                    response.model,
                    response
                        .tokens_used
                        .map_or_else(|| "n/a".to_string(), |t| t.to_string())
                );
                return AltTextOutcome::Success {
                    text: response.text,
                    status: response.status,
                    attempts: attempt,
                };
            }
            Err(e) => {
                tracing::warn!("Attempt {attempt}/{} failed: {e}", policy.attempts);
                if attempt >= policy.attempts {
                    tracing::error!("Giving up after {attempt} attempt(s): {e}");
                    return AltTextOutcome::Failed {
                        kind: FailureKind::of(&e),
                        status: e.status_code(),
                        last_error: e.to_string(),
                        attempts: attempt,
                    };
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{AltTextResponse, ImageInput};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// Provider that replays a script of results and records call times.
    struct ScriptedProvider {
        script: Mutex<Vec<Result<AltTextResponse, PipelineError>>>,
        calls: Arc<Mutex<Vec<Instant>>>,
    }

    impl ScriptedProvider {
        fn new(mut script: Vec<Result<AltTextResponse, PipelineError>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl AltTextProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn describe(
            &self,
            _request: &AltTextRequest,
        ) -> Result<AltTextResponse, PipelineError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop()
                .expect("script exhausted")
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(60)
        }
    }

    fn ok(text: &str) -> Result<AltTextResponse, PipelineError> {
        Ok(AltTextResponse {
            text: text.to_string(),
            status: 200,
            model: "mock".to_string(),
            tokens_used: None,
            latency_ms: 1,
        })
    }

    fn rate_limited() -> Result<AltTextResponse, PipelineError> {
        Err(PipelineError::Request {
            status: 429,
            body: "slow down".to_string(),
        })
    }

    fn request() -> AltTextRequest {
        AltTextRequest::new(ImageInput::png(&[0]), 300)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try_does_not_sleep() {
        let provider = ScriptedProvider::new(vec![ok("A red bicycle.")]);
        let start = Instant::now();

        let outcome = describe_with_retry(&provider, &request(), RetryPolicy::default()).await;

        assert_eq!(
            outcome,
            AltTextOutcome::Success {
                text: "A red bicycle.".to_string(),
                status: 200,
                attempts: 1,
            }
        );
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_failures() {
        let provider = ScriptedProvider::new(vec![
            rate_limited(),
            Err(PipelineError::ResponseFormat {
                message: "no choices".to_string(),
            }),
            ok("Recovered."),
        ]);

        let outcome = describe_with_retry(&provider, &request(), RetryPolicy::default()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(outcome.status(), Some(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_makes_three_calls_one_second_apart() {
        let provider =
            ScriptedProvider::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        let calls = provider.calls.clone();
        let start = Instant::now();

        let outcome = describe_with_retry(&provider, &request(), RetryPolicy::default()).await;

        match &outcome {
            AltTextOutcome::Failed {
                kind,
                last_error,
                status,
                attempts,
            } => {
                assert_eq!(*kind, FailureKind::Request);
                assert_eq!(*status, Some(429));
                assert_eq!(*attempts, 3);
                assert!(last_error.contains("slow down"));
            }
            other => panic!("expected failure, got {other:?}"),
        }

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1] - calls[0], Duration::from_secs(1));
        assert_eq!(calls[2] - calls[1], Duration::from_secs(1));
        // No trailing sleep after the final failure
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy() {
        let provider = ScriptedProvider::new(vec![Err(PipelineError::Transport {
            message: "connection refused".to_string(),
        })]);

        let outcome = describe_with_retry(
            &provider,
            &request(),
            RetryPolicy::new(1, Duration::from_secs(1)),
        )
        .await;

        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.status(), None);
        assert!(matches!(
            outcome,
            AltTextOutcome::Failed {
                kind: FailureKind::Transport,
                ..
            }
        ));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from(&RetryConfig {
            attempts: 5,
            delay_ms: 250,
        });
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay, Duration::from_millis(250));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts, 1);
    }

    #[test]
    fn test_failure_kind_classification() {
        assert_eq!(
            FailureKind::of(&PipelineError::Request {
                status: 401,
                body: String::new()
            }),
            FailureKind::Request
        );
        assert_eq!(
            FailureKind::of(&PipelineError::ResponseFormat {
                message: String::new()
            }),
            FailureKind::ResponseFormat
        );
        assert_eq!(
            FailureKind::of(&PipelineError::Transport {
                message: String::new()
            }),
            FailureKind::Transport
        );
    }
}
