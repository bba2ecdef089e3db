//! Bounded retry with backoff for network operations.

use super::HttpFailure;
use crate::config::RetrySettings;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// How 4xx responses other than 429 are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorHandling {
    /// Treat as transient and retry after the transient delay.
    Retry,
    /// Give up immediately.
    Fail,
}

/// Terminal failure of a retried operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetryError {
    #[error("{label}: gave up after {attempts} attempts ({last})")]
    Exhausted {
        label: String,
        attempts: u32,
        last: HttpFailure,
    },

    #[error("{label}: {failure}")]
    Fatal { label: String, failure: HttpFailure },
}

/// Retry loop shared by every network call.
///
/// Rate-limit responses wait for the provider's hint, capped at
/// `rate_limit_base * max_attempts`, or `rate_limit_base * attempt` without one. Server errors wait a fixed short
/// interval. Transport errors (and client errors, when retried) wait the
/// transient delay. Every failure counts toward `max_attempts`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    rate_limit_base: Duration,
    max_rate_limit_wait: Duration,
    server_error_delay: Duration,
    transient_delay: Duration,
    client_errors: ClientErrorHandling,
}

impl RetryPolicy {
    pub fn new(settings: &RetrySettings, client_errors: ClientErrorHandling) -> Self {
        let max_attempts = settings.max_attempts.max(1);
        let rate_limit_base = Duration::from_secs(settings.rate_limit_base_secs);
        Self {
            max_attempts,
            rate_limit_base,
            max_rate_limit_wait: rate_limit_base * max_attempts,
            server_error_delay: Duration::from_secs(settings.server_error_delay_secs),
            transient_delay: Duration::from_secs(settings.transient_delay_secs),
            client_errors,
        }
    }

    /// Policy for lyrics lookups: everything except success is retried.
    pub fn lyrics(settings: &RetrySettings) -> Self {
        Self::new(settings, ClientErrorHandling::Retry)
    }

    /// Policy for playlist writes: client errors are fatal, transport
    /// errors wait the server-error interval.
    pub fn playlist(settings: &RetrySettings) -> Self {
        let mut policy = Self::new(settings, ClientErrorHandling::Fail);
        policy.transient_delay = policy.server_error_delay;
        policy
    }

    /// Drop every wait; used by tests.
    pub fn without_delays(mut self) -> Self {
        self.rate_limit_base = Duration::ZERO;
        self.max_rate_limit_wait = Duration::ZERO;
        self.server_error_delay = Duration::ZERO;
        self.transient_delay = Duration::ZERO;
        self
    }

    /// Wait before the next attempt, or `None` if the failure is not retryable.
    pub fn delay_for(&self, failure: &HttpFailure, attempt: u32) -> Option<Duration> {
        match failure {
            HttpFailure::RateLimited { retry_after } => {
                let wait = match retry_after {
                    Some(hint) => (*hint).min(self.max_rate_limit_wait),
                    None => self.rate_limit_base * attempt,
                };
                Some(wait)
            }
            HttpFailure::Server(_) => Some(self.server_error_delay),
            HttpFailure::Client(_) => match self.client_errors {
                ClientErrorHandling::Retry => Some(self.transient_delay),
                ClientErrorHandling::Fail => None,
            },
            HttpFailure::Transport(_) => Some(self.transient_delay),
        }
    }

    /// Run `operation` until it succeeds, fails fatally, or runs out of attempts.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, HttpFailure>>,
    {
        let mut attempt = 1u32;
        loop {
            let failure = match operation().await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            let Some(wait) = self.delay_for(&failure, attempt) else {
                return Err(RetryError::Fatal {
                    label: label.to_string(),
                    failure,
                });
            };

            if attempt >= self.max_attempts {
                return Err(RetryError::Exhausted {
                    label: label.to_string(),
                    attempts: attempt,
                    last: failure,
                });
            }

            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {:?}",
                label, attempt, self.max_attempts, failure, wait
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn settings() -> RetrySettings {
        RetrySettings::default()
    }

    #[test]
    fn test_rate_limit_delay() {
        let policy = RetryPolicy::lyrics(&settings());
        let hinted = HttpFailure::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        };
        let unhinted = HttpFailure::RateLimited { retry_after: None };

        assert_eq!(policy.delay_for(&hinted, 2), Some(Duration::from_secs(3)));
        assert_eq!(policy.delay_for(&unhinted, 1), Some(Duration::from_secs(10)));
        assert_eq!(policy.delay_for(&unhinted, 3), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_rate_limit_hint_is_capped() {
        let policy = RetryPolicy::lyrics(&settings());
        let hour = HttpFailure::RateLimited {
            retry_after: Some(Duration::from_secs(3600)),
        };

        assert_eq!(policy.delay_for(&hour, 1), Some(Duration::from_secs(50)));
        assert_eq!(
            policy.clone().without_delays().delay_for(&hour, 1),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_boundary_specific_delays() {
        let lyrics = RetryPolicy::lyrics(&settings());
        let playlist = RetryPolicy::playlist(&settings());

        assert_eq!(lyrics.delay_for(&HttpFailure::Server(503), 1), Some(Duration::from_secs(2)));
        assert_eq!(lyrics.delay_for(&HttpFailure::Client(404), 1), Some(Duration::from_secs(5)));
        assert_eq!(playlist.delay_for(&HttpFailure::Client(404), 1), None);
        assert_eq!(
            playlist.delay_for(&HttpFailure::Transport("reset".into()), 1),
            Some(Duration::from_secs(2))
        );
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::lyrics(&settings()).without_delays();
        let calls = &AtomicU32::new(0);

        let result = policy
            .run("search", move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                match n {
                    1 => Err(HttpFailure::RateLimited { retry_after: None }),
                    2 => Err(HttpFailure::Server(500)),
                    _ => Ok(n),
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_budget() {
        let policy = RetryPolicy::lyrics(&settings()).without_delays();
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = policy
            .run("search", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HttpFailure::Transport("connection refused".into()))
            })
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 5, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_client_error_fatal_for_playlist() {
        let policy = RetryPolicy::playlist(&settings()).without_delays();
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = policy
            .run("add tracks", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HttpFailure::Client(403))
            })
            .await;

        assert_eq!(
            result,
            Err(RetryError::Fatal {
                label: "add tracks".to_string(),
                failure: HttpFailure::Client(403)
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
