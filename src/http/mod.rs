//! Shared HTTP plumbing for the lyrics and playlist clients.
//!
//! Every network call reports failures as an [`HttpFailure`], which the
//! [`RetryPolicy`] uses to decide whether and how long to wait.

mod retry;

pub use retry::{ClientErrorHandling, RetryError, RetryPolicy};

use crate::error::{LingoError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Create an HTTP client with the given request timeout.
pub fn create_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("lingo/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(LingoError::Http)
}

/// Classified failure of a single HTTP call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpFailure {
    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("server error: HTTP {0}")]
    Server(u16),

    #[error("client error: HTTP {0}")]
    Client(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

impl HttpFailure {
    /// Classify a non-success status code.
    pub fn from_status(status: StatusCode, retry_after: Option<Duration>) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            HttpFailure::RateLimited { retry_after }
        } else if status.is_server_error() {
            HttpFailure::Server(status.as_u16())
        } else {
            HttpFailure::Client(status.as_u16())
        }
    }
}

impl From<reqwest::Error> for HttpFailure {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => HttpFailure::from_status(status, None),
            None => HttpFailure::Transport(error.to_string()),
        }
    }
}

/// Pass successful responses through and classify everything else.
pub fn check_status(response: reqwest::Response) -> std::result::Result<reqwest::Response, HttpFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after);

    Err(HttpFailure::from_status(status, retry_after))
}

/// Parse a `Retry-After` header given in whole seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(
            HttpFailure::from_status(StatusCode::TOO_MANY_REQUESTS, Some(Duration::from_secs(3))),
            HttpFailure::RateLimited {
                retry_after: Some(Duration::from_secs(3))
            }
        );
        assert_eq!(
            HttpFailure::from_status(StatusCode::BAD_GATEWAY, None),
            HttpFailure::Server(502)
        );
        assert_eq!(
            HttpFailure::from_status(StatusCode::NOT_FOUND, None),
            HttpFailure::Client(404)
        );
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after(" 12 "), Some(Duration::from_secs(12)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_create_client() {
        assert!(create_client(Duration::from_secs(10)).is_ok());
    }
}
