//! Blocking HTTP access to the search API.
//!
//! [`Transport`] owns one [`RateLimiter`] and one [`Fetch`] implementation and
//! is shared by every caller of a [`JobSearcher`](crate::JobSearcher), so all
//! requests follow one cadence and reuse one connection pool.

use std::time::Duration;

use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::{
    config::ClientConfig,
    error::JobPulseError,
    model::{FormatError, SUCCESS_STATUS},
};

mod fetch;
mod rate_limit;
#[cfg(test)]
pub(crate) mod scripted;

pub use error::TransportError;
pub use fetch::{Fetch, HttpFetcher};
pub use rate_limit::RateLimiter;

const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Rate-limited, retrying JSON client.
///
/// Only [`TransportError`]s are retried. API errors and undecodable bodies are
/// returned on the first occurrence.
#[derive(Debug)]
pub struct Transport<F: Fetch = HttpFetcher> {
    fetcher: F,
    limiter: RateLimiter,
    max_retries: u32,
    retry_min_wait: Duration,
    retry_max_wait: Duration,
}

impl Transport<HttpFetcher> {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::with_fetcher(HttpFetcher::new(config)?, config))
    }
}

impl<F: Fetch> Transport<F> {
    pub fn with_fetcher(fetcher: F, config: &ClientConfig) -> Self {
        Self {
            fetcher,
            limiter: RateLimiter::new(config.min_request_interval),
            max_retries: config.max_retries.max(1),
            retry_min_wait: config.retry_min_wait,
            retry_max_wait: config.retry_max_wait,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry_min_wait)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(self.retry_max_wait)
            .with_max_elapsed_time(None)
            .build()
    }

    /// GET `url` and return the raw body, retrying transport failures.
    ///
    /// Each attempt waits for the rate limiter first. After the last attempt
    /// the final failure is returned unchanged.
    #[instrument(name = "Fetch with retry", skip(self), level = "debug")]
    pub fn fetch_text(&self, url: &str) -> Result<String, TransportError> {
        let mut attempt = 0u32;
        let max_retries = self.max_retries;

        let operation = || {
            attempt += 1;
            self.limiter.wait();
            debug!(attempt, max_retries, "Sending request");
            self.fetcher.fetch(url).map_err(|err| {
                if attempt >= max_retries {
                    backoff::Error::permanent(err)
                } else {
                    backoff::Error::transient(err)
                }
            })
        };

        let notify = |err: TransportError, wait: Duration| {
            warn!(error = %err, wait_ms = wait.as_millis(), "Request failed, retrying");
        };

        backoff::retry_notify(self.backoff(), operation, notify).map_err(|err| match err {
            backoff::Error::Permanent(err) | backoff::Error::Transient { err, .. } => err,
        })
    }

    /// GET `url` and decode the body as JSON, rejecting API-level errors.
    pub fn get(&self, url: &str) -> Result<Value, JobPulseError> {
        let body = self.fetch_text(url)?;
        let value: Value = serde_json::from_str(&body).map_err(FormatError::InvalidJson)?;
        check_api_status(&value)?;
        Ok(value)
    }

    /// Close pooled connections; the next request opens new ones.
    pub fn shutdown(&self) {
        self.fetcher.shutdown();
    }
}

/// A present, non-empty `statuscode` other than the success sentinel is an
/// API error. Absence is left for the result model to judge.
fn check_api_status(value: &Value) -> Result<(), JobPulseError> {
    let status = match value.get("statuscode") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Ok(()),
    };
    if status.is_empty() || status == SUCCESS_STATUS {
        return Ok(());
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(UNKNOWN_API_ERROR)
        .to_string();

    error!(status = %status, message = %message, "API returned an error");
    Err(JobPulseError::Api { status, message })
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum TransportError {
        #[error("Request to {url} timed out")]
        Timeout { url: String },
        #[error("Request to {url} failed: {message}")]
        Network { url: String, message: String },
        #[error("Request to {url} returned HTTP {status}")]
        Status { url: String, status: u16 },
        #[error("Failed to build HTTP client: {0}")]
        Client(String),
        #[error("Failed to start I/O runtime: {0}")]
        Runtime(#[source] std::io::Error),
    }

    impl TransportError {
        pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
            if err.is_timeout() {
                Self::Timeout {
                    url: url.to_string(),
                }
            } else {
                Self::Network {
                    url: url.to_string(),
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClientConfigBuilder, error::ErrorKind, transport::scripted::ScriptedFetcher};
    use std::time::Instant;

    const URL: &str = "http://fixture.local/search";

    fn transport(fetcher: ScriptedFetcher, attempts: u32) -> Transport<ScriptedFetcher> {
        let config = ClientConfigBuilder::testing()
            .max_retries(attempts)
            .build()
            .unwrap();
        Transport::with_fetcher(fetcher, &config)
    }

    #[test]
    fn test_success_on_first_attempt() {
        let fetcher = ScriptedFetcher::new().ok(r#"{"statuscode": "1", "message": "Success"}"#);
        let transport = transport(fetcher, 3);
        let value = transport.get(URL).unwrap();
        assert_eq!(value["message"], "Success");
        assert_eq!(transport.fetcher().calls(), 1);
        assert_eq!(transport.fetcher().urls(), vec![URL.to_string()]);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let fetcher = ScriptedFetcher::new()
            .timeout()
            .network()
            .ok(r#"{"statuscode": "1", "message": "Success"}"#);
        let transport = transport(fetcher, 3);
        assert!(transport.get(URL).is_ok());
        assert_eq!(transport.fetcher().calls(), 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts_with_last_error() {
        let fetcher = ScriptedFetcher::new().timeout().timeout().network();
        let transport = transport(fetcher, 3);
        let err = transport.get(URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(
            err,
            JobPulseError::Transport(TransportError::Network { .. })
        ));
        assert_eq!(transport.fetcher().calls(), 3);
    }

    #[test]
    fn test_http_status_is_retried() {
        let fetcher = ScriptedFetcher::new()
            .status(503)
            .ok(r#"{"statuscode": "1", "message": "Success"}"#);
        let transport = transport(fetcher, 2);
        assert!(transport.get(URL).is_ok());
        assert_eq!(transport.fetcher().calls(), 2);
    }

    #[test]
    fn test_single_attempt_budget() {
        let fetcher = ScriptedFetcher::new().timeout().ok("{}");
        let transport = transport(fetcher, 1);
        assert!(matches!(
            transport.get(URL),
            Err(JobPulseError::Transport(TransportError::Timeout { .. }))
        ));
        assert_eq!(transport.fetcher().calls(), 1);
    }

    #[test]
    fn test_api_error_is_not_retried() {
        let fetcher = ScriptedFetcher::new().ok(r#"{"statuscode": "0", "message": "Invalid request"}"#);
        let transport = transport(fetcher, 3);
        match transport.get(URL) {
            Err(JobPulseError::Api { status, message }) => {
                assert_eq!(status, "0");
                assert_eq!(message, "Invalid request");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
        assert_eq!(transport.fetcher().calls(), 1);
    }

    #[test]
    fn test_api_error_without_message() {
        let fetcher = ScriptedFetcher::new().ok(r#"{"statuscode": 5}"#);
        let err = transport(fetcher, 3).get(URL).unwrap_err();
        assert!(err.to_string().contains("Unknown API error"), "{err}");
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn test_missing_or_empty_status_is_not_an_api_error() {
        for body in [r#"{"message": "Success"}"#, r#"{"statuscode": "", "message": "x"}"#, "[]"] {
            let fetcher = ScriptedFetcher::new().ok(body);
            assert!(transport(fetcher, 1).get(URL).is_ok(), "{body}");
        }
    }

    #[test]
    fn test_invalid_json_is_format_error_and_not_retried() {
        let fetcher = ScriptedFetcher::new().ok("<html>maintenance</html>").ok("{}");
        let transport = transport(fetcher, 3);
        let err = transport.get(URL).unwrap_err();
        assert!(matches!(
            err,
            JobPulseError::Format(FormatError::InvalidJson(_))
        ));
        assert_eq!(transport.fetcher().calls(), 1);
    }

    #[test]
    fn test_backoff_waits_between_attempts() {
        let config = ClientConfigBuilder::testing()
            .retry_wait(Duration::from_millis(20), Duration::from_millis(30))
            .max_retries(3)
            .build()
            .unwrap();
        let fetcher = ScriptedFetcher::new().timeout().timeout().ok("{}");
        let transport = Transport::with_fetcher(fetcher, &config);

        let started = Instant::now();
        transport.get(URL).unwrap();
        // 20ms, then 40ms capped to 30ms
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_retry_waits_are_millisecond_scale() {
        use backoff::backoff::Backoff;

        let mut backoff = transport(ScriptedFetcher::new(), 5).backoff();
        let waits: Vec<u128> = (0..5)
            .map(|_| backoff.next_backoff().unwrap().as_millis())
            .collect();
        assert_eq!(waits, vec![1, 2, 4, 5, 5]);
    }

    #[test]
    fn test_rate_limit_applies_to_every_attempt() {
        let config = ClientConfigBuilder::testing()
            .min_request_interval(Duration::from_millis(25))
            .build()
            .unwrap();
        let fetcher = ScriptedFetcher::new().ok("{}").ok("{}").ok("{}");
        let transport = Transport::with_fetcher(fetcher, &config);

        let started = Instant::now();
        for _ in 0..3 {
            transport.get(URL).unwrap();
        }
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_shutdown_reaches_fetcher() {
        let transport = transport(ScriptedFetcher::new(), 1);
        transport.shutdown();
        assert_eq!(transport.fetcher().shutdowns(), 1);
    }
}
