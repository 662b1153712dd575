use std::time::Duration;

use crate::error::JobPulseError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.bdjobs.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_MIN_WAIT: Duration = Duration::from_secs(1);
pub const DEFAULT_RETRY_MAX_WAIT: Duration = Duration::from_secs(10);
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_USER_AGENT: &str = "JobPulse/1.0";
pub const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 5;

const ENV_API_BASE_URL: &str = "JOBPULSE_API_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "JOBPULSE_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "JOBPULSE_MAX_RETRIES";
const ENV_MIN_REQUEST_INTERVAL_MS: &str = "JOBPULSE_MIN_REQUEST_INTERVAL_MS";

/// Settings for the HTTP side of a [`JobSearcher`](crate::JobSearcher).
///
/// Use [`ClientConfigBuilder`] to create one; `build()` rejects combinations the
/// transport cannot honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host of the search API, without a trailing slash
    pub api_base_url: String,
    /// Per-request timeout, connect through body
    pub timeout: Duration,
    /// Total attempts for a request that keeps failing at the network level
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry
    pub retry_min_wait: Duration,
    /// Upper bound for any single backoff delay
    pub retry_max_wait: Duration,
    /// Minimum spacing between the start of two requests
    pub min_request_interval: Duration,
    pub user_agent: String,
    /// Idle keep-alive connections kept per host
    pub max_idle_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_min_wait: DEFAULT_RETRY_MIN_WAIT,
            retry_max_wait: DEFAULT_RETRY_MAX_WAIT,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Defaults overlaid with any `JOBPULSE_*` environment variables.
    pub fn from_env() -> Result<Self, JobPulseError> {
        ClientConfigBuilder::from_env()?.build()
    }
}

/// Builder for [`ClientConfig`] with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the production defaults
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Create a builder for tests and local fixtures: no rate limiting and
    /// millisecond backoff so retry paths finish quickly.
    pub fn testing() -> Self {
        let mut builder = Self::new();
        builder.config.timeout = Duration::from_secs(5);
        builder.config.retry_min_wait = Duration::from_millis(1);
        builder.config.retry_max_wait = Duration::from_millis(5);
        builder.config.min_request_interval = Duration::ZERO;
        builder
    }

    /// Start from the defaults and apply the `JOBPULSE_*` environment variables
    /// that are set.
    pub fn from_env() -> Result<Self, JobPulseError> {
        let mut builder = Self::new();

        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(secs) = parse_env::<u64>(ENV_TIMEOUT_SECS)? {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = parse_env::<u32>(ENV_MAX_RETRIES)? {
            builder = builder.max_retries(attempts);
        }
        if let Some(ms) = parse_env::<u64>(ENV_MIN_REQUEST_INTERVAL_MS)? {
            builder = builder.min_request_interval(Duration::from_millis(ms));
        }
        Ok(builder)
    }

    /// Point the client at a different API host (e.g. a local fixture server)
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total number of attempts for transient failures
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.max_retries = attempts;
        self
    }

    /// Set the exponential backoff bounds
    pub fn retry_wait(mut self, min: Duration, max: Duration) -> Self {
        self.config.retry_min_wait = min;
        self.config.retry_max_wait = max;
        self
    }

    pub fn min_request_interval(mut self, interval: Duration) -> Self {
        self.config.min_request_interval = interval;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn max_idle_connections(mut self, max: usize) -> Self {
        self.config.max_idle_connections = max;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<ClientConfig, JobPulseError> {
        let config = self.config;
        if config.api_base_url.trim().is_empty() {
            return Err(JobPulseError::ConfigError(
                "API base URL must not be empty".to_string(),
            ));
        }
        if config.max_retries == 0 {
            return Err(JobPulseError::ConfigError(
                "max_retries must allow at least one attempt".to_string(),
            ));
        }
        if config.retry_min_wait > config.retry_max_wait {
            return Err(JobPulseError::ConfigError(format!(
                "retry_min_wait ({:?}) exceeds retry_max_wait ({:?})",
                config.retry_min_wait, config.retry_max_wait
            )));
        }
        if config.user_agent.trim().is_empty() {
            return Err(JobPulseError::ConfigError(
                "User agent must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, JobPulseError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| JobPulseError::ConfigError(format!("{key} has invalid value {raw:?}"))),
        Err(_) => Ok(None),
    }
}
