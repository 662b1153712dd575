use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use tokio::runtime::Runtime;
use tracing::{debug, info, instrument};

use super::TransportError;
use crate::config::ClientConfig;

/// One raw HTTP GET: the body of a 2xx response, or a transport failure.
///
/// [`Transport`](super::Transport) layers rate limiting, retries and decoding
/// on top, so implementations stay dumb.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, TransportError>;

    /// Release pooled resources. The next fetch starts afresh.
    fn shutdown(&self) {}
}

/// Blocking HTTP fetcher backed by a pooled async `reqwest` client.
///
/// The client is built on first use and reused by every call until
/// [`Fetch::shutdown`] drops it. Requests run on a private runtime with one
/// worker thread, which keeps driving pooled connections between calls, so
/// this must not be called from inside another tokio runtime.
pub struct HttpFetcher {
    runtime: Runtime,
    client: Mutex<Option<Client>>,
    timeout: Duration,
    user_agent: String,
    max_idle_connections: usize,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("max_idle_connections", &self.max_idle_connections)
            .field("connected", &self.has_client())
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("jobpulse-http")
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;

        Ok(Self {
            runtime,
            client: Mutex::new(None),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
            max_idle_connections: config.max_idle_connections,
        })
    }

    /// Whether a pooled client is currently alive.
    pub fn has_client(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn client(&self) -> Result<Client, TransportError> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        info!(
            user_agent = %self.user_agent,
            timeout = ?self.timeout,
            "Creating HTTP client"
        );
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.max_idle_connections)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        *slot = Some(client.clone());
        Ok(client)
    }
}

impl Fetch for HttpFetcher {
    #[instrument(name = "HTTP GET", skip(self), level = "debug")]
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let client = self.client()?;

        self.runtime.block_on(async {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| TransportError::from_reqwest(url, &e))?;

            let status = response.status();
            debug!(status = status.as_u16(), "Received response");
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| TransportError::from_reqwest(url, &e))
        })
    }

    fn shutdown(&self) {
        let previous = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(client) = previous else {
            return;
        };

        // Idle connections close once their tasks see the pool go away.
        self.runtime.block_on(async move {
            drop(client);
            tokio::task::yield_now().await;
        });
        info!("HTTP client closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_lazy_and_recreated_after_shutdown() {
        let fetcher = HttpFetcher::new(&ClientConfig::default()).unwrap();
        assert!(!fetcher.has_client());

        fetcher.client().unwrap();
        assert!(fetcher.has_client());

        fetcher.shutdown();
        assert!(!fetcher.has_client());

        fetcher.client().unwrap();
        assert!(fetcher.has_client());
    }

    #[test]
    fn test_shutdown_without_client_is_noop() {
        let fetcher = HttpFetcher::new(&ClientConfig::default()).unwrap();
        fetcher.shutdown();
        fetcher.shutdown();
        assert!(!fetcher.has_client());
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::new(&ClientConfig::default()).unwrap();
        let err = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/nothing"))
            .unwrap_err();
        assert!(
            matches!(
                err,
                TransportError::Network { .. } | TransportError::Timeout { .. }
            ),
            "{err:?}"
        );
    }
}
