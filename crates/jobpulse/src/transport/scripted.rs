use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::{Fetch, TransportError};

/// Fetcher that replays a fixed sequence of outcomes and records each call.
/// Once the script runs out every call times out.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<String, TransportError>>>,
    urls: Mutex<Vec<String>>,
    shutdowns: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(self, outcome: Result<String, TransportError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn ok(self, body: &str) -> Self {
        self.push(Ok(body.to_string()))
    }

    pub(crate) fn timeout(self) -> Self {
        self.push(Err(TransportError::Timeout {
            url: "scripted".to_string(),
        }))
    }

    pub(crate) fn network(self) -> Self {
        self.push(Err(TransportError::Network {
            url: "scripted".to_string(),
            message: "connection reset by peer".to_string(),
        }))
    }

    pub(crate) fn status(self, status: u16) -> Self {
        self.push(Err(TransportError::Status {
            url: "scripted".to_string(),
            status,
        }))
    }

    pub(crate) fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub(crate) fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl Fetch for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Timeout {
                    url: url.to_string(),
                })
            })
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}
