//! Blocking HTTP retrieval behind the [`Fetcher`] trait.
//!
//! The trait is the seam between the materializer and the network: the
//! production implementation is [`HttpFetcher`] (a `ureq` agent with a
//! per-request timeout), and tests swap in a recording mock so pipeline
//! logic can be exercised without sockets.
//!
//! Manifest URLs point at arbitrary third-party web hosts, so the timeout
//! is short by default — a dataset run visits thousands of hosts and must
//! not hang on any one of them. There are no retries and no auth; redirect
//! handling is whatever the transport defaults to.

use std::time::Duration;
use thiserror::Error;

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Cap on a single response body. Dataset photos are a few MB; anything
/// near this size is not an image we want.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Fetch raw bytes by URL.
///
/// `Sync` so a single fetcher can be shared across rayon workers.
pub trait Fetcher: Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production fetcher over a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        })?;

        response
            .into_body()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|err| FetchError::Body(err.to_string()))
    }
}
