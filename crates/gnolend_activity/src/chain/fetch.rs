//! HTTP client with rate limiting and retries, shared by the indexer and RPC clients.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_INDEXER_URL: &str = "http://localhost:3100";
pub const DEFAULT_RPC_URL: &str = "http://localhost:26657";
pub const RATE_LIMIT_MS: u64 = 100;
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_BACKOFF_MS: u64 = 500;
pub const TIMEOUT_SECS: u64 = 30;
const MAX_BACKOFF_MS: u64 = 60_000;

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub base_url: String,
    pub rate_limit_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            rate_limit_ms: RATE_LIMIT_MS,
            max_retries: MAX_RETRIES,
            retry_backoff_ms: RETRY_BACKOFF_MS,
            timeout_secs: TIMEOUT_SECS,
        }
    }

    /// Defaults for a local tx-indexer.
    pub fn indexer() -> Self {
        Self::new(DEFAULT_INDEXER_URL)
    }

    /// Defaults for a local gno.land RPC node.
    pub fn rpc() -> Self {
        Self::new(DEFAULT_RPC_URL)
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("api error: status {0} body {1}")]
    Api(u16, String),
}

/// Rate-limited HTTP fetcher. Requests are spaced by `rate_limit_ms` and retried
/// with exponential backoff on transport errors and non-success statuses.
pub struct Fetcher {
    config: FetchConfig,
    client: reqwest::Client,
    last_request: Mutex<Option<Instant>>,
    request_count: AtomicU64,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        url::Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            client,
            last_request: Mutex::new(None),
            request_count: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn rate_limit(&self) {
        let wait = {
            let last = self
                .last_request
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let need = Duration::from_millis(self.config.rate_limit_ms);
            last.map(|prev| need.saturating_sub(prev.elapsed()))
                .unwrap_or_default()
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    pub async fn get_text(&self, path: &str) -> Result<String, FetchError> {
        self.request_text(path, None).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<String, FetchError> {
        self.request_text(path, Some(body)).await
    }

    async fn request_text(
        &self,
        path: &str,
        post_body: Option<&serde_json::Value>,
    ) -> Result<String, FetchError> {
        self.rate_limit().await;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut last_err = None;
        for attempt in 0..=self.config.max_retries {
            let res = match post_body {
                Some(body) => self.client.post(&url).json(body).send().await,
                None => self.client.get(&url).send().await,
            };
            match res {
                Ok(r) => {
                    let status = r.status();
                    match r.text().await {
                        Ok(body) if status.is_success() => {
                            self.request_count.fetch_add(1, Ordering::Relaxed);
                            debug!(%url, bytes = body.len(), "fetched");
                            return Ok(body);
                        }
                        Ok(body) => last_err = Some(FetchError::Api(status.as_u16(), body)),
                        // Truncated or reset body counts as a transport error.
                        Err(e) => last_err = Some(FetchError::Request(e)),
                    }
                }
                Err(e) => {
                    last_err = Some(FetchError::Request(e));
                }
            }
            if attempt < self.config.max_retries {
                let ms = backoff_ms(self.config.retry_backoff_ms, attempt);
                warn!(%url, attempt, ms, "retry after error");
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }
        Err(last_err.unwrap_or(FetchError::Api(0, "unknown".to_string())))
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

/// Exponential backoff for `attempt`, capped at `MAX_BACKOFF_MS`.
fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let c = FetchConfig::indexer();
        assert_eq!(c.base_url, DEFAULT_INDEXER_URL);
        assert_eq!(c.max_retries, MAX_RETRIES);
        assert_eq!(FetchConfig::rpc().base_url, DEFAULT_RPC_URL);
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = Fetcher::new(FetchConfig::new("not a url")).err();
        assert!(matches!(err, Some(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_ms(500, 0), 500);
        assert_eq!(backoff_ms(500, 3), 4_000);
        assert_eq!(backoff_ms(500, 40), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(500, 64), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(u64::MAX, u32::MAX), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(0, 70), 0);
    }

    #[test]
    fn new_fetcher_has_no_requests() {
        let f = Fetcher::new(FetchConfig::rpc()).unwrap();
        assert_eq!(f.request_count(), 0);
        assert_eq!(f.config().rate_limit_ms, RATE_LIMIT_MS);
    }
}
