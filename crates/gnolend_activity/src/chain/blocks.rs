//! Block height → timestamp resolution against a gno.land (tm2) RPC node.

use crate::activity::BlockTimeResolver;
use crate::chain::cache::BlockTimeCache;
use crate::chain::fetch::{FetchConfig, FetchError, Fetcher};
use crate::chain::normalize::{normalize_block_time, NormalizeError};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("normalize: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("invalid block response for height {height}: {reason}")]
    InvalidResponse { height: i64, reason: String },
}

/// Resolves block times one height at a time through `GET /block?height=N`,
/// optionally backed by a persistent [`BlockTimeCache`]. Cache failures are logged and
/// otherwise ignored.
pub struct RpcBlockTimes {
    fetcher: Fetcher,
    cache: Option<BlockTimeCache>,
}

impl RpcBlockTimes {
    pub fn new(config: FetchConfig, cache: Option<BlockTimeCache>) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            cache,
        })
    }

    /// Time of the block at `height`, or `None` when the node reports the block as unavailable.
    pub async fn block_time(&self, height: i64) -> Result<Option<String>, ResolveError> {
        if let Some(cache) = &self.cache {
            match cache.get(height) {
                Ok(Some(time)) => {
                    debug!(height, "block time cache hit");
                    return Ok(Some(time));
                }
                Ok(None) => {}
                Err(e) => warn!(height, error = %e, "block time cache read failed"),
            }
        }
        let body = self
            .fetcher
            .get_text(&format!("/block?height={height}"))
            .await?;
        let time = parse_block_time(height, &body)?;
        if let (Some(cache), Some(time)) = (&self.cache, &time) {
            if let Err(e) = cache.set(height, time) {
                warn!(height, error = %e, "block time cache write failed");
            }
        }
        Ok(time)
    }

    /// Resolve every distinct positive height. Heights the node does not know stay unmapped.
    pub async fn resolve(&self, heights: &[i64]) -> Result<HashMap<i64, String>, ResolveError> {
        let unique: BTreeSet<i64> = heights.iter().copied().filter(|h| *h > 0).collect();
        let mut out = HashMap::with_capacity(unique.len());
        for height in unique {
            if let Some(time) = self.block_time(height).await? {
                out.insert(height, time);
            }
        }
        info!(
            requested = heights.len(),
            resolved = out.len(),
            requests = self.fetcher.request_count(),
            "block timestamps"
        );
        Ok(out)
    }
}

impl BlockTimeResolver for RpcBlockTimes {
    async fn block_timestamps(&self, heights: &[i64]) -> Result<HashMap<i64, String>, ResolveError> {
        self.resolve(heights).await
    }
}

/// Extract the header time from a `/block` JSON-RPC response body.
pub fn parse_block_time(height: i64, body: &str) -> Result<Option<String>, ResolveError> {
    let v: Value = serde_json::from_str(body).map_err(|e| ResolveError::InvalidResponse {
        height,
        reason: e.to_string(),
    })?;
    if let Some(err) = v.get("error").filter(|e| !e.is_null()) {
        warn!(height, error = %err, "block not available");
        return Ok(None);
    }
    let time = v
        .pointer("/result/block/header/time")
        .or_else(|| v.pointer("/result/block_meta/header/time"))
        .and_then(Value::as_str)
        .ok_or_else(|| ResolveError::InvalidResponse {
            height,
            reason: "missing header time".to_string(),
        })?;
    Ok(Some(normalize_block_time(time)?))
}
