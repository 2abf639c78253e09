//! Market activity reconstruction: query, extract, resolve block times, join.

use crate::activity::events::{ExtractedTransaction, MarketActivity};
use crate::activity::extract::extract;
use crate::chain::{FetchError, ResolveError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};

/// Source of raw `getTransactions` responses for a market.
pub trait TransactionSource {
    /// Raw response body of the market's transaction query.
    fn market_transactions(
        &self,
        market_id: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Batched block height → timestamp lookup. Heights it cannot resolve are left out of the map.
pub trait BlockTimeResolver {
    fn block_timestamps(
        &self,
        heights: &[i64],
    ) -> impl Future<Output = Result<HashMap<i64, String>, ResolveError>> + Send;
}

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error(transparent)]
    Query(#[from] FetchError),
    #[error(transparent)]
    Timestamps(#[from] ResolveError),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<EnvelopeData>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    #[serde(default, rename = "getTransactions")]
    get_transactions: Option<Vec<Value>>,
}

/// Raw records of a `{"data":{"getTransactions":[...]}}` envelope. Anything undecodable is
/// treated as zero transactions.
pub fn decode_transactions(body: &str) -> Vec<Value> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "indexer response did not decode, treating as empty");
            return Vec::new();
        }
    };
    if let Some(errors) = envelope.errors.filter(|e| !e.is_null()) {
        let first = errors.as_array().and_then(|a| a.first()).unwrap_or(&errors);
        warn!(error = %first, "indexer reported errors");
    }
    envelope
        .data
        .and_then(|d| d.get_transactions)
        .unwrap_or_default()
}

/// Builds a market's activity feed from an indexer and a block-time resolver.
pub struct ActivityService<S, R> {
    source: S,
    resolver: R,
}

impl<S, R> ActivityService<S, R>
where
    S: TransactionSource,
    R: BlockTimeResolver,
{
    pub fn new(source: S, resolver: R) -> Self {
        Self { source, resolver }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Every transaction of `market_id` in indexer order, each stamped with its block time.
    ///
    /// Fails only when the indexer query or the timestamp batch fails; malformed
    /// records are kept as default-valued entries.
    pub async fn market_activity(
        &self,
        market_id: &str,
    ) -> Result<Vec<MarketActivity>, ActivityError> {
        let body = self.source.market_transactions(market_id).await?;
        let extracted: Vec<ExtractedTransaction> =
            decode_transactions(&body).iter().map(extract).collect();

        let heights: Vec<i64> = extracted.iter().map(|tx| tx.block_height).collect();
        let timestamps = self.resolver.block_timestamps(&heights).await?;

        let activity: Vec<MarketActivity> = extracted
            .into_iter()
            .map(|tx| {
                let timestamp = timestamps
                    .get(&tx.block_height)
                    .cloned()
                    .unwrap_or_default();
                MarketActivity::from_extracted(tx, timestamp)
            })
            .collect();
        info!(
            market_id,
            count = activity.len(),
            resolved = timestamps.len(),
            "market activity"
        );
        Ok(activity)
    }
}
