//! Indexer and RPC clients, block-time cache, and normalization.

mod blocks;
mod cache;
mod fetch;
mod indexer;
mod normalize;
mod query;

pub use blocks::{parse_block_time, ResolveError, RpcBlockTimes};
pub use cache::{BlockTimeCache, CacheError};
pub use fetch::{
    FetchConfig, FetchError, Fetcher, DEFAULT_INDEXER_URL, DEFAULT_RPC_URL, MAX_RETRIES,
    RATE_LIMIT_MS, RETRY_BACKOFF_MS, TIMEOUT_SECS,
};
pub use indexer::IndexerClient;
pub use normalize::{normalize_block_time, NormalizeError};
pub use query::{QueryBuilder, WhereClause, MARKET_ACTIVITY_FIELDS};
