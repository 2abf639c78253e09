//! gnolend_activity — activity feed reconstruction for gno.land lending markets.
//!
//! Pulls a market's transactions from the tx-indexer, extracts deposits,
//! withdrawals, borrows and repays from their untyped events, and stamps each
//! entry with its block time. Read-only; no signing, no on-chain writes.

pub mod activity;
pub mod api;
pub mod chain;

pub use activity::{
    extract, ActivityError, ActivityService, BlockTimeResolver, ExtractedTransaction,
    MarketActivity, TransactionSource,
};
pub use chain::{BlockTimeCache, FetchConfig, IndexerClient, RpcBlockTimes};
