//! Lending market activity feed: raw indexer records → timestamped activity entries.

mod events;
mod extract;
mod reconstruct;
#[cfg(test)]
pub(crate) mod testing;

pub use events::{ExtractedTransaction, MarketActivity};
pub use extract::extract;
pub use reconstruct::{
    decode_transactions, ActivityError, ActivityService, BlockTimeResolver, TransactionSource,
};
