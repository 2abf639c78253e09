//! tx-indexer GraphQL client.

use crate::activity::TransactionSource;
use crate::chain::fetch::{FetchConfig, FetchError, Fetcher};
use crate::chain::query::QueryBuilder;
use tracing::debug;

const GRAPHQL_PATH: &str = "/graphql/query";

pub struct IndexerClient {
    fetcher: Fetcher,
}

impl IndexerClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
        })
    }

    /// Run a query and return the raw response body.
    pub async fn execute(&self, query: &QueryBuilder) -> Result<String, FetchError> {
        debug!(operation = query.operation_name(), "indexer query");
        self.fetcher
            .post_json(GRAPHQL_PATH, &query.request_body())
            .await
    }

    pub fn request_count(&self) -> u64 {
        self.fetcher.request_count()
    }
}

impl TransactionSource for IndexerClient {
    async fn market_transactions(&self, market_id: &str) -> Result<String, FetchError> {
        self.execute(&QueryBuilder::market_activity(market_id)).await
    }
}
