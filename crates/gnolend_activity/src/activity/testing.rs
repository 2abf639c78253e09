//! In-memory collaborators for unit tests.

use crate::activity::{BlockTimeResolver, TransactionSource};
use crate::chain::{FetchError, ResolveError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

pub(crate) fn raw_tx(height: i64, hash: &str, kind: &str, key: &str, value: &str) -> Value {
    json!({
        "block_height": height,
        "hash": hash,
        "messages": [{ "value": { "caller": "g1caller" } }],
        "response": {
            "events": [{
                "type": kind,
                "attrs": [
                    { "key": "market_id", "value": "m1" },
                    { "key": key, "value": value }
                ]
            }]
        }
    })
}

pub(crate) fn envelope(txs: Vec<Value>) -> String {
    json!({ "data": { "getTransactions": txs } }).to_string()
}

pub(crate) struct StaticSource {
    response: Result<String, (u16, String)>,
    requested: Mutex<Vec<String>>,
}

impl StaticSource {
    pub(crate) fn ok(body: String) -> Self {
        Self {
            response: Ok(body),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(status: u16, body: &str) -> Self {
        Self {
            response: Err((status, body.to_string())),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl TransactionSource for StaticSource {
    async fn market_transactions(&self, market_id: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(market_id.to_string());
        self.response
            .clone()
            .map_err(|(status, body)| FetchError::Api(status, body))
    }
}

#[derive(Default)]
pub(crate) struct StaticTimes {
    times: HashMap<i64, String>,
    requested: Mutex<Vec<Vec<i64>>>,
}

impl StaticTimes {
    pub(crate) fn new<const N: usize>(times: [(i64, &str); N]) -> Self {
        Self {
            times: times.into_iter().map(|(h, t)| (h, t.to_string())).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requested(&self) -> Vec<Vec<i64>> {
        self.requested.lock().unwrap().clone()
    }
}

impl BlockTimeResolver for StaticTimes {
    async fn block_timestamps(&self, heights: &[i64]) -> Result<HashMap<i64, String>, ResolveError> {
        self.requested.lock().unwrap().push(heights.to_vec());
        Ok(heights
            .iter()
            .filter_map(|h| self.times.get(h).map(|t| (*h, t.clone())))
            .collect())
    }
}

pub(crate) struct FailingTimes;

impl BlockTimeResolver for FailingTimes {
    async fn block_timestamps(&self, _: &[i64]) -> Result<HashMap<i64, String>, ResolveError> {
        Err(ResolveError::InvalidResponse {
            height: 0,
            reason: "rpc unavailable".to_string(),
        })
    }
}
