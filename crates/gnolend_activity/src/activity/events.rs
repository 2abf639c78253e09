//! Extracted and published activity records.

use serde::{Deserialize, Serialize};

/// Typed view of one raw indexer transaction. `Default` is the fallback for malformed records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTransaction {
    /// Type of the last event emitted by the transaction (e.g. `Deposit`, `Borrow`).
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub caller: String,
    pub hash: String,
    pub block_height: i64,
    pub is_amount_in_shares: bool,
}

/// One entry of a market's activity feed, as served over HTTP.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub caller: String,
    pub hash: String,
    /// RFC3339 block time; empty when the height could not be resolved.
    pub timestamp: String,
    pub is_amount_in_shares: bool,
}

impl MarketActivity {
    pub fn from_extracted(tx: ExtractedTransaction, timestamp: String) -> Self {
        Self {
            kind: tx.kind,
            amount: tx.amount,
            caller: tx.caller,
            hash: tx.hash,
            timestamp,
            is_amount_in_shares: tx.is_amount_in_shares,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_json_field_names() {
        let a = MarketActivity {
            kind: "Deposit".into(),
            amount: 5.0,
            caller: "g1abc".into(),
            hash: "h1".into(),
            timestamp: "t1".into(),
            is_amount_in_shares: true,
        };
        let v = serde_json::to_value(&a).unwrap();
        let mut keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["amount", "caller", "hash", "isAmountInShares", "timestamp", "type"]
        );
        assert_eq!(v["type"], "Deposit");
        assert_eq!(v["isAmountInShares"], true);
    }

    #[test]
    fn from_extracted_drops_height() {
        let tx = ExtractedTransaction {
            kind: "Repay".into(),
            amount: 2.5,
            caller: "g1c".into(),
            hash: "h".into(),
            block_height: 42,
            is_amount_in_shares: false,
        };
        let a = MarketActivity::from_extracted(tx, "2025-03-01T12:00:05Z".into());
        assert_eq!(a.kind, "Repay");
        assert_eq!(a.amount, 2.5);
        assert_eq!(a.timestamp, "2025-03-01T12:00:05Z");
    }

    #[test]
    fn default_is_all_empty() {
        let tx = ExtractedTransaction::default();
        assert_eq!(tx.kind, "");
        assert_eq!(tx.amount, 0.0);
        assert_eq!(tx.block_height, 0);
        assert!(!tx.is_amount_in_shares);
    }
}
