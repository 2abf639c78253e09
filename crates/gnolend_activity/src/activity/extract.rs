//! Fail-soft extraction of a typed transaction from one untyped indexer record.
//!
//! Any structural mismatch degrades the whole record to
//! `ExtractedTransaction::default()`; a bad record never aborts its siblings.

use crate::activity::events::ExtractedTransaction;
use serde_json::Value;
use tracing::debug;

const AMOUNT_KEYS: [&str; 3] = ["amount", "assets", "shares"];
const SHARES_KEY: &str = "shares";

/// Guarded cursor into untyped JSON. Every step yields absence instead of panicking.
#[derive(Clone, Copy)]
struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    fn new(v: &'a Value) -> Self {
        Node(Some(v))
    }

    fn key(self, k: &str) -> Self {
        Node(self.0.and_then(Value::as_object).and_then(|m| m.get(k)))
    }

    fn at(self, i: usize) -> Self {
        Node(self.0.and_then(Value::as_array).and_then(|a| a.get(i)))
    }

    fn str(self) -> Option<&'a str> {
        self.0.and_then(Value::as_str)
    }

    fn number(self) -> Option<f64> {
        self.0.and_then(Value::as_f64)
    }

    fn list(self) -> Option<&'a [Value]> {
        self.0.and_then(Value::as_array).map(Vec::as_slice)
    }
}

/// Extract a typed transaction; malformed records yield the all-default value.
pub fn extract(record: &Value) -> ExtractedTransaction {
    match try_extract(Node::new(record)) {
        Some(tx) => tx,
        None => {
            debug!(
                hash = Node::new(record).key("hash").str().unwrap_or(""),
                "malformed transaction record, using defaults"
            );
            ExtractedTransaction::default()
        }
    }
}

fn try_extract(record: Node<'_>) -> Option<ExtractedTransaction> {
    let mut tx = ExtractedTransaction {
        block_height: record.key("block_height").number()? as i64,
        hash: record.key("hash").str()?.to_string(),
        caller: record
            .key("messages")
            .at(0)
            .key("value")
            .key("caller")
            .str()?
            .to_string(),
        ..Default::default()
    };

    // Last event's type wins; the last non-zero amount across all events wins.
    for event in record.key("response").key("events").list()? {
        let event = Node::new(event);
        tx.kind = event.key("type").str()?.to_string();
        for attr in event.key("attrs").list()? {
            let attr = Node::new(attr);
            let key = attr.key("key").str()?;
            if !AMOUNT_KEYS.contains(&key) {
                continue;
            }
            let value = attr.key("value").str()?;
            if let Some(amount) = parse_amount(value) {
                tx.amount = amount;
                tx.is_amount_in_shares = key == SHARES_KEY;
            }
        }
    }
    Some(tx)
}

/// Non-zero finite amount, or `None` for values that must not overwrite a prior match.
fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0)
}
