//! GraphQL query construction for the tx-indexer `getTransactions` endpoint.

/// Fields needed to reconstruct market activity: hash, height, the `MsgCall`
/// caller and every emitted `GnoEvent` with its attributes.
pub const MARKET_ACTIVITY_FIELDS: &str = r#"hash
          block_height
          messages {
            value {
              ... on MsgCall {
                caller
              }
            }
          }
          response {
            events {
              ... on GnoEvent {
                type
                attrs {
                  key
                  value
                }
              }
            }
          }"#;

/// Filter conditions of a `getTransactions` query. Event conditions are nested
/// under `response.events.GnoEvent`.
#[derive(Clone, Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    event_conditions: Vec<String>,
}

impl WhereClause {
    pub fn success(mut self, success: bool) -> Self {
        self.conditions.push(format!("success: {{ eq: {success} }}"));
        self
    }

    /// Exclusive height bounds (`gt` / `lt`). No condition is added when both are `None`.
    pub fn block_height_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        let bounds: Vec<String> = [("gt", min), ("lt", max)]
            .into_iter()
            .filter_map(|(op, v)| v.map(|v| format!("{op}: {v}")))
            .collect();
        if !bounds.is_empty() {
            self.conditions
                .push(format!("block_height: {{ {} }}", bounds.join(", ")));
        }
        self
    }

    pub fn event_type(mut self, event_type: &str) -> Self {
        self.event_conditions
            .push(format!("type: {{ eq: {} }}", quote(event_type)));
        self
    }

    pub fn market_id(mut self, market_id: &str) -> Self {
        self.event_conditions.push(format!(
            "attrs: {{ key: {{ eq: \"market_id\" }}, value: {{ eq: {} }} }}",
            quote(market_id)
        ));
        self
    }

    pub fn build(&self) -> String {
        let mut all = self.conditions.clone();
        if !self.event_conditions.is_empty() {
            all.push(format!(
                "response: {{\n            events: {{\n              GnoEvent: {{\n                {}\n              }}\n            }}\n          }}",
                self.event_conditions.join("\n                ")
            ));
        }
        all.join("\n          ")
    }
}

#[derive(Clone, Debug)]
pub struct QueryBuilder {
    operation_name: String,
    fields: String,
    filter: WhereClause,
}

impl QueryBuilder {
    pub fn new(operation_name: impl Into<String>, fields: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            fields: fields.into(),
            filter: WhereClause::default(),
        }
    }

    /// Query for every transaction that emitted an event tagged with `market_id`.
    pub fn market_activity(market_id: &str) -> Self {
        Self::new("getMarketActivity", MARKET_ACTIVITY_FIELDS).filter(|w| w.market_id(market_id))
    }

    pub fn filter(mut self, f: impl FnOnce(WhereClause) -> WhereClause) -> Self {
        self.filter = f(self.filter);
        self
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn build(&self) -> String {
        format!(
            "query {} {{\n  getTransactions(\n    where: {{\n          {}\n    }}\n  ) {{\n          {}\n  }}\n}}",
            self.operation_name,
            self.filter.build(),
            self.fields
        )
    }

    /// JSON body for `POST /graphql/query`.
    pub fn request_body(&self) -> serde_json::Value {
        serde_json::json!({
            "query": self.build(),
            "operationName": self.operation_name,
        })
    }
}

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
