//! Search request translation.
//!
//! Responsibilities:
//! - Define the declarative [`SearchRequest`] accepted from callers.
//! - Translate it into the cluster's query DSL: an ordered `bool.must` filter
//!   list, sort, pagination and an optional time histogram.
//!
//! Does NOT handle:
//! - Sending the request (see [`crate::endpoints::search`]).
//! - Parsing or sanitizing free-text queries: they are passed to the cluster
//!   verbatim so field:value and boolean syntax keep working.
//!
//! Invariants:
//! - The range filter, when present, always precedes the free-text filter.
//! - An empty filter list degrades to a single `match_all`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use scope_config::constants::{AUTO_HISTOGRAM_BUCKETS, DEFAULT_HISTOGRAM_BUCKETS, DEFAULT_SEARCH_SIZE};

use crate::error::QueryError;
use crate::interval::{choose_interval, parse_time_bound, widest_interval};

/// Aggregation name under which the histogram is requested and read back.
pub const HISTOGRAM_AGG: &str = "histogram";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A declarative search over one index pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub index: String,
    pub query: Option<String>,
    /// Lower time bound: RFC 3339, epoch milliseconds or date math.
    pub from: Option<String>,
    /// Upper time bound: RFC 3339, epoch milliseconds or date math.
    pub to: Option<String>,
    pub timestamp_field: Option<String>,
    pub offset: u64,
    pub size: u64,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub include_histogram: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            index: String::new(),
            query: None,
            from: None,
            to: None,
            timestamp_field: None,
            offset: 0,
            size: DEFAULT_SEARCH_SIZE,
            sort_field: None,
            sort_order: None,
            include_histogram: false,
        }
    }
}

/// Treat empty and whitespace-only strings as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl SearchRequest {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Self::default()
        }
    }

    /// Reject requests that cannot be sent.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.index.trim().is_empty() {
            return Err(QueryError::MissingField("index"));
        }
        Ok(())
    }

    /// Index pattern with surrounding whitespace removed.
    pub fn index(&self) -> &str {
        self.index.trim()
    }
}

/// Build the complete search body for a request.
///
/// Time bounds are passed to the cluster verbatim, so date math such as
/// `now-15m` is accepted. When a histogram is requested over bounds that cannot
/// be read as points in time, the widest interval is used.
pub fn build_search_body(request: &SearchRequest) -> Value {
    let timestamp_field = present(&request.timestamp_field);
    let from = present(&request.from);
    let to = present(&request.to);

    let mut must = Vec::new();
    if let Some(field) = timestamp_field
        && (from.is_some() || to.is_some())
    {
        let mut bounds = Map::new();
        if let Some(from) = from {
            bounds.insert("gte".to_string(), Value::from(from));
        }
        if let Some(to) = to {
            bounds.insert("lte".to_string(), Value::from(to));
        }
        must.push(json!({ "range": { field: bounds } }));
    }
    if let Some(query) = present(&request.query) {
        must.push(json!({ "query_string": { "query": query, "default_field": "*" } }));
    }
    if must.is_empty() {
        must.push(json!({ "match_all": {} }));
    }

    let mut body = Map::new();
    body.insert("from".to_string(), Value::from(request.offset));
    body.insert("size".to_string(), Value::from(request.size));
    body.insert("query".to_string(), json!({ "bool": { "must": must } }));

    if let Some(sort) = sort_clause(request, timestamp_field) {
        body.insert("sort".to_string(), sort);
    }

    if request.include_histogram
        && let Some(field) = timestamp_field
    {
        body.insert(
            "aggs".to_string(),
            json!({ HISTOGRAM_AGG: histogram_agg(field, from, to) }),
        );
    }

    Value::Object(body)
}

fn sort_clause(request: &SearchRequest, timestamp_field: Option<&str>) -> Option<Value> {
    let (field, order) = match present(&request.sort_field) {
        Some(field) => (field, request.sort_order.unwrap_or_default()),
        None => (timestamp_field?, SortOrder::Desc),
    };
    Some(json!([{ field: { "order": order.as_str() } }]))
}

fn histogram_agg(field: &str, from: Option<&str>, to: Option<&str>) -> Value {
    let (Some(from), Some(to)) = (from, to) else {
        return json!({
            "auto_date_histogram": { "field": field, "buckets": AUTO_HISTOGRAM_BUCKETS }
        });
    };

    let interval = match (parse_time_bound(from), parse_time_bound(to)) {
        (Some(from_ms), Some(to_ms)) => {
            choose_interval(from_ms, to_ms, DEFAULT_HISTOGRAM_BUCKETS)
        }
        _ => {
            debug!(from, to, "Time bounds are not absolute, using widest interval");
            widest_interval()
        }
    };

    json!({
        "date_histogram": {
            "field": field,
            "fixed_interval": interval,
            "extended_bounds": { "min": from, "max": to },
            "min_doc_count": 0
        }
    })
}
