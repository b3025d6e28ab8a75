//! Data models returned by the gateway.
//!
//! Payloads are read from already-normalized JSON; each `from_payload`
//! constructor tolerates the shape differences between cluster generations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::query::HISTOGRAM_AGG;

/// Response of the cluster's root info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Node name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_uuid: Option<String>,
    pub version: ClusterVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterVersion {
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_flavor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucene_version: Option<String>,
}

impl ClusterInfo {
    pub fn from_payload(payload: Value) -> Result<Self> {
        serde_json::from_value(payload).map_err(|e| ClientError::invalid_response("cluster info", e))
    }

    /// Reported version string, e.g. `8.11.2`.
    pub fn version_number(&self) -> &str {
        &self.version.number
    }

    /// Leading integer of the reported version string.
    pub fn major_version(&self) -> Option<u32> {
        parse_major_version(&self.version.number)
    }
}

/// Parse the leading integer component of a version string.
pub fn parse_major_version(version: &str) -> Option<u32> {
    let version = version.trim();
    let end = version
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(version.len());
    version[..end].parse().ok()
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub index: String,
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// One time-histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// Bucket start, epoch milliseconds.
    pub bucket_start: i64,
    pub count: u64,
}

/// Shaped result of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Server-side execution time in milliseconds.
    #[serde(default)]
    pub took: u64,
    pub hits: SearchHits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Vec<HistogramBucket>>,
}

impl SearchResult {
    /// Shape a normalized search response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidResponse`] if the payload has no `hits` object.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let hits_obj = payload
            .get("hits")
            .filter(|h| h.is_object())
            .ok_or_else(|| ClientError::InvalidResponse("search response has no hits".to_string()))?;

        let hits: Vec<SearchHit> = hits_obj
            .get("hits")
            .and_then(Value::as_array)
            .map(|raw| raw.iter().map(hit_from_raw).collect())
            .unwrap_or_default();

        // `{value, relation}` on newer clusters, a bare number on older ones
        let total = match hits_obj.get("total") {
            Some(Value::Object(t)) => t.get("value").and_then(Value::as_u64),
            Some(other) => other.as_u64(),
            None => None,
        }
        .unwrap_or(hits.len() as u64);

        let histogram = payload
            .pointer(&format!("/aggregations/{HISTOGRAM_AGG}/buckets"))
            .and_then(Value::as_array)
            .map(|buckets| buckets.iter().filter_map(bucket_from_raw).collect());

        Ok(Self {
            took: payload.get("took").and_then(Value::as_u64).unwrap_or(0),
            hits: SearchHits { total, hits },
            histogram,
        })
    }
}

fn hit_from_raw(raw: &Value) -> SearchHit {
    let text = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    SearchHit {
        id: text("_id"),
        index: text("_index"),
        source: raw.get("_source").cloned().unwrap_or(Value::Null),
    }
}

fn bucket_from_raw(raw: &Value) -> Option<HistogramBucket> {
    let key = raw.get("key")?;
    let bucket_start = key.as_i64().or_else(|| key.as_f64().map(|f| f as i64))?;
    Some(HistogramBucket {
        bucket_start,
        count: raw.get("doc_count").and_then(Value::as_u64).unwrap_or(0),
    })
}

/// One row of the index listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub index: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, rename = "docs.count", skip_serializing_if = "Option::is_none")]
    pub docs_count: Option<String>,
    #[serde(default, rename = "store.size", skip_serializing_if = "Option::is_none")]
    pub store_size: Option<String>,
}

impl IndexSummary {
    /// Hidden and system indices start with a dot.
    pub fn is_hidden(&self) -> bool {
        self.index.starts_with('.')
    }

    /// Read a normalized `_cat/indices` payload.
    ///
    /// Hidden indices and rows without an index name are dropped; the rest are
    /// sorted by name. A payload that is not an array yields no rows.
    pub fn list_from_payload(payload: Value) -> Vec<Self> {
        let Value::Array(rows) = payload else {
            tracing::warn!("Expected an array of indices, got a different payload shape");
            return Vec::new();
        };

        let mut indices: Vec<Self> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<Self>(row).ok())
            .filter(|summary| !summary.is_hidden())
            .collect();
        indices.sort_by(|a, b| a.index.cmp(&b.index));
        indices
    }
}

/// Outcome of an explicit connection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Node name reported by the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResult {
    pub fn verified(version: String, major_version: u32, info: &ClusterInfo) -> Self {
        Self {
            success: true,
            version: Some(version),
            major_version: Some(major_version),
            cluster_name: Some(info.cluster_name.clone()),
            name: Some(info.name.clone()),
            error: None,
        }
    }

    pub fn failed(error: &ClientError) -> Self {
        Self {
            success: false,
            version: None,
            major_version: None,
            cluster_name: None,
            name: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_major_version() {
        assert_eq!(parse_major_version("8.11.2"), Some(8));
        assert_eq!(parse_major_version("7.17.0-SNAPSHOT"), Some(7));
        assert_eq!(parse_major_version("10"), Some(10));
        assert_eq!(parse_major_version("v8"), None);
        assert_eq!(parse_major_version(""), None);
    }

    #[test]
    fn test_cluster_info_from_payload() {
        let info = ClusterInfo::from_payload(json!({
            "name": "node-1",
            "cluster_name": "prod",
            "cluster_uuid": "abc",
            "version": { "number": "9.0.1", "build_flavor": "default" },
            "tagline": "You Know, for Search"
        }))
        .unwrap();
        assert_eq!(info.major_version(), Some(9));
        assert_eq!(info.version_number(), "9.0.1");
        assert_eq!(info.cluster_name, "prod");
    }

    #[test]
    fn test_cluster_info_without_version_is_invalid() {
        let err = ClusterInfo::from_payload(json!({ "name": "n" })).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_search_result_object_total() {
        let result = SearchResult::from_payload(&json!({
            "took": 7,
            "hits": {
                "total": { "value": 1234, "relation": "eq" },
                "hits": [
                    { "_index": "logs-1", "_id": "a", "_source": { "msg": "hi" } },
                    { "_index": "logs-2", "_id": "b" }
                ]
            }
        }))
        .unwrap();
        assert_eq!(result.took, 7);
        assert_eq!(result.hits.total, 1234);
        assert_eq!(result.hits.hits[0].id, "a");
        assert_eq!(result.hits.hits[0].index, "logs-1");
        assert_eq!(result.hits.hits[0].source, json!({ "msg": "hi" }));
        assert_eq!(result.hits.hits[1].source, Value::Null);
        assert!(result.histogram.is_none());
    }

    #[test]
    fn test_search_result_numeric_total() {
        let result = SearchResult::from_payload(&json!({
            "hits": { "total": 3, "hits": [] }
        }))
        .unwrap();
        assert_eq!(result.hits.total, 3);
    }

    #[test]
    fn test_search_result_histogram() {
        let result = SearchResult::from_payload(&json!({
            "hits": { "hits": [] },
            "aggregations": { "histogram": { "buckets": [
                { "key_as_string": "2024-01-01T00:00:00.000Z", "key": 1704067200000i64, "doc_count": 4 },
                { "key": 1704069000000i64, "doc_count": 0 }
            ] } }
        }))
        .unwrap();
        assert_eq!(
            result.histogram,
            Some(vec![
                HistogramBucket { bucket_start: 1704067200000, count: 4 },
                HistogramBucket { bucket_start: 1704069000000, count: 0 },
            ])
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["histogram"][0], json!({ "bucketStart": 1704067200000i64, "count": 4 }));
    }

    #[test]
    fn test_search_result_requires_hits() {
        assert!(SearchResult::from_payload(&json!({ "error": "x" })).is_err());
    }

    #[test]
    fn test_index_listing_filters_hidden_and_sorts() {
        let indices = IndexSummary::list_from_payload(json!([
            { "index": "logs-b", "health": "green", "docs.count": "10" },
            { "index": ".kibana", "health": "green" },
            { "index": "logs-a", "status": "open", "store.size": "1kb" },
            { "health": "red" }
        ]));
        let names: Vec<&str> = indices.iter().map(|i| i.index.as_str()).collect();
        assert_eq!(names, vec!["logs-a", "logs-b"]);
        assert_eq!(indices[1].docs_count.as_deref(), Some("10"));
        assert_eq!(indices[0].store_size.as_deref(), Some("1kb"));
    }

    #[test]
    fn test_index_listing_non_array_is_empty() {
        assert!(IndexSummary::list_from_payload(json!({ "error": "nope" })).is_empty());
    }

    #[test]
    fn test_verify_result_shapes() {
        let info = ClusterInfo::from_payload(json!({
            "name": "node-1", "cluster_name": "prod", "version": { "number": "8.11.2" }
        }))
        .unwrap();
        let ok = serde_json::to_value(VerifyResult::verified("8.11.2".to_string(), 8, &info)).unwrap();
        assert_eq!(
            ok,
            json!({
                "success": true,
                "version": "8.11.2",
                "majorVersion": 8,
                "clusterName": "prod",
                "name": "node-1"
            })
        );

        let err = ClientError::InvalidResponse("boom".to_string());
        let failed = serde_json::to_value(VerifyResult::failed(&err)).unwrap();
        assert_eq!(
            failed,
            json!({ "success": false, "error": "Invalid response format: boom" })
        );
    }
}
