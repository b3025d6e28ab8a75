//! Supported wire-protocol generations.
//!
//! Each major version of the cluster expects slightly different request
//! headers and the legacy generation reports responses inside a transport
//! envelope. The set is closed: only the generations listed here are probed.

use std::fmt;

use reqwest::header::HeaderValue;

/// Product name the newer generations require in `X-Elastic-Product`.
pub const PRODUCT_HEADER_VALUE: &str = "Elasticsearch";

/// Header carrying the product check.
pub const PRODUCT_HEADER: &str = "x-elastic-product";

/// A client generation tied to one cluster major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiGeneration {
    V7,
    V8,
    V9,
}

impl ApiGeneration {
    /// Order in which generations are probed when no hint applies.
    ///
    /// Only affects worst-case detection latency: a cluster reports exactly
    /// one version, whichever generation reaches it first.
    pub const PROBE_ORDER: [ApiGeneration; 3] =
        [ApiGeneration::V8, ApiGeneration::V7, ApiGeneration::V9];

    pub const fn major(self) -> u32 {
        match self {
            ApiGeneration::V7 => 7,
            ApiGeneration::V8 => 8,
            ApiGeneration::V9 => 9,
        }
    }

    pub fn from_major(major: u32) -> Option<Self> {
        match major {
            7 => Some(ApiGeneration::V7),
            8 => Some(ApiGeneration::V8),
            9 => Some(ApiGeneration::V9),
            _ => None,
        }
    }

    /// Media type sent in both `Accept` and `Content-Type`.
    pub fn media_type(self) -> HeaderValue {
        match self {
            ApiGeneration::V7 => HeaderValue::from_static("application/json"),
            ApiGeneration::V8 => {
                HeaderValue::from_static("application/vnd.elasticsearch+json; compatible-with=8")
            }
            ApiGeneration::V9 => {
                HeaderValue::from_static("application/vnd.elasticsearch+json; compatible-with=9")
            }
        }
    }

    /// Whether raw responses come wrapped in `{body, statusCode, headers, warnings}`.
    pub const fn wraps_responses(self) -> bool {
        matches!(self, ApiGeneration::V7)
    }

    /// Whether the info probe must see `X-Elastic-Product: Elasticsearch`.
    pub const fn requires_product_header(self) -> bool {
        !matches!(self, ApiGeneration::V7)
    }
}

impl fmt::Display for ApiGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.major())
    }
}
