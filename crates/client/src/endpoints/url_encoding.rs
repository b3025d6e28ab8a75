//! Percent-encoding of index patterns used as URL path segments.
//!
//! Index names come from user input, so characters with URL meaning must not
//! change the request path. Commas and wildcards are left intact because the
//! cluster reads `logs-*,metrics-*` as a multi-index pattern.
//!
//! # Example
//!
//! ```
//! use scope_client::endpoints::url_encoding::encode_index_pattern;
//!
//! assert_eq!(encode_index_pattern("logs-*,metrics"), "logs-*,metrics");
//! assert_eq!(encode_index_pattern("a/b"), "a%2Fb");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters encoded in an index pattern path segment.
pub const INDEX_PATTERN_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode an index name or comma-separated pattern list.
pub fn encode_index_pattern(pattern: &str) -> String {
    percent_encode(pattern.trim().as_bytes(), INDEX_PATTERN_ENCODE_SET).to_string()
}
