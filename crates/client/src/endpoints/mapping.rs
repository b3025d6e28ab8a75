//! Index mapping endpoint.

use reqwest::Method;
use serde_json::Value;

use crate::endpoints::encode_index_pattern;
use crate::endpoints::request::{RequestContext, read_raw, send_request_with_retry};
use crate::error::Result;

/// Fetch `GET /{index}/_mapping`.
pub async fn get_mapping(ctx: &RequestContext<'_>, index: &str) -> Result<Value> {
    let path = format!("/{}/_mapping", encode_index_pattern(index));
    let url = ctx.url(&path);
    let builder = ctx.request(Method::GET, &path);
    let response = send_request_with_retry(builder, &url, ctx.max_retries).await?;
    read_raw(response, ctx.generation).await
}
