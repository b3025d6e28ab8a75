//! Search endpoint.

use reqwest::Method;
use serde_json::Value;

use crate::endpoints::encode_index_pattern;
use crate::endpoints::request::{RequestContext, read_raw, send_request_with_retry};
use crate::error::Result;

/// Run `POST /{index}/_search` with a prepared body.
pub async fn search(ctx: &RequestContext<'_>, index: &str, body: &Value) -> Result<Value> {
    let path = format!("/{}/_search", encode_index_pattern(index));
    let url = ctx.url(&path);
    let builder = ctx.request(Method::POST, &path).json(body);
    let response = send_request_with_retry(builder, &url, ctx.max_retries).await?;
    read_raw(response, ctx.generation).await
}
