//! Index listing endpoint.

use reqwest::Method;
use serde_json::Value;

use crate::endpoints::request::{RequestContext, read_raw, send_request_with_retry};
use crate::error::Result;

/// Fetch `GET /_cat/indices?format=json`.
pub async fn cat_indices(ctx: &RequestContext<'_>) -> Result<Value> {
    let path = "/_cat/indices";
    let url = ctx.url(path);
    let builder = ctx.request(Method::GET, path).query(&[("format", "json")]);
    let response = send_request_with_retry(builder, &url, ctx.max_retries).await?;
    read_raw(response, ctx.generation).await
}
