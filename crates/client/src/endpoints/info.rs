//! Cluster root info endpoint.

use reqwest::Method;
use reqwest::header::HeaderValue;
use serde_json::Value;

use crate::endpoints::request::{RequestContext, read_raw, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::generation::{PRODUCT_HEADER, PRODUCT_HEADER_VALUE};

/// Fetch `GET /`.
///
/// Generations that require it also check the `X-Elastic-Product` header, so a
/// proxy or a foreign product answering on the port fails the probe.
pub async fn info(ctx: &RequestContext<'_>) -> Result<Value> {
    let url = ctx.url("/");
    let builder = ctx.request(Method::GET, "/");
    let response = send_request_with_retry(builder, &url, ctx.max_retries).await?;

    if ctx.generation.requires_product_header()
        && response.headers().get(PRODUCT_HEADER)
            != Some(&HeaderValue::from_static(PRODUCT_HEADER_VALUE))
    {
        return Err(ClientError::InvalidResponse(format!(
            "{url} did not identify itself as {PRODUCT_HEADER_VALUE}"
        )));
    }

    read_raw(response, ctx.generation).await
}
