//! Common test utilities for integration tests.
//!
//! This module provides shared helpers for driving the gateway against a
//! `wiremock` cluster stand-in. All integration tests should use these
//! utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Gateways built here never retry, so every mounted mock sees exactly the
//!   requests the code under test sends
//!
//! # What this does NOT handle
//! - Test-specific assertions or test logic

use std::time::Duration;

use scope_client::{ApiGeneration, Gateway};
use scope_config::{GatewaySettings, ServerIdentity, StaticRegistry};
use wiremock::matchers::{header, method, path};

// Re-export test utilities from scope-client
#[allow(unused_imports)]
pub use scope_client::testing::{info_fixture, load_fixture};

// Re-export commonly used types for test convenience
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// `Accept` header each generation sends.
pub fn media_type(generation: ApiGeneration) -> &'static str {
    match generation {
        ApiGeneration::V7 => "application/json",
        ApiGeneration::V8 => "application/vnd.elasticsearch+json; compatible-with=8",
        ApiGeneration::V9 => "application/vnd.elasticsearch+json; compatible-with=9",
    }
}

/// Answer the info probe of `generation` with the info fixture of `major`.
#[allow(dead_code)]
pub async fn mount_info(server: &MockServer, generation: ApiGeneration, major: u32) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("accept", media_type(generation)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-elastic-product", "Elasticsearch")
                .set_body_json(info_fixture(major)),
        )
        .mount(server)
        .await;
}

/// Settings with a short timeout and no rate-limit retries.
pub fn test_settings() -> GatewaySettings {
    GatewaySettings {
        request_timeout: Duration::from_secs(5),
        max_retries: 0,
        ..GatewaySettings::default()
    }
}

/// Gateway knowing exactly one server, `prod`, at the mock server's address.
#[allow(dead_code)]
pub fn gateway_for(server: &MockServer) -> Gateway {
    gateway_with(ServerIdentity::new("prod", server.uri()))
}

#[allow(dead_code)]
pub fn gateway_with(identity: ServerIdentity) -> Gateway {
    Gateway::new(StaticRegistry::new(vec![identity]), &test_settings())
}

/// `Accept` headers of every request the mock server saw, in order.
#[allow(dead_code)]
pub async fn accept_headers(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| {
            r.headers
                .get("accept")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}
