//! Integration tests for structured exit codes.
//!
//! These tests verify that scope returns the correct exit codes
//! for different error scenarios, enabling reliable shell scripting.

mod common;

use common::{registry_for, scope_cmd, scope_cmd_with_registry};
use predicates::prelude::*;
use scope_client::testing::{info_fixture, load_fixture};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn v8_cluster() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-elastic-product", "Elasticsearch")
                .set_body_json(info_fixture(8)),
        )
        .mount(&server)
        .await;
    server
}

/// Test that a successful verify returns exit code 0 and prints the report.
#[tokio::test]
async fn test_verify_success_returns_exit_code_0() {
    let server = v8_cluster().await;
    let (_dir, registry) = registry_for(&server.uri());

    scope_cmd_with_registry(&registry)
        .args(["verify", "--server", "prod"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"version\": \"8.11.2\""))
        .stdout(predicate::str::contains("\"majorVersion\": 8"));
}

/// Test that an unknown server id returns exit code 4.
#[test]
fn test_unknown_server_returns_exit_code_4() {
    let (_dir, registry) = registry_for("http://localhost:9200");

    scope_cmd_with_registry(&registry)
        .args(["verify", "--server", "staging"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("\"success\": false"))
        .stderr(predicate::str::contains(
            "Server config not found for ID: staging",
        ));
}

/// Test that an unreachable cluster returns exit code 3.
#[test]
fn test_unreachable_cluster_returns_exit_code_3() {
    // Use a port that's unlikely to be open
    let (_dir, registry) = registry_for("http://127.0.0.1:1");

    scope_cmd_with_registry(&registry)
        .args(["indices", "--server", "prod", "--timeout", "5"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to connect to cluster at"));
}

/// Test that a blank index is rejected with exit code 5 before any request.
#[tokio::test]
async fn test_blank_index_returns_exit_code_5() {
    let server = MockServer::start().await;
    let (_dir, registry) = registry_for(&server.uri());

    scope_cmd_with_registry(&registry)
        .args(["search", "--server", "prod", "--index", " "])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("index is required"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Test that a rejected query returns exit code 5.
#[tokio::test]
async fn test_rejected_query_returns_exit_code_5() {
    let server = v8_cluster().await;
    Mock::given(method("POST"))
        .and(path("/logs/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "type": "query_shard_exception", "reason": "Failed to parse query [status:]" }
        })))
        .mount(&server)
        .await;
    let (_dir, registry) = registry_for(&server.uri());

    scope_cmd_with_registry(&registry)
        .args(["search", "--server", "prod", "--index", "logs", "-q", "status:"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Failed to parse query [status:]"));
}

/// Test that a search prints the shaped result.
#[tokio::test]
async fn test_search_prints_result() {
    let server = v8_cluster().await;
    Mock::given(method("POST"))
        .and(path("/logs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("search/logs.json")))
        .mount(&server)
        .await;
    let (_dir, registry) = registry_for(&server.uri());

    let output = scope_cmd_with_registry(&registry)
        .args(["search", "--server", "prod", "--index", "logs"])
        .assert()
        .code(0)
        .get_output()
        .stdout
        .clone();

    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["took"], 12);
    assert_eq!(result["hits"]["total"], 2);
    assert_eq!(result["hits"]["hits"][0]["id"], "a1");
}

/// Test that field listing degrades to an empty list with exit code 0.
#[test]
fn test_fields_for_unknown_server_prints_empty_list() {
    let (_dir, registry) = registry_for("http://localhost:9200");

    scope_cmd_with_registry(&registry)
        .args(["fields", "--server", "staging", "--index", "logs"])
        .assert()
        .code(0)
        .stdout(predicate::str::diff("[]\n"));
}

/// Test that an invalid timeout fails at startup with exit code 1.
#[test]
fn test_zero_timeout_returns_exit_code_1() {
    scope_cmd()
        .args(["indices", "--server", "prod", "--timeout", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timeout must be greater than 0"));
}

/// Test that a missing required argument is a usage error.
#[test]
fn test_missing_server_is_usage_error() {
    scope_cmd()
        .args(["indices"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--server"));
}
