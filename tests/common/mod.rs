//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::time::Duration;

use outage_sync::backoff::BackoffPolicy;
use outage_sync::client::RemoteClient;
use outage_sync::config::{ApiConfig, Config, RetryConfig, SyncConfig};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "integration-key";
pub const SITE_ID: &str = "norwich-pear-tree";
pub const CUTOFF: &str = "2022-01-01T00:00:00.000Z";

/// Retry policy with millisecond delays
pub fn fast_policy() -> BackoffPolicy {
    BackoffPolicy::new(1, Duration::from_millis(1), 2.0, 3).expect("valid policy")
}

/// Create a client pointed at the mock server
pub fn create_test_client(server: &MockServer) -> RemoteClient {
    RemoteClient::with_policy(&server.uri(), API_KEY, fast_policy(), Duration::from_secs(5))
        .expect("Failed to create test client")
}

/// Create a configuration pointed at the mock server
pub fn create_test_config(server: &MockServer) -> Config {
    Config {
        api: ApiConfig {
            base_uri: server.uri(),
            api_key: Some(API_KEY.to_string()),
            timeout_secs: 5,
        },
        sync: SyncConfig {
            site_id: SITE_ID.to_string(),
            cutoff: CUTOFF.to_string(),
        },
        retry: RetryConfig {
            first_delay: 1,
            delay_unit_ms: 1,
            factor: 2.0,
            max_retries: 3,
        },
        ..Config::default()
    }
}

/// Outages spanning the cutoff, including one for a device not at the site
pub fn sample_outages() -> Value {
    json!([
        {
            "id": "002b28fc-283c-47ec-9af2-ea287336dc1b",
            "begin": "2021-07-26T17:09:31.036Z",
            "end": "2021-08-29T00:37:42.253Z"
        },
        {
            "id": "002b28fc-283c-47ec-9af2-ea287336dc1b",
            "begin": "2022-05-23T12:21:27.377Z",
            "end": "2022-11-13T02:16:38.905Z"
        },
        {
            "id": "086b0d53-b311-4441-aaf3-935646f03d4d",
            "begin": "2022-04-08T16:32:16.215Z",
            "end": null
        },
        {
            "id": "27820d4a-1bc4-4fc1-a5f0-bcb3627e94a1",
            "begin": "2022-02-18T01:01:20.142Z",
            "end": "2022-08-15T14:34:50.366Z"
        }
    ])
}

/// Site info with two known devices
pub fn sample_site_info() -> Value {
    json!({
        "id": SITE_ID,
        "name": "Norwich Pear Tree",
        "devices": [
            {"id": "002b28fc-283c-47ec-9af2-ea287336dc1b", "name": "Battery 1"},
            {"id": "086b0d53-b311-4441-aaf3-935646f03d4d", "name": "Battery 2"}
        ]
    })
}

/// Submission expected for the sample data
pub fn expected_submission() -> Value {
    json!([
        {
            "id": "002b28fc-283c-47ec-9af2-ea287336dc1b",
            "name": "Battery 1",
            "begin": "2022-05-23T12:21:27.377Z",
            "end": "2022-11-13T02:16:38.905Z"
        },
        {
            "id": "086b0d53-b311-4441-aaf3-935646f03d4d",
            "name": "Battery 2",
            "begin": "2022-04-08T16:32:16.215Z",
            "end": null
        }
    ])
}

/// Mount the two GET endpoints with the given bodies
pub async fn mount_sources(server: &MockServer, outages: Value, site_info: Value) {
    Mock::given(method("GET"))
        .and(path("/outages"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(outages))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/site-info/{}", SITE_ID)))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(site_info))
        .mount(server)
        .await;
}
