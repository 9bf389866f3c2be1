//! HTTP-level tests for `InfrahubClient`, run against a `wiremock` server.


use super::InfrahubClient;
use crate::config::{ClientConfig, RetryConfig};
use crate::types::AccessToken;
use std::time::Duration;

/// Base URL that refuses every connection
pub(super) const UNROUTABLE: &str = "http://127.0.0.1:0";

/// Client with millisecond backoff so retry tests stay fast
pub(super) fn test_client() -> InfrahubClient {
    InfrahubClient::with_config(test_config()).unwrap()
}

pub(super) fn test_config() -> ClientConfig {
    ClientConfig {
        request_timeout: Duration::from_secs(5),
        retry: RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        ..Default::default()
    }
}

pub(super) fn token() -> AccessToken {
    AccessToken::new("token123")
}

#[test]
fn new_client_uses_defaults() {
    let client = InfrahubClient::new().unwrap();
    assert_eq!(client.config().retry.max_attempts, 3);
    assert_eq!(client.config().request_timeout, Duration::from_secs(30));
}

#[test]
fn invalid_config_is_rejected() {
    let config = ClientConfig {
        request_timeout: Duration::ZERO,
        ..Default::default()
    };
    let err = InfrahubClient::with_config(config.clone()).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Config);

    let err = InfrahubClient::with_http_client(reqwest::Client::new(), config).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Config);

    let mut config = test_config();
    config.retry.backoff_multiplier = f64::INFINITY;
    let err = InfrahubClient::with_config(config).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Config);
}

#[test]
fn custom_transport_is_accepted() {
    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(1)
        .build()
        .unwrap();
    let client = InfrahubClient::with_http_client(http, test_config()).unwrap();
    assert_eq!(client.config().retry.max_attempts, 2);
}
