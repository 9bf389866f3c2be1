//! End-to-end tests against a real Infrahub instance
//!
//! Gated behind the `live-tests` feature flag and marked #[ignore] so they do
//! not run in normal CI. Settings are read from `.env`.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --features live-tests --test live_service -- --ignored --nocapture
//! ```
//!
//! # Required environment variables (.env file)
//!
//! - `INFRAHUB_URL` - Service base URL (e.g., https://infrahub.example.com)
//! - `INFRAHUB_USERNAME` - Login username
//! - `INFRAHUB_PASSWORD` - Login password
//! - `INFRAHUB_QUERY` - Stored query returning artifacts
//! - `INFRAHUB_ARTIFACT` - Artifact name for that query
//! - `INFRAHUB_BRANCH` - Branch (optional, default: main)

#![cfg(feature = "live-tests")]

mod common;

use common::{
    create_live_client, has_live_credentials, load_live_settings, load_live_settings_bad_password,
};
use infrahub_client::ErrorKind;
use serial_test::serial;

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
#[ignore]
#[serial]
async fn test_valid_credentials() {
    if !has_live_credentials() {
        eprintln!("Skipping: Infrahub settings not found in .env");
        return;
    }

    let settings = load_live_settings().unwrap();
    let client = create_live_client().unwrap();

    let token = client
        .login_with(&settings.base_url, &settings.credentials)
        .await;
    assert!(token.is_ok(), "Should log in with valid credentials: {:?}", token.err());
    assert!(!token.unwrap().as_str().is_empty());
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_invalid_password() {
    if !has_live_credentials() {
        eprintln!("Skipping: Infrahub settings not found in .env");
        return;
    }

    let settings = load_live_settings_bad_password().unwrap();
    let client = create_live_client().unwrap();

    let err = client
        .login_with(&settings.base_url, &settings.credentials)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth, "unexpected error: {err}");
    println!("Rejected as expected: {err}");
}

// ============================================================================
// Query and Download Tests
// ============================================================================

#[tokio::test]
#[ignore]
#[serial]
async fn test_query_and_download() {
    if !has_live_credentials() {
        eprintln!("Skipping: Infrahub settings not found in .env");
        return;
    }

    let settings = load_live_settings().unwrap();
    let client = create_live_client().unwrap();
    let token = client
        .login_with(&settings.base_url, &settings.credentials)
        .await
        .unwrap();

    let records = client
        .run_query(
            &settings.base_url,
            &settings.query_name,
            &settings.artifact_name,
            &settings.branch,
            "now",
            &token,
        )
        .await
        .unwrap();
    println!("Query returned {} artifact(s)", records.len());

    let temp_dir = tempfile::tempdir().unwrap();
    for record in &records {
        let dest = temp_dir.path().join(&record.id);
        let written = client
            .download_record_to_file(&settings.base_url, record, &settings.branch, "now", &token, &dest)
            .await
            .unwrap();
        println!("{} -> {written} bytes", record.id);
    }
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_unknown_artifact_exhausts_retries() {
    if !has_live_credentials() {
        eprintln!("Skipping: Infrahub settings not found in .env");
        return;
    }

    let settings = load_live_settings().unwrap();
    let client = create_live_client().unwrap();
    let token = client
        .login_with(&settings.base_url, &settings.credentials)
        .await
        .unwrap();

    let err = client
        .download_artifact(&settings.base_url, "does-not-exist-12345", &settings.branch, "", &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RetryExhausted, "unexpected error: {err}");
}
