//! Test configuration helpers for loading .env settings and creating live clients

use infrahub_client::{ClientConfig, Credentials, InfrahubClient, RetryConfig};
use std::time::Duration;

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Settings for a reachable Infrahub instance
#[derive(Debug, Clone)]
pub struct LiveSettings {
    pub base_url: String,
    pub credentials: Credentials,
    pub query_name: String,
    pub artifact_name: String,
    pub branch: String,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError(format!("{name} not set in environment")))
}

/// Load live service settings from environment variables
///
/// Required environment variables:
/// - `INFRAHUB_URL` - Service base URL
/// - `INFRAHUB_USERNAME` - Login username
/// - `INFRAHUB_PASSWORD` - Login password
/// - `INFRAHUB_QUERY` - Name of a stored query returning artifacts
/// - `INFRAHUB_ARTIFACT` - Artifact name passed to that query
///
/// Optional environment variables:
/// - `INFRAHUB_BRANCH` - Branch to read (default: main)
pub fn load_live_settings() -> Result<LiveSettings, ConfigError> {
    dotenvy::dotenv().ok();

    let base_url = required("INFRAHUB_URL")?;
    let username = required("INFRAHUB_USERNAME")?;
    let password = required("INFRAHUB_PASSWORD")?;
    let query_name = required("INFRAHUB_QUERY")?;
    let artifact_name = required("INFRAHUB_ARTIFACT")?;
    let branch = std::env::var("INFRAHUB_BRANCH").unwrap_or_else(|_| "main".to_string());

    Ok(LiveSettings {
        base_url,
        credentials: Credentials::new(username, password),
        query_name,
        artifact_name,
        branch,
    })
}

/// Load settings with an invalid password for auth failure tests
pub fn load_live_settings_bad_password() -> Result<LiveSettings, ConfigError> {
    let mut settings = load_live_settings()?;
    settings.credentials.password = "invalid_password_12345".to_string();
    Ok(settings)
}

/// Create a client tuned for a live instance
pub fn create_live_client() -> Result<InfrahubClient, ConfigError> {
    let config = ClientConfig {
        request_timeout: Duration::from_secs(30),
        retry: RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        },
        ..Default::default()
    };
    InfrahubClient::with_config(config).map_err(|e| ConfigError(e.to_string()))
}

/// Check if live settings are available
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    [
        "INFRAHUB_URL",
        "INFRAHUB_USERNAME",
        "INFRAHUB_PASSWORD",
        "INFRAHUB_QUERY",
        "INFRAHUB_ARTIFACT",
    ]
    .iter()
    .all(|name| std::env::var(name).is_ok())
}
