//! Infrahub service client split into focused submodules.
//!
//! The `InfrahubClient` struct and its methods are organized by endpoint:
//! - [`auth`] - Login (`POST /api/auth/login`)
//! - [`query`] - Named artifact queries (`POST /api/query/{name}`)
//! - [`artifact`] - Streaming artifact downloads with bounded retry (`GET /api/artifact/{id}`)
//!
//! The client holds no per-call state: every method takes the service base
//! URL and token explicitly, so one client can serve many services and many
//! concurrent callers. Cloning is cheap and shares the connection pool.

mod artifact;
mod auth;
mod query;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use artifact::ArtifactStream;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Login endpoint
pub const LOGIN_PATH: &str = "/api/auth/login";
/// Named query endpoint template
pub const QUERY_PATH: &str = "/api/query/:queryName";
/// Artifact payload endpoint template
pub const ARTIFACT_PATH: &str = "/api/artifact/:id";

/// Client for the Infrahub REST surface
#[derive(Clone, Debug)]
pub struct InfrahubClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl InfrahubClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with the given configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;
        Ok(Self { http, config })
    }

    /// Create a client on top of a caller-provided transport
    ///
    /// `connect_timeout` and `user_agent` from `config` are ignored; they are
    /// properties of the supplied `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { http, config })
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// The `branch`/`at` query parameters shared by query and artifact requests
fn target_params<'a>(branch: &'a str, at: &'a str) -> HashMap<&'a str, &'a str> {
    HashMap::from([("branch", branch), (crate::url_builder::AT_PARAM, at)])
}
