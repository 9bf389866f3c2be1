//! Login: exchange credentials for a bearer token.

use super::{InfrahubClient, LOGIN_PATH};
use crate::error::{Error, Operation, Result};
use crate::types::{AccessToken, Credentials};
use crate::url_builder::build_url;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

impl InfrahubClient {
    /// Log in with a username and password
    ///
    /// Makes exactly one attempt; retrying authentication is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::Build`] if `base_url` is unusable (no request is sent)
    /// - [`Error::Transport`] if no response arrives
    /// - [`Error::Auth`] on any non-200 status
    /// - [`Error::Decode`] on a 200 whose body is empty or lacks `access_token`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use infrahub_client::InfrahubClient;
    ///
    /// # async fn example() -> infrahub_client::Result<()> {
    /// let client = InfrahubClient::new()?;
    /// let token = client.login("https://infrahub.example.com", "admin", "secret").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(&self, base_url: &str, username: &str, password: &str) -> Result<AccessToken> {
        self.login_with(base_url, &Credentials::new(username, password))
            .await
    }

    /// Log in with a [`Credentials`] value
    pub async fn login_with(&self, base_url: &str, credentials: &Credentials) -> Result<AccessToken> {
        let url = build_url(base_url, LOGIN_PATH, &HashMap::new(), &HashMap::new()).map_err(
            |source| Error::Build {
                operation: Operation::Login,
                source,
            },
        )?;

        tracing::debug!(url = %url, username = %credentials.username, "logging in");

        let transport = |source| Error::Transport {
            operation: Operation::Login,
            source,
        };

        let response = self
            .http
            .post(&url)
            .json(credentials)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url = %url, status = status.as_u16(), "login rejected");
            return Err(Error::Auth {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let parsed: LoginResponse = serde_json::from_slice(&body).map_err(|source| Error::Decode {
            operation: Operation::Login,
            source,
        })?;

        tracing::info!(username = %credentials.username, "logged in");
        Ok(AccessToken::new(parsed.access_token))
    }
}
