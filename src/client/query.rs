//! Named queries resolving artifact metadata.
//!
//! The service answers with a GraphQL-style envelope:
//!
//! ```json
//! {"data": {"CoreArtifact": {"edges": [
//!     {"node": {"id": "a1", "storage_id": {"id": "s1"}, "checksum": {"value": "abc123"}}}
//! ]}}}
//! ```
//!
//! The envelope is decoded once into the wire types below and then flattened
//! into [`ArtifactRecord`]s in edge order.

use super::{InfrahubClient, QUERY_PATH, target_params};
use crate::error::{Error, Operation, Result};
use crate::types::{AccessToken, ArtifactRecord};
use crate::url_builder::build_url;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize)]
struct QueryRequest<'a> {
    variables: QueryVariables<'a>,
}

#[derive(Serialize)]
struct QueryVariables<'a> {
    artifactname: &'a str,
}

#[derive(Deserialize)]
struct QueryEnvelope {
    /// Keyed by collection name (e.g. `CoreArtifact`)
    data: BTreeMap<String, Connection>,
}

#[derive(Deserialize)]
struct Connection {
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
struct Edge {
    node: ArtifactNode,
}

#[derive(Deserialize)]
struct ArtifactNode {
    id: String,
    storage_id: IdAttribute,
    checksum: ValueAttribute,
}

#[derive(Deserialize)]
struct IdAttribute {
    id: String,
}

#[derive(Deserialize)]
struct ValueAttribute {
    value: String,
}

impl From<ArtifactNode> for ArtifactRecord {
    fn from(node: ArtifactNode) -> Self {
        ArtifactRecord {
            id: node.id,
            storage_id: node.storage_id.id,
            checksum: node.checksum.value,
        }
    }
}

impl QueryEnvelope {
    fn into_records(self) -> Vec<ArtifactRecord> {
        self.data
            .into_values()
            .flat_map(|connection| connection.edges)
            .map(|edge| edge.node.into())
            .collect()
    }
}

/// Decode a query response body into flat records
pub(crate) fn decode_query_response(body: &[u8]) -> std::result::Result<Vec<ArtifactRecord>, serde_json::Error> {
    let envelope: QueryEnvelope = serde_json::from_slice(body)?;
    Ok(envelope.into_records())
}

impl InfrahubClient {
    /// Run a named query for an artifact and return the matching records
    ///
    /// `base_url` comes first, as on every client method, and `query_name`
    /// second. Callers used to a `(query_name, base_url, ...)` ordering must
    /// swap the first two arguments.
    ///
    /// `branch` and `at` are passed as query parameters; empty values are
    /// omitted. A non-empty `at` must be a valid target date.
    ///
    /// # Errors
    ///
    /// - [`Error::Build`] if the URL cannot be built (no request is sent)
    /// - [`Error::Transport`] if no response arrives
    /// - [`Error::Status`] on any non-200 status
    /// - [`Error::Decode`] if the body is not the expected envelope
    ///
    /// # Example
    ///
    /// ```no_run
    /// use infrahub_client::InfrahubClient;
    ///
    /// # async fn example() -> infrahub_client::Result<()> {
    /// let client = InfrahubClient::new()?;
    /// let base = "https://infrahub.example.com";
    /// let token = client.login(base, "admin", "secret").await?;
    /// let records = client
    ///     .run_query(base, "artifact_by_name", "startup-config", "main", "now-1h", &token)
    ///     .await?;
    /// for record in &records {
    ///     println!("{} -> {}", record.id, record.checksum);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_query(
        &self,
        base_url: &str,
        query_name: &str,
        artifact_name: &str,
        branch: &str,
        at: &str,
        token: &AccessToken,
    ) -> Result<Vec<ArtifactRecord>> {
        let url = build_url(
            base_url,
            QUERY_PATH,
            &HashMap::from([("queryName", query_name)]),
            &target_params(branch, at),
        )
        .map_err(|source| Error::Build {
            operation: Operation::Query,
            source,
        })?;

        tracing::debug!(url = %url, query = query_name, artifact = artifact_name, "running query");

        let transport = |source| Error::Transport {
            operation: Operation::Query,
            source,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.as_str())
            .json(&QueryRequest {
                variables: QueryVariables {
                    artifactname: artifact_name,
                },
            })
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url = %url, status = status.as_u16(), "query rejected");
            return Err(Error::Status {
                operation: Operation::Query,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let records = decode_query_response(&body).map_err(|source| Error::Decode {
            operation: Operation::Query,
            source,
        })?;

        tracing::info!(query = query_name, records = records.len(), "query completed");
        Ok(records)
    }
}
