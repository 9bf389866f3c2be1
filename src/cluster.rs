//! Per-cluster client factory consumed by callers of this crate
//!
//! Callers that push downloaded artifacts into several remote clusters get a
//! ready-to-use client for each cluster from a factory supplied by the
//! surrounding system. This crate only defines the capability; it ships no
//! implementation.

use async_trait::async_trait;

/// Hands out cached clients scoped to one remote cluster
///
/// Implementations must be safe to call from concurrent tasks and should
/// return the same client for repeated calls with the same `server_url`.
/// Dropping the returned future cancels the lookup.
#[async_trait]
pub trait MulticlusterClientFactory: Send + Sync {
    /// Client handle type (e.g. a Kubernetes API client)
    type Client: Send + Sync;
    /// Error returned when no client can be produced
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return the cached client for `server_url`, deriving it from `base` on first use
    async fn cached_client_for(
        &self,
        server_url: &str,
        base: &Self::Client,
    ) -> Result<Self::Client, Self::Error>;
}
