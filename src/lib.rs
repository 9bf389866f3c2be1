//! # infrahub-client
//!
//! HTTP client adapter for the Infrahub source-of-truth service.
//!
//! ## What it does
//!
//! - **Login** - exchange a username and password for a bearer token
//! - **Query** - run a named, server-side registered query and get a flat list
//!   of [`ArtifactRecord`]s back instead of the nested GraphQL envelope
//! - **Download** - stream an artifact payload with bounded retry and backoff,
//!   either to the caller or atomically into a file
//!
//! Every call takes the service base URL and token explicitly. The client
//! holds no per-call state, so a single [`InfrahubClient`] can be shared by
//! any number of concurrent tasks.
//!
//! Point-in-time reads use the `at` parameter, which must be an RFC 3339
//! timestamp or a relative `now-2h` style expression; see [`target_date`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use infrahub_client::InfrahubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = InfrahubClient::new()?;
//!     let base = "https://infrahub.example.com";
//!
//!     let token = client.login(base, "admin", "secret").await?;
//!     let records = client
//!         .run_query(base, "artifact_by_name", "startup-config", "main", "now-1h", &token)
//!         .await?;
//!
//!     for record in &records {
//!         let dest = std::path::PathBuf::from(format!("{}.cfg", record.id));
//!         client
//!             .download_record_to_file(base, record, "main", "now-1h", &token, &dest)
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Service client (login, query, artifact download)
pub mod client;
/// Per-cluster client factory capability
pub mod cluster;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Retry logic with exponential backoff
pub mod retry;
/// Point-in-time selectors for the `at` parameter
pub mod target_date;
/// Core types
pub mod types;
/// Request URL construction
pub mod url_builder;

// Re-export commonly used types
pub use client::{ArtifactStream, InfrahubClient};
pub use cluster::MulticlusterClientFactory;
pub use config::{ClientConfig, RetryConfig};
pub use error::{DownloadFailure, Error, ErrorKind, Operation, Result, UrlError};
pub use target_date::{TimeSelector, is_valid_target_date_format};
pub use types::{AccessToken, ArtifactRecord, Credentials};
pub use url_builder::build_url;
