//! Streaming artifact downloads with bounded retry.
//!
//! A download retries the GET until a 200 arrives or the retry budget is
//! spent. Once a 200 arrives its body is handed to the caller as an
//! [`ArtifactStream`] without buffering; failures while reading that body are
//! not retried, since the request would have to be reissued and bytes already
//! delivered cannot be taken back.

use super::{ARTIFACT_PATH, InfrahubClient, target_params};
use crate::error::{DownloadFailure, Error, Operation, Result};
use crate::retry::{IsRetryable, retry_with_backoff};
use crate::types::{AccessToken, ArtifactRecord};
use crate::url_builder::build_url;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// An open artifact body
///
/// Owns the underlying connection; dropping the stream at any point (after a
/// full read, after an error, or on cancellation) releases it.
#[derive(Debug)]
pub struct ArtifactStream {
    response: reqwest::Response,
}

impl ArtifactStream {
    /// Payload size announced by the service, if any
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Next chunk of the payload, or `None` at the end
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.response.chunk().await.map_err(body_error)
    }

    /// Convert into a `Stream` of payload chunks
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        self.response.bytes_stream().map_err(body_error)
    }

    /// Read the whole payload into memory
    pub async fn read_to_end(mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.content_length().unwrap_or(0).min(1 << 20) as usize);
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }

    /// Copy the payload into `writer`, returning the number of bytes written
    ///
    /// The writer is flushed but not shut down.
    pub async fn write_to<W>(mut self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0u64;
        while let Some(chunk) = self.chunk().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }
}

fn body_error(source: reqwest::Error) -> Error {
    Error::Transport {
        operation: Operation::Artifact,
        source,
    }
}

impl From<&Error> for DownloadFailure {
    fn from(error: &Error) -> Self {
        match error {
            Error::Status { status, .. } => DownloadFailure::Status(*status),
            other => DownloadFailure::Transport(other.to_string()),
        }
    }
}

impl InfrahubClient {
    /// Open the payload of an artifact as a stream
    ///
    /// Transport failures, attempt timeouts, and non-200 responses are retried
    /// up to `retry.max_attempts` more times with exponential backoff. When
    /// `download_deadline` is configured it bounds the whole retry loop.
    ///
    /// # Errors
    ///
    /// - [`Error::Build`] if the URL cannot be built (no request is sent)
    /// - [`Error::RetryExhausted`] when every attempt failed; reports the last status code or transport error
    /// - [`Error::Timeout`] when `download_deadline` expires first
    ///
    /// # Example
    ///
    /// ```no_run
    /// use infrahub_client::{AccessToken, InfrahubClient};
    ///
    /// # async fn example() -> infrahub_client::Result<()> {
    /// let client = InfrahubClient::new()?;
    /// let token = AccessToken::new("token");
    /// let stream = client
    ///     .download_artifact("https://infrahub.example.com", "a1", "main", "", &token)
    ///     .await?;
    /// let mut out = tokio::io::stdout();
    /// stream.write_to(&mut out).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_artifact(
        &self,
        base_url: &str,
        artifact_id: &str,
        branch: &str,
        at: &str,
        token: &AccessToken,
    ) -> Result<ArtifactStream> {
        let url = build_url(
            base_url,
            ARTIFACT_PATH,
            &HashMap::from([("id", artifact_id)]),
            &target_params(branch, at),
        )
        .map_err(|source| Error::Build {
            operation: Operation::Artifact,
            source,
        })?;

        tracing::debug!(url = %url, artifact = artifact_id, "downloading artifact");

        let retry = &self.config.retry;
        let attempts = retry_with_backoff(retry, || self.attempt_download(&url, token));
        let outcome = match self.config.download_deadline {
            Some(budget) => tokio::time::timeout(budget, attempts)
                .await
                .map_err(|_| {
                    tracing::error!(url = %url, budget_ms = budget.as_millis(), "artifact download deadline expired");
                    Error::Timeout {
                        operation: Operation::Artifact,
                        budget,
                    }
                })?,
            None => attempts.await,
        };

        match outcome {
            Ok(response) => {
                tracing::info!(
                    artifact = artifact_id,
                    content_length = ?response.content_length(),
                    "artifact stream opened"
                );
                Ok(ArtifactStream { response })
            }
            Err(e) if e.is_retryable() => Err(Error::RetryExhausted {
                attempts: retry.total_attempts(),
                last: DownloadFailure::from(&e),
            }),
            Err(e) => Err(e),
        }
    }

    async fn attempt_download(&self, url: &str, token: &AccessToken) -> Result<reqwest::Response> {
        let request = self.http.get(url).bearer_auth(token.as_str()).send();

        // Bound only the wait for headers; the body may stream for longer
        let budget = self.config.request_timeout;
        let response = match tokio::time::timeout(budget, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                return Err(Error::Transport {
                    operation: Operation::Artifact,
                    source,
                });
            }
            Err(_) => {
                return Err(Error::Timeout {
                    operation: Operation::Artifact,
                    budget,
                });
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Status {
                operation: Operation::Artifact,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Download an artifact into `dest`
    ///
    /// The payload is streamed into a sibling `<name>.<random>.part` file
    /// which is renamed over `dest` only after every byte has been written
    /// and synced. Each call gets its own part file, so concurrent downloads
    /// to the same `dest` never write into each other; the last rename wins.
    /// On failure the partial file is removed and any existing `dest` is left
    /// untouched. Returns the number of bytes written.
    pub async fn download_artifact_to_file(
        &self,
        base_url: &str,
        artifact_id: &str,
        branch: &str,
        at: &str,
        token: &AccessToken,
        dest: &Path,
    ) -> Result<u64> {
        let part = part_path(dest)?;
        let stream = self
            .download_artifact(base_url, artifact_id, branch, at, token)
            .await?;
        persist(stream, &part, dest, None).await
    }

    /// Download the artifact described by `record` into `dest`, verifying its checksum
    ///
    /// Behaves like [`download_artifact_to_file`](Self::download_artifact_to_file)
    /// and additionally compares the MD5 digest of the payload with
    /// `record.checksum` before the rename. A mismatch fails with
    /// [`Error::ChecksumMismatch`] and leaves nothing new at `dest`.
    pub async fn download_record_to_file(
        &self,
        base_url: &str,
        record: &ArtifactRecord,
        branch: &str,
        at: &str,
        token: &AccessToken,
        dest: &Path,
    ) -> Result<u64> {
        let part = part_path(dest)?;
        let stream = self
            .download_artifact(base_url, &record.id, branch, at, token)
            .await?;
        persist(stream, &part, dest, Some(&record.checksum)).await
    }
}

fn part_path(dest: &Path) -> Result<PathBuf> {
    let Some(name) = dest.file_name() else {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("destination {} has no file name", dest.display()),
        )));
    };
    let mut part_name = name.to_os_string();
    part_name.push(format!(".{:016x}.part", rand::random::<u64>()));
    Ok(dest.with_file_name(part_name))
}

async fn persist(
    stream: ArtifactStream,
    part: &Path,
    dest: &Path,
    expected_md5: Option<&str>,
) -> Result<u64> {
    // create_new: a part file that already exists belongs to someone else
    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(part)
        .await?;

    let written = match write_part(stream, file, expected_md5).await {
        Ok(written) => written,
        Err(e) => {
            discard_part(part).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(part, dest).await {
        discard_part(part).await;
        return Err(e.into());
    }

    tracing::info!(path = %dest.display(), bytes = written, "artifact written");
    Ok(written)
}

async fn write_part(
    mut stream: ArtifactStream,
    mut file: tokio::fs::File,
    expected_md5: Option<&str>,
) -> Result<u64> {
    let mut digest = expected_md5.map(|_| md5::Context::new());
    let mut written = 0u64;

    while let Some(chunk) = stream.chunk().await? {
        if let Some(digest) = digest.as_mut() {
            digest.consume(&chunk);
        }
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;

    if let (Some(expected), Some(digest)) = (expected_md5, digest) {
        let actual = format!("{:x}", digest.compute());
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(Error::ChecksumMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
    }
    Ok(written)
}

async fn discard_part(part: &Path) {
    if let Err(e) = tokio::fs::remove_file(part).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %part.display(), error = %e, "failed to remove partial artifact");
    }
}
