//! One-shot fetch of source documents from the remote data host.
//!
//! Downloads are attempted exactly once per call with a bounded timeout; a
//! failure is surfaced to the caller and stops the enclosing workflow. Files
//! already present on disk are never re-fetched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} fetching {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP client with the store-wide request timeout applied.
pub fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Downloads `url` into `path` unless the file already exists.
///
/// Returns `true` when a download happened, `false` when the local copy was
/// reused. No retries: per the error taxonomy a data-unavailable failure is a
/// hard stop for the caller, not something to spin on.
pub async fn ensure_local_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<bool, DownloadError> {
    if path.exists() {
        return Ok(false);
    }

    info!(url, path = %path.display(), "downloading store file");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| DownloadError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| DownloadError::Request {
            url: url.to_string(),
            source,
        })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, &bytes).map_err(|source| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "store file downloaded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn existing_file_is_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vagas.json");
        std::fs::write(&path, "{}").unwrap();

        let client = http_client(5);
        let downloaded = ensure_local_file(&client, "http://127.0.0.1:1/unreachable", &path)
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn unreachable_host_fails_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let client = http_client(1);
        let result = ensure_local_file(&client, "http://127.0.0.1:1/unreachable", &path).await;

        assert!(matches!(result, Err(DownloadError::Request { .. })));
        assert!(!path.exists());
    }
}
