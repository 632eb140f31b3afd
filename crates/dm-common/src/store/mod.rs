pub mod candidates;
pub mod download;
pub mod prospects;
pub mod requisitions;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use candidates::{CandidateStore, CandidateStoreError, convert_keyed_document};
pub use download::{DownloadError, ensure_local_file, http_client};
pub use prospects::{ProspectStore, ProspectStoreError};
pub use requisitions::{RequisitionStore, RequisitionStoreError};

use std::path::PathBuf;

use tracing::info;

/// Locations and origins of the three source stores.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub requisitions_url: Option<String>,
    pub prospects_url: Option<String>,
    pub applicants_url: Option<String>,
    pub requisitions_path: PathBuf,
    pub prospects_path: PathBuf,
    /// Raw keyed applicants document, converted once into `candidates_path`.
    pub applicants_raw_path: PathBuf,
    pub candidates_path: PathBuf,
    pub http_timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Candidates(#[from] CandidateStoreError),
}

/// Ensures all three stores exist locally, downloading and converting on
/// first use. One download attempt per file; failures abort the bootstrap.
pub async fn bootstrap(config: &DataConfig) -> Result<(), BootstrapError> {
    let client = http_client(config.http_timeout_secs);

    if let Some(url) = config.requisitions_url.as_deref() {
        ensure_local_file(&client, url, &config.requisitions_path).await?;
    }
    if let Some(url) = config.prospects_url.as_deref() {
        ensure_local_file(&client, url, &config.prospects_path).await?;
    }

    if !config.candidates_path.exists() {
        if let Some(url) = config.applicants_url.as_deref() {
            ensure_local_file(&client, url, &config.applicants_raw_path).await?;
        }
        let written = convert_keyed_document(&config.applicants_raw_path, &config.candidates_path)?;
        info!(
            records = written,
            path = %config.candidates_path.display(),
            "converted applicants document to line-delimited store"
        );
    }

    Ok(())
}
