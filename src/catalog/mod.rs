// src/catalog/mod.rs

//! Searchable package catalog built from the winget index snapshot
//!
//! A refresh downloads the snapshot archive into a fresh scratch directory,
//! extracts it with zip-slip protection, rebuilds one [`CatalogEntry`] per
//! package identifier and removes the scratch directory again, whether the
//! build succeeded, failed or was cancelled.

mod extract;
mod snapshot;

pub use extract::extract_archive;
pub use snapshot::{ManifestRow, SnapshotReader};

use crate::config::{CatalogConfig, HttpConfig};
use crate::error::{Error, Result};
use crate::filesystem::path::resolve_entry_path;
use crate::model::CatalogEntry;
use crate::repository::RepositoryClient;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// File name of the downloaded snapshot inside the scratch directory
const SNAPSHOT_FILE_NAME: &str = "source.msix";

/// Builds the catalog from a snapshot URL or a local archive
pub struct CatalogBuilder {
    client: RepositoryClient,
    config: CatalogConfig,
}

impl CatalogBuilder {
    pub fn new(config: CatalogConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: RepositoryClient::new(http)?,
            config,
        })
    }

    /// Download the snapshot at `snapshot_url` and build the catalog
    pub fn build(&self, snapshot_url: &str, cancel: &AtomicBool) -> Result<Vec<CatalogEntry>> {
        let scratch = self.create_scratch_dir()?;
        let archive = scratch.path().join(SNAPSHOT_FILE_NAME);

        let result = self
            .client
            .download_file(snapshot_url, &archive)
            .and_then(|()| self.build_in(scratch.path(), &archive, cancel));

        remove_scratch_dir(scratch);
        result
    }

    /// Build from the configured snapshot URL
    pub fn build_default(&self, cancel: &AtomicBool) -> Result<Vec<CatalogEntry>> {
        self.build(&self.config.snapshot_url, cancel)
    }

    /// Build from a snapshot archive that is already on disk
    pub fn build_from_archive(
        &self,
        archive: &Path,
        cancel: &AtomicBool,
    ) -> Result<Vec<CatalogEntry>> {
        let scratch = self.create_scratch_dir()?;
        let result = self.build_in(scratch.path(), archive, cancel);
        remove_scratch_dir(scratch);
        result
    }

    fn build_in(
        &self,
        scratch: &Path,
        archive: &Path,
        cancel: &AtomicBool,
    ) -> Result<Vec<CatalogEntry>> {
        let extract_dir = scratch.join("extracted");
        extract_archive(archive, &extract_dir)?;

        let index_path = resolve_entry_path(&extract_dir, &self.config.index_path)?;
        let reader = SnapshotReader::open(&index_path)?;
        let entries = reader.read_catalog(cancel)?;

        info!("Catalog contains {} packages", entries.len());
        Ok(entries)
    }

    fn create_scratch_dir(&self) -> Result<TempDir> {
        let parent = self
            .config
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&parent).map_err(|e| {
            Error::IoError(format!("Failed to create {}: {e}", parent.display()))
        })?;

        let dir = tempfile::Builder::new()
            .prefix("wingetpack-catalog-")
            .tempdir_in(&parent)
            .map_err(|e| Error::IoError(format!("Failed to create scratch directory: {e}")))?;
        debug!("Using scratch directory {}", dir.path().display());
        Ok(dir)
    }
}

/// Best-effort removal; a failure is logged, never returned
fn remove_scratch_dir(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!("Failed to remove scratch directory {}: {}", path.display(), e);
    }
}

/// Entries matching `query` by identifier, name or tag, in catalog order
pub fn search_catalog<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    entries.iter().filter(|e| e.matches(query)).collect()
}

/// Find an entry by exact identifier
///
/// The catalog is sorted by identifier, so this is a binary search.
pub fn find_entry<'a>(entries: &'a [CatalogEntry], id: &str) -> Option<&'a CatalogEntry> {
    entries
        .binary_search_by(|e| e.id.as_str().cmp(id))
        .ok()
        .and_then(|i| entries.get(i))
}
