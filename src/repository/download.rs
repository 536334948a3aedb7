// src/repository/download.rs

//! Installer download with checksum verification

use crate::error::{Error, Result};
use crate::filesystem::path::sanitize_filename;
use crate::model::ResolvedPackage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::client::RepositoryClient;

/// Download a resolved package's installer into `dest_dir`
///
/// The file is named after the resolved installer filename and verified
/// against the manifest's SHA-256. If verification fails, the file is removed
/// before returning the error.
pub fn download_installer(
    client: &RepositoryClient,
    package: &ResolvedPackage,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let url = package.installer_url.as_deref().ok_or_else(|| {
        Error::NotFoundError(format!("{} {} has no installer URL", package.id, package.version))
    })?;
    let filename = package.installer_filename.as_deref().ok_or_else(|| {
        Error::NotFoundError(format!(
            "{} {} has no installer filename",
            package.id, package.version
        ))
    })?;

    let dest_path = dest_dir.join(sanitize_filename(filename)?);
    client.download_file(url, &dest_path)?;

    match package.installer_sha256.as_deref().filter(|h| !h.trim().is_empty()) {
        Some(expected) => {
            if let Err(e) = verify_checksum(&dest_path, expected) {
                let _ = std::fs::remove_file(&dest_path);
                return Err(e);
            }
        }
        None => info!("No SHA-256 published for {}, skipping verification", package.id),
    }

    Ok(dest_path)
}

/// Verify file checksum matches expected value
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    debug!("Verifying checksum for {}", path.display());
    crate::hash::verify_file_sha256(path, expected)?;
    debug!("Checksum verified: {}", expected);
    Ok(())
}
