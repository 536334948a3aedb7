// src/repository/manifest.rs

//! Installer manifest retrieval
//!
//! Manifests live in the winget-pkgs repository under
//! `manifests/<first letter>/<id segments>/<version>/<id>.installer.yaml`,
//! e.g. `manifests/m/Microsoft/VisualStudioCode/1.85.1/Microsoft.VisualStudioCode.installer.yaml`.

use crate::config::{HttpConfig, ManifestConfig};
use crate::error::{Error, Result};
use crate::model::InstallerManifest;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use super::client::RepositoryClient;

/// Something that can produce the installer manifest for an id/version
pub trait ManifestSource {
    fn fetch_installer_manifest(&self, id: &str, version: &str) -> Result<InstallerManifest>;
}

/// Path segments of an installer manifest relative to `manifests/`
pub fn manifest_segments(id: &str, version: &str) -> Result<Vec<String>> {
    let first = id
        .chars()
        .next()
        .ok_or_else(|| Error::NotFoundError("Empty package identifier".to_string()))?;

    let mut segments = vec![first.to_lowercase().to_string()];
    segments.extend(id.split('.').map(str::to_string));
    segments.push(version.to_string());
    segments.push(format!("{id}.installer.yaml"));
    Ok(segments)
}

/// Fetches manifests over HTTP from a winget-pkgs mirror
pub struct HttpManifestSource {
    client: RepositoryClient,
    base_url: Url,
}

impl HttpManifestSource {
    pub fn new(config: &ManifestConfig, http: &HttpConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::ParseError(format!("invalid manifest base URL '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            client: RepositoryClient::new(http)?,
            base_url,
        })
    }

    /// Full URL of an installer manifest
    pub fn manifest_url(&self, id: &str, version: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::ParseError(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(manifest_segments(id, version)?);
        Ok(url)
    }
}

impl ManifestSource for HttpManifestSource {
    fn fetch_installer_manifest(&self, id: &str, version: &str) -> Result<InstallerManifest> {
        let url = self.manifest_url(id, version)?;
        info!("Fetching installer manifest for {} {}", id, version);

        let yaml = self.client.fetch_text(url.as_str()).map_err(|e| match e {
            Error::NotFoundError(_) => {
                Error::NotFoundError(format!("No manifest for {id} {version} at {url}"))
            }
            other => other,
        })?;
        InstallerManifest::from_yaml(&yaml)
    }
}

/// Reads manifests from a local checkout of the `manifests/` tree
pub struct LocalManifestSource {
    root: PathBuf,
}

impl LocalManifestSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ManifestSource for LocalManifestSource {
    fn fetch_installer_manifest(&self, id: &str, version: &str) -> Result<InstallerManifest> {
        let mut path = self.root.clone();
        for segment in manifest_segments(id, version)? {
            path.push(crate::filesystem::path::sanitize_filename(&segment)?);
        }

        let yaml = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFoundError(format!("No manifest for {id} {version} at {}", path.display()))
            } else {
                Error::IoError(format!("Failed to read {}: {e}", path.display()))
            }
        })?;
        InstallerManifest::from_yaml(&yaml)
    }
}
