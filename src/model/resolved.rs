// src/model/resolved.rs

//! Selection preferences and the resolution accumulator

use serde::Serialize;

use super::manifest::{Architecture, InstallerContext, InstallerType};
use super::package::{CatalogEntry, PackageDescriptor};

/// Caller preferences for picking an installer variant
///
/// `None` on an axis means "unspecified": any variant value matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPreferences {
    pub architecture: Option<Architecture>,
    pub context: Option<InstallerContext>,
    pub installer_type: Option<InstallerType>,
    /// Replaces the manifest's switches when set
    pub override_arguments: Option<String>,
    /// Always install through the winget CLI instead of the installer file
    pub script_only: bool,
}

/// A package being resolved into an installable artifact
///
/// Starts from a descriptor or catalog entry, is enriched by the installer
/// resolver and then by the command synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    pub id: String,
    pub version: String,
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub installer_type: Option<InstallerType>,
    pub architecture: Option<Architecture>,
    pub context: Option<InstallerContext>,
    pub installer_url: Option<String>,
    pub installer_filename: Option<String>,
    pub installer_sha256: Option<String>,
    pub install_command: Option<String>,
    pub uninstall_command: Option<String>,
    pub msi_product_code: Option<String>,
    pub msi_version: Option<String>,
}

impl ResolvedPackage {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Seed from a catalog entry, resolving `version` (or the entry's highest)
    pub fn from_catalog_entry(entry: &CatalogEntry, version: Option<&str>) -> Self {
        let version = version
            .map(str::to_string)
            .or_else(|| entry.version.clone())
            .unwrap_or_else(|| crate::version::UNKNOWN_VERSION.to_string());

        Self {
            name: Some(entry.name.clone()),
            ..Self::new(entry.id.clone(), version)
        }
    }

    /// Seed from parsed `winget show` output
    pub fn from_descriptor(descriptor: &PackageDescriptor) -> Self {
        Self {
            id: descriptor.id.clone().unwrap_or_default(),
            version: descriptor
                .version
                .clone()
                .unwrap_or_else(|| crate::version::UNKNOWN_VERSION.to_string()),
            name: descriptor.name.clone(),
            publisher: descriptor.publisher.clone(),
            description: descriptor.description.clone(),
            installer_type: descriptor.installer_type,
            installer_url: descriptor.installer_url.as_ref().map(|u| u.to_string()),
            installer_sha256: descriptor.installer_sha256.clone(),
            ..Default::default()
        }
    }
}
