// src/model/package.rs

//! Package descriptions produced by the text parser and the catalog builder

use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

use super::manifest::InstallerType;

/// Where a package is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PackageSource {
    /// Microsoft Store (`msstore` installer type)
    Store,
    /// The community winget repository
    Winget,
    #[default]
    Unknown,
}

/// A package as described by `winget show` output
///
/// The installer fields are only populated for non-store packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub publisher: Option<String>,
    pub publisher_url: Option<Url>,
    pub publisher_support_url: Option<Url>,
    pub homepage: Option<Url>,
    pub description: Option<String>,
    pub source: PackageSource,
    pub installer_type: Option<InstallerType>,
    pub installer_url: Option<Url>,
    pub installer_sha256: Option<String>,
}

/// Denormalized per-package summary built from the index snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Highest version among the package's manifests, if any were found
    pub version: Option<String>,
    pub tags: BTreeSet<String>,
}

impl CatalogEntry {
    /// Case-insensitive match against identifier, name or any tag
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.id.to_lowercase().contains(&query)
            || self.name.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_matches() {
        let entry = CatalogEntry {
            id: "Microsoft.VisualStudioCode".to_string(),
            name: "Visual Studio Code".to_string(),
            version: Some("1.85.1".to_string()),
            tags: ["editor".to_string(), "IDE".to_string()].into_iter().collect(),
        };

        assert!(entry.matches("visualstudio"));
        assert!(entry.matches("studio code"));
        assert!(entry.matches("ide"));
        assert!(!entry.matches("browser"));
    }
}
