// src/model/manifest.rs

//! Installer manifests from the community winget-pkgs repository
//!
//! A manifest lists one installer variant per architecture/scope/type
//! combination. Root-level fields act as defaults for every variant, so they
//! are folded into each variant at load time and the resolver only ever sees
//! fully-populated variants.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::debug;

/// Processor architecture an installer targets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Architecture {
    X86,
    X64,
    Arm,
    Arm64,
    Neutral,
    #[default]
    Unknown,
}

/// Install scope: machine-wide or per-user ("Scope" in manifests)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum InstallerContext {
    Machine,
    User,
    #[default]
    Unknown,
}

/// Installer technology, which decides how silent switches are built
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum InstallerType {
    Msi,
    #[strum(serialize = "inno")]
    #[serde(rename = "inno")]
    InnoSetup,
    Burn,
    Nullsoft,
    Exe,
    Msix,
    Appx,
    Wix,
    Zip,
    #[default]
    Unknown,
}

macro_rules! lenient_from_string {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self::parse_lenient(&value)
            }
        }

        impl $ty {
            /// Parse a manifest value, mapping anything unrecognised to `Unknown`
            pub fn parse_lenient(value: &str) -> Self {
                value.trim().parse().unwrap_or(Self::Unknown)
            }
        }
    )*};
}

lenient_from_string!(Architecture, InstallerContext, InstallerType);

impl InstallerType {
    /// File extension used when an installer URL yields no filename
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Msi | Self::Wix => "msi",
            Self::Msix => "msix",
            Self::Appx => "appx",
            Self::Zip => "zip",
            _ => "exe",
        }
    }
}

/// Installer switches declared by the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallerSwitches {
    pub silent: Option<String>,
    pub silent_with_progress: Option<String>,
    pub interactive: Option<String>,
    pub custom: Option<String>,
}

impl InstallerSwitches {
    /// The switch string to use for an unattended install
    ///
    /// Custom wins over silent, silent wins over silent-with-progress.
    pub fn preferred(&self) -> Option<&str> {
        [&self.custom, &self.silent, &self.silent_with_progress]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }

    /// Fill fields this record leaves empty from `defaults`
    fn merged_with(self, defaults: &InstallerSwitches) -> Self {
        Self {
            silent: self.silent.or_else(|| defaults.silent.clone()),
            silent_with_progress: self
                .silent_with_progress
                .or_else(|| defaults.silent_with_progress.clone()),
            interactive: self.interactive.or_else(|| defaults.interactive.clone()),
            custom: self.custom.or_else(|| defaults.custom.clone()),
        }
    }
}

/// An "Apps and Features" registration written by the installer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppsAndFeaturesEntry {
    pub display_name: Option<String>,
    pub publisher: Option<String>,
    pub display_version: Option<String>,
    pub product_code: Option<String>,
    pub upgrade_code: Option<String>,
}

/// One downloadable installer option within a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallerVariant {
    pub architecture: Architecture,
    pub scope: Option<InstallerContext>,
    pub installer_type: InstallerType,
    pub url: String,
    pub sha256: String,
    pub switches: Option<InstallerSwitches>,
    pub product_code: Option<String>,
    pub apps_and_features_entries: Vec<AppsAndFeaturesEntry>,
}

/// A package version's installer manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallerManifest {
    pub package_identifier: String,
    pub package_version: String,
    pub installers: Vec<InstallerVariant>,
}

// Raw YAML shape; every field optional because root values are defaults.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawManifest {
    package_identifier: String,
    #[serde(deserialize_with = "scalar_string")]
    package_version: String,
    installer_type: Option<InstallerType>,
    scope: Option<InstallerContext>,
    installer_switches: Option<InstallerSwitches>,
    product_code: Option<String>,
    #[serde(default)]
    apps_and_features_entries: Vec<AppsAndFeaturesEntry>,
    #[serde(default)]
    installers: Vec<RawInstaller>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawInstaller {
    #[serde(default)]
    architecture: Architecture,
    installer_type: Option<InstallerType>,
    scope: Option<InstallerContext>,
    installer_url: String,
    #[serde(default)]
    installer_sha256: String,
    installer_switches: Option<InstallerSwitches>,
    product_code: Option<String>,
    #[serde(default)]
    apps_and_features_entries: Vec<AppsAndFeaturesEntry>,
}

/// Accept unquoted YAML scalars such as `PackageVersion: 2.4`
///
/// Numbers lose their spelling here (`1.10` reads as `1.1`);
/// [`top_level_scalar`] recovers the literal text afterwards.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar version, found {other:?}"
        ))),
    }
}

/// Literal text of an unindented `Key: value` line, quotes and comment removed
fn top_level_scalar(yaml: &str, key: &str) -> Option<String> {
    yaml.lines().find_map(|line| {
        let rest = line
            .trim_start_matches('\u{feff}')
            .strip_prefix(key)?
            .strip_prefix(':')?;
        let value = rest.split(" #").next().unwrap_or_default().trim();
        let value = value
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
            .unwrap_or(value);
        (!value.is_empty()).then(|| value.to_string())
    })
}

impl InstallerManifest {
    /// Parse a winget-pkgs `*.installer.yaml` document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawManifest = serde_yaml::from_str(yaml)
            .map_err(|e| Error::ParseError(format!("invalid installer manifest: {e}")))?;

        let installers: Vec<InstallerVariant> = raw
            .installers
            .into_iter()
            .map(|installer| InstallerVariant {
                architecture: installer.architecture,
                scope: installer.scope.or(raw.scope),
                installer_type: installer
                    .installer_type
                    .or(raw.installer_type)
                    .unwrap_or_default(),
                url: installer.installer_url,
                sha256: installer.installer_sha256,
                switches: match (installer.installer_switches, &raw.installer_switches) {
                    (Some(own), Some(defaults)) => Some(own.merged_with(defaults)),
                    (own, defaults) => own.or_else(|| defaults.clone()),
                },
                product_code: installer.product_code.or_else(|| raw.product_code.clone()),
                apps_and_features_entries: if installer.apps_and_features_entries.is_empty() {
                    raw.apps_and_features_entries.clone()
                } else {
                    installer.apps_and_features_entries
                },
            })
            .collect();

        debug!(
            "Parsed manifest for {} {} with {} installers",
            raw.package_identifier,
            raw.package_version,
            installers.len()
        );

        Ok(Self {
            package_identifier: raw.package_identifier,
            package_version: top_level_scalar(yaml, "PackageVersion")
                .unwrap_or(raw.package_version),
            installers,
        })
    }
}
