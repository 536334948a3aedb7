// src/config.rs

//! Configuration file support
//!
//! Settings live in a TOML file (by default
//! `~/.config/wingetpack/config.toml`). Every section has defaults, so a
//! missing file or a partial file is fine. Components receive the section
//! they need through their constructors; nothing here is global.
//!
//! ```toml
//! [catalog]
//! snapshot_url = "https://cdn.winget.microsoft.com/cache/source.msix"
//!
//! [http]
//! timeout_secs = 60
//!
//! [cli]
//! executable = "C:\\Users\\me\\AppData\\Local\\Microsoft\\WindowsApps\\winget.exe"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SNAPSHOT_URL: &str = "https://cdn.winget.microsoft.com/cache/source.msix";
pub const DEFAULT_INDEX_PATH: &str = "Public/index.db";
pub const DEFAULT_MANIFEST_BASE_URL: &str =
    "https://raw.githubusercontent.com/microsoft/winget-pkgs/master/manifests";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub manifests: ManifestConfig,
    pub http: HttpConfig,
    pub cli: CliConfig,
}

/// Where the index snapshot comes from and where it is unpacked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub snapshot_url: String,
    /// Path of the SQLite index inside the snapshot archive
    pub index_path: String,
    /// Parent for scratch extraction directories (system temp when unset)
    pub scratch_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot_url: DEFAULT_SNAPSHOT_URL.to_string(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
            scratch_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Root of the winget-pkgs `manifests/` tree
    pub base_url: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MANIFEST_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// The local winget command-line tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub executable: String,
    /// Pass `--accept-package-agreements`/`--accept-source-agreements`
    pub accept_agreements: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            executable: "winget".to_string(),
            accept_agreements: true,
        }
    }
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wingetpack").join("config.toml"))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::ParseError(format!("invalid configuration: {e}")))
    }

    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }
}
