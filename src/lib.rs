// src/lib.rs

//! Wingetpack
//!
//! Resolves winget packages into installable artifacts for managed
//! endpoints: the installer file to download, its hash, and the exact
//! command lines that install and uninstall it silently.
//!
//! # Architecture
//!
//! - Catalog: rebuilt from the published index snapshot (`source.msix`)
//! - Manifests: fetched per id/version from the winget-pkgs tree
//! - Resolution: first installer variant matching the caller's preferences
//! - Commands: per-technology silent switches, `winget` CLI as fallback
//! - Text records: `winget show` output parsed into package descriptors

pub mod catalog;
pub mod config;
mod error;
pub mod filesystem;
pub mod hash;
pub mod model;
pub mod packages;
pub mod repository;
pub mod resolver;
pub mod version;

pub use catalog::{CatalogBuilder, search_catalog};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    Architecture, CatalogEntry, InstallerContext, InstallerManifest, InstallerType,
    InstallerVariant, PackageDescriptor, PackageSource, ResolvedPackage, SelectionPreferences,
};
pub use packages::{WingetCli, parse_show_output};
pub use resolver::{CommandSynthesizer, InstallerResolver, resolve_package};
pub use version::{PackageVersion, compare_versions, highest_version};
