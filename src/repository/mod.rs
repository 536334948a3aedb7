// src/repository/mod.rs

//! Remote repository access
//!
//! This module provides functionality for:
//! - HTTP fetching with retry support
//! - Locating and parsing winget-pkgs installer manifests
//! - Downloading installers with SHA-256 verification

mod client;
mod download;
pub mod manifest;

pub use client::RepositoryClient;
pub use download::{download_installer, verify_checksum};
pub use manifest::{HttpManifestSource, LocalManifestSource, ManifestSource, manifest_segments};
