// src/cli.rs
//! CLI definitions for wingetpack
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wingetpack::{Architecture, InstallerContext, InstallerType};

#[derive(Parser)]
#[command(name = "wingetpack")]
#[command(version)]
#[command(about = "Resolve winget packages into silent install and uninstall commands", long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/wingetpack/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the package catalog from the index snapshot
    Catalog {
        /// Snapshot URL (default: from configuration)
        #[arg(long)]
        url: Option<String>,

        /// Build from a snapshot archive on disk instead of downloading
        #[arg(long, conflicts_with = "url")]
        archive: Option<PathBuf>,

        /// Only list packages whose id, name or tag contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe a package using the local winget tool
    Show {
        /// Package identifier
        id: String,

        /// Specific version
        #[arg(long)]
        version: Option<String>,
    },

    /// Resolve the installer and command lines for a package version
    Resolve {
        /// Package identifier
        id: String,

        /// Package version
        #[arg(long)]
        version: String,

        /// Installer architecture (x86, x64, arm, arm64, neutral)
        #[arg(long)]
        arch: Option<Architecture>,

        /// Install scope (machine, user)
        #[arg(long)]
        context: Option<InstallerContext>,

        /// Installer technology (msi, inno, burn, nullsoft, exe, ...)
        #[arg(long)]
        installer_type: Option<InstallerType>,

        /// Installer arguments replacing the manifest's switches
        #[arg(long, allow_hyphen_values = true)]
        args: Option<String>,

        /// Always install through the winget CLI
        #[arg(long)]
        script_only: bool,

        /// Read manifests from a local winget-pkgs `manifests/` checkout
        #[arg(long)]
        manifests: Option<PathBuf>,

        /// Download and verify the installer into this directory
        #[arg(long)]
        download: Option<PathBuf>,
    },
}
