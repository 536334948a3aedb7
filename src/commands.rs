// src/commands.rs
//! Command handlers for the wingetpack CLI

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::info;
use wingetpack::config::Config;
use wingetpack::model::{CatalogEntry, ResolvedPackage, SelectionPreferences};
use wingetpack::repository::{
    HttpManifestSource, LocalManifestSource, ManifestSource, RepositoryClient, download_installer,
};
use wingetpack::{Architecture, CatalogBuilder, InstallerContext, InstallerType, WingetCli};

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Build the catalog and list (or search) its entries
pub fn cmd_catalog(
    config: &Config,
    url: Option<&str>,
    archive: Option<&Path>,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let builder = CatalogBuilder::new(config.catalog.clone(), &config.http)?;
    let cancel = AtomicBool::new(false);

    let progress = spinner("Building package catalog...".to_string())?;
    let built = match archive {
        Some(path) => builder.build_from_archive(path, &cancel),
        None => builder.build(url.unwrap_or(&config.catalog.snapshot_url), &cancel),
    };
    let entries = match built {
        Ok(entries) => {
            progress.finish_with_message(format!("Catalog built: {} packages", entries.len()));
            entries
        }
        Err(e) => {
            progress.finish_with_message("Catalog build failed");
            return Err(e.into());
        }
    };

    let shown: Vec<&CatalogEntry> = match search {
        Some(query) => wingetpack::search_catalog(&entries, query),
        None => entries.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    for entry in &shown {
        println!(
            "{:<40} {:<16} {}",
            entry.id,
            entry.version.as_deref().unwrap_or("-"),
            entry.name
        );
    }
    if search.is_some() {
        println!("\n{} of {} packages matched", shown.len(), entries.len());
    }
    Ok(())
}

/// Describe a package through the local winget tool
pub fn cmd_show(config: &Config, id: &str, version: Option<&str>) -> Result<()> {
    let cli = WingetCli::new(config.cli.clone());
    let descriptor = cli.show(id, version)?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}

/// Options for `resolve`, gathered from the command line
pub struct ResolveOptions {
    pub id: String,
    pub version: String,
    pub arch: Option<Architecture>,
    pub context: Option<InstallerContext>,
    pub installer_type: Option<InstallerType>,
    pub args: Option<String>,
    pub script_only: bool,
    pub manifests: Option<PathBuf>,
    pub download: Option<PathBuf>,
}

/// Resolve installer and command lines, optionally downloading the installer
pub fn cmd_resolve(config: &Config, opts: ResolveOptions) -> Result<()> {
    let source: Box<dyn ManifestSource> = match &opts.manifests {
        Some(root) => Box::new(LocalManifestSource::new(root)),
        None => Box::new(HttpManifestSource::new(&config.manifests, &config.http)?),
    };
    let manifest = source.fetch_installer_manifest(&opts.id, &opts.version)?;

    let prefs = SelectionPreferences {
        architecture: opts.arch,
        context: opts.context,
        installer_type: opts.installer_type,
        override_arguments: opts.args,
        script_only: opts.script_only,
    };
    // Seeded from the requested id/version rather than the manifest's copy
    let mut package = ResolvedPackage::new(opts.id, opts.version);
    wingetpack::resolver::resolve_into(&mut package, &manifest, &prefs, &config.cli)?;

    if let Some(dir) = &opts.download {
        let client = RepositoryClient::new(&config.http)?;
        let progress = spinner(format!("Downloading installer for {}...", package.id))?;
        match download_installer(&client, &package, dir) {
            Ok(path) => {
                progress.finish_with_message(format!("Saved {}", path.display()));
                info!("Installer verified at {}", path.display());
            }
            Err(e) => {
                progress.finish_with_message("Download failed");
                return Err(e.into());
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&package)?);
    Ok(())
}
