// src/resolver/mod.rs

//! Installer resolution
//!
//! Turns an installer manifest plus caller preferences into a
//! [`ResolvedPackage`]: [`selector`] picks the variant and derives its file
//! details, [`commands`] fills in the install and uninstall command lines.

pub mod commands;
pub mod selector;

pub use commands::CommandSynthesizer;
pub use selector::{InstallerResolver, installer_filename};

use crate::config::CliConfig;
use crate::error::Result;
use crate::model::{InstallerManifest, ResolvedPackage, SelectionPreferences};

/// Enrich an existing package record from `manifest`
///
/// Used when the record was seeded from a catalog entry or `winget show`
/// output and already carries a name or publisher.
pub fn resolve_into(
    package: &mut ResolvedPackage,
    manifest: &InstallerManifest,
    prefs: &SelectionPreferences,
    cli: &CliConfig,
) -> Result<()> {
    let variant = InstallerResolver::resolve(manifest, prefs)?;
    InstallerResolver::apply(package, variant, prefs);
    CommandSynthesizer::new(cli.clone()).synthesize(package, variant, prefs);
    Ok(())
}

/// Resolve a fresh package record for the manifest's id and version
pub fn resolve_package(
    manifest: &InstallerManifest,
    prefs: &SelectionPreferences,
    cli: &CliConfig,
) -> Result<ResolvedPackage> {
    let mut package = ResolvedPackage::new(
        manifest.package_identifier.clone(),
        manifest.package_version.clone(),
    );
    resolve_into(&mut package, manifest, prefs, cli)?;
    Ok(package)
}
