// src/resolver/selector.rs

//! Installer variant selection
//!
//! A manifest usually lists several installers for one package version
//! (per architecture, scope and technology). Selection filters them by the
//! caller's preferences and takes the first survivor in manifest order.

use crate::error::{Error, Result};
use crate::model::{
    InstallerContext, InstallerManifest, InstallerVariant, ResolvedPackage, SelectionPreferences,
};
use tracing::{debug, info};
use url::Url;

/// Picks the installer variant for a package
pub struct InstallerResolver;

impl InstallerResolver {
    /// Check a single variant against every preference axis
    ///
    /// An unspecified axis matches anything. A variant that declares no scope
    /// matches any requested context.
    pub fn matches(variant: &InstallerVariant, prefs: &SelectionPreferences) -> bool {
        prefs
            .installer_type
            .is_none_or(|t| t == variant.installer_type)
            && prefs.architecture.is_none_or(|a| a == variant.architecture)
            && prefs
                .context
                .is_none_or(|c| declared_scope(variant).is_none_or(|s| s == c))
    }

    /// Select the first variant matching `prefs`, in manifest order
    pub fn resolve<'a>(
        manifest: &'a InstallerManifest,
        prefs: &SelectionPreferences,
    ) -> Result<&'a InstallerVariant> {
        debug!(
            "Selecting installer for {} {} from {} variants",
            manifest.package_identifier,
            manifest.package_version,
            manifest.installers.len()
        );

        manifest
            .installers
            .iter()
            .find(|v| Self::matches(v, prefs))
            .ok_or_else(|| Error::NoMatchingInstaller {
                identifier: manifest.package_identifier.clone(),
                version: manifest.package_version.clone(),
                architecture: describe(prefs.architecture),
                context: describe(prefs.context),
                installer_type: describe(prefs.installer_type),
            })
    }

    /// Copy what the chosen variant decides onto the package being resolved
    pub fn apply(
        package: &mut ResolvedPackage,
        variant: &InstallerVariant,
        prefs: &SelectionPreferences,
    ) {
        package.installer_url = Some(variant.url.clone());
        package.installer_sha256 =
            Some(variant.sha256.clone()).filter(|hash| !hash.trim().is_empty());
        package.architecture = Some(variant.architecture);
        package.installer_type = Some(variant.installer_type);
        package.context = declared_scope(variant).or(prefs.context);
        package.installer_filename = Some(installer_filename(package, variant));

        info!(
            "Selected {} {} installer for {} {}",
            variant.architecture, variant.installer_type, package.id, package.version
        );
    }
}

/// The variant's scope, treating `Unknown` as undeclared
fn declared_scope(variant: &InstallerVariant) -> Option<InstallerContext> {
    variant
        .scope
        .filter(|scope| *scope != InstallerContext::Unknown)
}

fn describe<T: ToString>(axis: Option<T>) -> String {
    axis.map_or_else(|| "any".to_string(), |v| v.to_string())
}

/// Last path segment of an installer URL with spaces removed
fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    let name = segment.replace("%20", "").replace(' ', "");
    (!name.is_empty()).then_some(name)
}

/// Filename the installer is saved and invoked as
///
/// Exe and Burn installers are often served without an extension; they
/// always get `.exe`.
pub fn installer_filename(package: &ResolvedPackage, variant: &InstallerVariant) -> String {
    let mut name = filename_from_url(&variant.url).unwrap_or_else(|| {
        format!(
            "{}_{}.{}",
            package.id,
            package.version,
            variant.installer_type.default_extension()
        )
    });

    if matches!(
        variant.installer_type,
        crate::model::InstallerType::Exe | crate::model::InstallerType::Burn
    ) && !name.to_ascii_lowercase().ends_with(".exe")
    {
        name.push_str(".exe");
    }
    name
}
