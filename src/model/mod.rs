// src/model/mod.rs

//! Data model shared by the parser, catalog builder and resolver

pub mod manifest;
pub mod package;
pub mod resolved;

pub use manifest::{
    AppsAndFeaturesEntry, Architecture, InstallerContext, InstallerManifest, InstallerSwitches,
    InstallerType, InstallerVariant,
};
pub use package::{CatalogEntry, PackageDescriptor, PackageSource};
pub use resolved::{ResolvedPackage, SelectionPreferences};
