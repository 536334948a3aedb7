// src/resolver/commands.rs

//! Install/uninstall command synthesis
//!
//! Each installer technology has its own silent switches:
//!
//! | Type | Install | Added when absent | Uninstall |
//! |------|---------|-------------------|-----------|
//! | Inno Setup | `"<file>" <switches>` | `/VERYSILENT /SUPPRESSMSGBOXES /NORESTART /SP-` | - |
//! | Burn | `"<file>" <switches>` | `/quiet /norestart /install` | `"<file>" /quiet /norestart /uninstall /passive` |
//! | Nullsoft | `"<file>" <switches>` | `/S` | - |
//! | Exe | `"<file>" <switches>` | - | - |
//!
//! Anything the table leaves empty is filled with a `winget` invocation, so
//! synthesis always yields both commands.

use crate::config::CliConfig;
use crate::model::{
    InstallerContext, InstallerType, InstallerVariant, ResolvedPackage, SelectionPreferences,
};
use crate::version::UNKNOWN_VERSION;
use tracing::debug;

const INNO_DEFAULT_SWITCHES: &str = "/VERYSILENT /SUPPRESSMSGBOXES /NORESTART /SP-";
const BURN_DEFAULT_SWITCHES: &str = "/quiet /norestart /install";
const BURN_UNINSTALL_SWITCHES: &str = "/quiet /norestart /uninstall /passive";
const NULLSOFT_DEFAULT_SWITCHES: &str = "/S";

/// Fills in install and uninstall command lines
pub struct CommandSynthesizer {
    cli: CliConfig,
}

impl CommandSynthesizer {
    pub fn new(cli: CliConfig) -> Self {
        Self { cli }
    }

    /// Populate the command fields of `package` for the chosen `variant`
    pub fn synthesize(
        &self,
        package: &mut ResolvedPackage,
        variant: &InstallerVariant,
        prefs: &SelectionPreferences,
    ) {
        if !prefs.script_only {
            self.apply_installer_policy(package, variant, prefs);
        } else {
            debug!("Script-only mode for {}, using {} directly", package.id, self.cli.executable);
        }

        if is_blank(&package.install_command) {
            package.install_command = Some(self.cli_install_command(package));
        }
        if is_blank(&package.uninstall_command) {
            package.uninstall_command = Some(self.cli_uninstall_command(package));
        }

        apply_product_hints(package, variant);
    }

    fn apply_installer_policy(
        &self,
        package: &mut ResolvedPackage,
        variant: &InstallerVariant,
        prefs: &SelectionPreferences,
    ) {
        let switches = prefs
            .override_arguments
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| variant.switches.as_ref().and_then(|s| s.preferred()))
            .unwrap_or_default();

        let file = package
            .installer_filename
            .clone()
            .unwrap_or_else(|| super::selector::installer_filename(package, variant));

        match variant.installer_type {
            InstallerType::InnoSetup => {
                let switches = if contains_switch(switches, "/VERYSILENT") {
                    switches.to_string()
                } else {
                    join_switches(switches, INNO_DEFAULT_SWITCHES)
                };
                package.install_command = Some(file_command(&file, &switches));
            }
            InstallerType::Burn => {
                let switches = if contains_switch(switches, "/quiet") {
                    switches.to_string()
                } else {
                    join_switches(switches, BURN_DEFAULT_SWITCHES)
                };
                package.install_command = Some(file_command(&file, &dedupe_switches(&switches)));
                package.uninstall_command = Some(file_command(&file, BURN_UNINSTALL_SWITCHES));
            }
            InstallerType::Nullsoft => {
                let switches = if switches.is_empty() {
                    NULLSOFT_DEFAULT_SWITCHES
                } else {
                    switches
                };
                package.install_command = Some(file_command(&file, switches));
            }
            InstallerType::Exe => {
                package.install_command = Some(file_command(&file, switches));
            }
            other => debug!("No installer policy for {} packages", other),
        }
    }

    /// `winget install` for the exact id and version
    fn cli_install_command(&self, package: &ResolvedPackage) -> String {
        let mut parts = vec![
            self.cli.executable.clone(),
            "install".to_string(),
            "--id".to_string(),
            package.id.clone(),
        ];
        if !package.version.is_empty() && package.version != UNKNOWN_VERSION {
            parts.push("--version".to_string());
            parts.push(package.version.clone());
        }
        parts.push("--exact".to_string());
        parts.extend(scope_args(package.context));
        parts.push("--silent".to_string());
        if self.cli.accept_agreements {
            parts.push("--accept-package-agreements".to_string());
            parts.push("--accept-source-agreements".to_string());
        }
        parts.join(" ")
    }

    fn cli_uninstall_command(&self, package: &ResolvedPackage) -> String {
        let mut parts = vec![
            self.cli.executable.clone(),
            "uninstall".to_string(),
            "--id".to_string(),
            package.id.clone(),
            "--exact".to_string(),
        ];
        parts.extend(scope_args(package.context));
        parts.push("--silent".to_string());
        if self.cli.accept_agreements {
            parts.push("--accept-source-agreements".to_string());
        }
        parts.join(" ")
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn scope_args(context: Option<InstallerContext>) -> Vec<String> {
    match context {
        Some(InstallerContext::Machine) => vec!["--scope".to_string(), "machine".to_string()],
        Some(InstallerContext::User) => vec!["--scope".to_string(), "user".to_string()],
        _ => Vec::new(),
    }
}

fn contains_switch(switches: &str, switch: &str) -> bool {
    switches
        .to_ascii_lowercase()
        .contains(&switch.to_ascii_lowercase())
}

fn join_switches(switches: &str, defaults: &str) -> String {
    if switches.is_empty() {
        defaults.to_string()
    } else {
        format!("{switches} {defaults}")
    }
}

/// Drop repeated switch tokens, keeping the first occurrence
fn dedupe_switches(switches: &str) -> String {
    let mut seen = Vec::new();
    for token in switches.split(' ').filter(|t| !t.is_empty()) {
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen.join(" ")
}

fn file_command(file: &str, switches: &str) -> String {
    if switches.is_empty() {
        format!("\"{file}\"")
    } else {
        format!("\"{file}\" {switches}")
    }
}

/// Product code and version for uninstall detection, never overwriting
fn apply_product_hints(package: &mut ResolvedPackage, variant: &InstallerVariant) {
    let entry = variant.apps_and_features_entries.first();

    if package.msi_product_code.is_none() {
        package.msi_product_code = variant
            .product_code
            .clone()
            .or_else(|| entry.and_then(|e| e.product_code.clone()));
    }
    if package.msi_version.is_none() {
        package.msi_version = entry.and_then(|e| e.display_version.clone());
    }
}
