// src/packages/show.rs

//! Parser for `winget show` text output
//!
//! The output is a loose block of `Label: value` lines:
//!
//! ```text
//! Found Visual Studio Code [Microsoft.VisualStudioCode]
//! Version: 1.85.1
//! Publisher: Microsoft Corporation
//! Publisher Url: https://code.visualstudio.com
//! Description: Code editing. Redefined.
//!   Free and built on open source.
//! Homepage: https://code.visualstudio.com
//! Installer:
//!   Installer Type: inno
//!   Installer Url: https://update.code.visualstudio.com/1.85.1/win32-x64-user/stable
//!   Installer SHA256: 6f2f...
//! ```
//!
//! Labels are exact, case-sensitive prefixes. When a label appears more than
//! once only its first occurrence counts. Store packages (`msstore`) carry no
//! installer details.

use crate::error::{Error, Result};
use crate::model::{InstallerType, PackageDescriptor, PackageSource};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

const FOUND: &str = "Found ";
const VERSION: &str = "Version:";
const PUBLISHER: &str = "Publisher:";
const PUBLISHER_URL: &str = "Publisher Url:";
const PUBLISHER_SUPPORT_URL: &str = "Publisher Support Url:";
const HOMEPAGE: &str = "Homepage:";
const DESCRIPTION: &str = "Description:";
const INSTALLER_TYPE: &str = "Installer Type:";
const INSTALLER_URL: &str = "Installer Url:";
const INSTALLER_SHA256: &str = "Installer SHA256:";

/// Marker that switches the whole record to the store interpretation
pub const STORE_MARKER: &str = "Installer Type: msstore";

const LABELS: &[&str] = &[
    FOUND,
    VERSION,
    PUBLISHER,
    PUBLISHER_URL,
    PUBLISHER_SUPPORT_URL,
    HOMEPAGE,
    DESCRIPTION,
    INSTALLER_TYPE,
    INSTALLER_URL,
    INSTALLER_SHA256,
];

/// Continuation lines of a multi-line field are indented by two spaces
const CONTINUATION_INDENT: &str = "  ";

/// Parse a `winget show` record into a [`PackageDescriptor`]
///
/// Missing fields stay `None`. The only failure is a URL field whose value is
/// not an absolute URI.
pub fn parse_show_output(text: &str) -> Result<PackageDescriptor> {
    let fields = scan_fields(text);
    // A label seen first with an empty value stays empty
    let value = |label: &str| fields.get(label).filter(|v| !v.is_empty());
    let field = |label: &str| value(label).cloned();

    let (name, id) = value(FOUND)
        .and_then(|header| split_header(header))
        .unzip();

    let mut descriptor = PackageDescriptor {
        id,
        name,
        version: field(VERSION),
        publisher: field(PUBLISHER),
        publisher_url: parse_url(PUBLISHER_URL, value(PUBLISHER_URL))?,
        publisher_support_url: parse_url(
            PUBLISHER_SUPPORT_URL,
            value(PUBLISHER_SUPPORT_URL),
        )?,
        homepage: parse_url(HOMEPAGE, value(HOMEPAGE))?,
        description: field(DESCRIPTION),
        ..Default::default()
    };

    if text.contains(STORE_MARKER) {
        descriptor.source = PackageSource::Store;
    } else {
        descriptor.source = PackageSource::Winget;
        descriptor.installer_type = value(INSTALLER_TYPE).map(|t| map_installer_type(t));
        descriptor.installer_url = parse_url(INSTALLER_URL, value(INSTALLER_URL))?;
        descriptor.installer_sha256 = field(INSTALLER_SHA256);
    }

    debug!(
        "Parsed show output for {:?} (source: {:?})",
        descriptor.id, descriptor.source
    );
    Ok(descriptor)
}

/// Single pass over the lines, keeping the first value seen for each label
fn scan_fields(text: &str) -> HashMap<&'static str, String> {
    let mut fields = HashMap::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        let Some((label, rest)) = LABELS
            .iter()
            .find_map(|label| trimmed.strip_prefix(label).map(|rest| (*label, rest)))
        else {
            continue;
        };

        let value = if label == DESCRIPTION {
            let mut parts = vec![rest.trim()];
            while let Some(next) = lines.peek() {
                if next.trim().is_empty() || next.starts_with(CONTINUATION_INDENT) {
                    parts.push(next.trim());
                    lines.next();
                } else {
                    break;
                }
            }
            parts.join("\n").trim().to_string()
        } else {
            rest.trim().to_string()
        };

        fields.entry(label).or_insert(value);
    }

    fields
}

/// Split `Visual Studio Code [Microsoft.VisualStudioCode]` into name and id
fn split_header(header: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let (last, rest) = tokens.split_last()?;
    let id = last.strip_prefix('[')?.strip_suffix(']')?;
    if id.is_empty() {
        return None;
    }
    Some((rest.join(" "), id.to_string()))
}

fn parse_url(label: &str, value: Option<&String>) -> Result<Option<Url>> {
    let Some(value) = value else {
        return Ok(None);
    };

    Url::parse(value).map(Some).map_err(|e| Error::InvalidUrl {
        field: label.trim_end_matches(':').to_string(),
        value: value.clone(),
        reason: e.to_string(),
    })
}

/// `winget show` only distinguishes msi and inno; everything else is unknown
fn map_installer_type(value: &str) -> InstallerType {
    match value {
        "msi" => InstallerType::Msi,
        "inno" => InstallerType::InnoSetup,
        _ => InstallerType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VSCODE: &str = "Found Visual Studio Code [Microsoft.VisualStudioCode]
Version: 1.85.1
Publisher: Microsoft Corporation
Publisher Url: https://code.visualstudio.com
Publisher Support Url: https://code.visualstudio.com/support
Author: Microsoft Corporation
Moniker: vscode
Description: Visual Studio Code is a lightweight but powerful source code editor.
  It comes with built-in support for JavaScript.

  Extensions add more languages.
Homepage: https://code.visualstudio.com
License: Microsoft Software License
Installer:
  Installer Type: inno
  Installer Url: https://update.code.visualstudio.com/1.85.1/win32-x64-user/stable
  Installer SHA256: 6f2fa1b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f
";

    const STORE: &str = "Found Microsoft To Do [9NBLGGH5R558]
Version: Unknown
Publisher: Microsoft Corporation
Publisher Url: https://www.microsoft.com
Description: Stay organized and manage your day-to-day.
Installer:
  Installer Type: msstore
  Store Product Id: 9NBLGGH5R558
";

    #[test]
    fn test_parse_winget_package() {
        let pkg = parse_show_output(VSCODE).unwrap();

        assert_eq!(pkg.id.as_deref(), Some("Microsoft.VisualStudioCode"));
        assert_eq!(pkg.name.as_deref(), Some("Visual Studio Code"));
        assert_eq!(pkg.version.as_deref(), Some("1.85.1"));
        assert_eq!(pkg.publisher.as_deref(), Some("Microsoft Corporation"));
        assert_eq!(
            pkg.publisher_support_url.as_ref().map(Url::as_str),
            Some("https://code.visualstudio.com/support")
        );
        assert_eq!(pkg.source, PackageSource::Winget);
        assert_eq!(pkg.installer_type, Some(InstallerType::InnoSetup));
        assert_eq!(
            pkg.installer_url.as_ref().map(Url::as_str),
            Some("https://update.code.visualstudio.com/1.85.1/win32-x64-user/stable")
        );
        assert!(pkg.installer_sha256.unwrap().starts_with("6f2fa1"));
    }

    #[test]
    fn test_multiline_description() {
        let pkg = parse_show_output(VSCODE).unwrap();
        assert_eq!(
            pkg.description.as_deref(),
            Some(
                "Visual Studio Code is a lightweight but powerful source code editor.\n\
                 It comes with built-in support for JavaScript.\n\
                 \n\
                 Extensions add more languages."
            )
        );
    }

    #[test]
    fn test_description_reparse_is_stable() {
        let pkg = parse_show_output(VSCODE).unwrap();
        let description = pkg.description.unwrap();

        let mut lines = description.lines();
        let mut text = format!("Description: {}\n", lines.next().unwrap());
        for line in lines {
            text.push_str(&format!("  {line}\n"));
        }
        text.push_str("Homepage: https://example.com\n");

        let reparsed = parse_show_output(&text).unwrap();
        assert_eq!(reparsed.description.as_deref(), Some(description.as_str()));
    }

    #[test]
    fn test_store_package_has_no_installer_fields() {
        let text = format!("{STORE}  Installer Url: https://example.com/x.exe\n  Installer SHA256: abc\n");
        let pkg = parse_show_output(&text).unwrap();

        assert_eq!(pkg.source, PackageSource::Store);
        assert_eq!(pkg.id.as_deref(), Some("9NBLGGH5R558"));
        assert_eq!(pkg.name.as_deref(), Some("Microsoft To Do"));
        assert!(pkg.installer_type.is_none());
        assert!(pkg.installer_url.is_none());
        assert!(pkg.installer_sha256.is_none());
    }

    #[test]
    fn test_installer_type_mapping() {
        for (raw, expected) in [
            ("msi", InstallerType::Msi),
            ("inno", InstallerType::InnoSetup),
            ("exe", InstallerType::Unknown),
            ("burn", InstallerType::Unknown),
            ("MSI", InstallerType::Unknown),
        ] {
            let text = format!("Installer Type: {raw}\n");
            let pkg = parse_show_output(&text).unwrap();
            assert_eq!(pkg.source, PackageSource::Winget);
            assert_eq!(pkg.installer_type, Some(expected), "installer type {raw}");
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "Version: 1.0\nVersion: 2.0\nPublisher: First\nPublisher: Second\n";
        let pkg = parse_show_output(text).unwrap();
        assert_eq!(pkg.version.as_deref(), Some("1.0"));
        assert_eq!(pkg.publisher.as_deref(), Some("First"));
    }

    #[test]
    fn test_empty_first_occurrence_wins() {
        let text = "Version:\nVersion: 2.0\nHomepage:\nHomepage: not a url\n";
        let pkg = parse_show_output(text).unwrap();
        assert!(pkg.version.is_none());
        assert!(pkg.homepage.is_none());
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let pkg = parse_show_output("version: 1.0\nPUBLISHER: Someone\n").unwrap();
        assert!(pkg.version.is_none());
        assert!(pkg.publisher.is_none());
    }

    #[test]
    fn test_missing_header_leaves_identity_unset() {
        let pkg = parse_show_output("Version: 3.0\n").unwrap();
        assert!(pkg.id.is_none());
        assert!(pkg.name.is_none());
        assert_eq!(pkg.version.as_deref(), Some("3.0"));
    }

    #[test]
    fn test_empty_input() {
        let pkg = parse_show_output("").unwrap();
        assert_eq!(pkg, PackageDescriptor {
            source: PackageSource::Winget,
            ..Default::default()
        });
    }

    #[test]
    fn test_malformed_url_is_error() {
        let err = parse_show_output("Homepage: not a url\n").unwrap_err();
        match err {
            Error::InvalidUrl { field, value, .. } => {
                assert_eq!(field, "Homepage");
                assert_eq!(value, "not a url");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Found Foo [Foo.Bar]\r\nVersion: 1.2\r\nInstaller Type: msi\r\n";
        let pkg = parse_show_output(text).unwrap();
        assert_eq!(pkg.id.as_deref(), Some("Foo.Bar"));
        assert_eq!(pkg.version.as_deref(), Some("1.2"));
        assert_eq!(pkg.installer_type, Some(InstallerType::Msi));
    }
}
