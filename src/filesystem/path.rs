// src/filesystem/path.rs

//! Path sanitization utilities for security
//!
//! Archive entry names and installer filenames come from remote sources. These
//! helpers make sure they cannot write outside their intended directory.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve an archive entry name against an extraction root
///
/// The entry is normalized lexically (`.` dropped, `..` pops a component) and
/// must stay a descendant of `root`. Leading separators are treated as
/// relative to the root. Nothing touches the filesystem, so this can run
/// before any bytes are written.
///
/// # Examples
///
/// ```
/// use wingetpack::filesystem::path::resolve_entry_path;
/// use std::path::{Path, PathBuf};
///
/// let root = Path::new("/tmp/extract");
/// assert_eq!(
///     resolve_entry_path(root, "Public/index.db").unwrap(),
///     PathBuf::from("/tmp/extract/Public/index.db")
/// );
/// assert!(resolve_entry_path(root, "../../evil.txt").is_err());
/// ```
pub fn resolve_entry_path(root: impl AsRef<Path>, entry: &str) -> Result<PathBuf> {
    let root = root.as_ref();
    // Zip entries may use either separator
    let normalized_name = entry.replace('\\', "/");
    let relative = normalized_name.trim_start_matches('/');

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(c) => parts.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(Error::PathTraversal(format!(
                        "Entry '{}' escapes {}",
                        entry,
                        root.display()
                    )));
                }
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(Error::PathTraversal(format!(
                    "Entry '{}' is an absolute path",
                    entry
                )));
            }
        }
    }

    if parts.is_empty() {
        return Err(Error::InvalidPath(format!("Entry '{}' resolves to the root", entry)));
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Ok(resolved)
}

/// Sanitize a filename (single path component) from an untrusted source
///
/// Rejects path separators and the `.`/`..` names.
///
/// # Examples
///
/// ```
/// use wingetpack::filesystem::path::sanitize_filename;
///
/// assert_eq!(sanitize_filename("setup-1.0.exe").unwrap(), "setup-1.0.exe");
/// assert!(sanitize_filename("../setup.exe").is_err());
/// ```
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name.contains('/') || name.contains('\\') {
        return Err(Error::PathTraversal(format!(
            "Filename contains path separator: {}",
            name
        )));
    }

    if name == ".." || name == "." {
        return Err(Error::PathTraversal(format!("Invalid filename: {}", name)));
    }

    if name.is_empty() {
        return Err(Error::InvalidPath("Empty filename".to_string()));
    }

    Ok(name.to_string())
}
