// src/catalog/extract.rs

//! Safe extraction of the snapshot archive
//!
//! The winget source package (`source.msix`) is a zip container. Every entry
//! name is resolved against the destination before anything is written; an
//! entry that would land outside it aborts the whole extraction.

use crate::error::{Error, Result};
use crate::filesystem::path::resolve_entry_path;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Extract every file entry of `archive_path` into `dest`
///
/// Directory entries are skipped; parent directories are created only for
/// files. Returns the number of files written.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path).map_err(|e| {
        Error::IoError(format!("Failed to open archive {}: {e}", archive_path.display()))
    })?;
    let mut zip = ZipArchive::new(file)?;

    fs::create_dir_all(dest).map_err(|e| {
        Error::IoError(format!("Failed to create directory {}: {e}", dest.display()))
    })?;

    let mut extracted = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;

        if entry.is_dir() {
            // Never created, so a name resolving to the root itself is harmless
            match resolve_entry_path(dest, entry.name()) {
                Ok(_) | Err(Error::InvalidPath(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        let out_path = resolve_entry_path(dest, entry.name())?;

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let mut out = File::create(&out_path).map_err(|e| {
            Error::IoError(format!("Failed to create {}: {e}", out_path.display()))
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            Error::IoError(format!("Failed to extract {}: {e}", out_path.display()))
        })?;
        extracted += 1;
    }

    debug!("Extracted {} files from {}", extracted, archive_path.display());
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, Option<&[u8]>)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            match content {
                Some(bytes) => {
                    zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                    zip.write_all(bytes).unwrap();
                }
                None => zip.add_directory(*name, SimpleFileOptions::default()).unwrap(),
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("source.msix");
        write_zip(
            &archive,
            &[
                ("AppxManifest.xml", Some(b"<Package/>")),
                ("Public/index.db", Some(b"db")),
            ],
        );

        let dest = dir.path().join("out");
        assert_eq!(extract_archive(&archive, &dest).unwrap(), 2);
        assert_eq!(fs::read(dest.join("Public/index.db")).unwrap(), b"db");
    }

    #[test]
    fn test_directory_entries_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("source.msix");
        write_zip(&archive, &[("Empty/", None), ("a.txt", Some(b"a"))]);

        let dest = dir.path().join("out");
        assert_eq!(extract_archive(&archive, &dest).unwrap(), 1);
        assert!(!dest.join("Empty").exists());
    }

    #[test]
    fn test_root_directory_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("source.msix");
        write_zip(&archive, &[("./", None), ("Public/index.db", Some(b"db"))]);

        let dest = dir.path().join("out");
        assert_eq!(extract_archive(&archive, &dest).unwrap(), 1);
        assert!(dest.join("Public/index.db").is_file());
    }

    #[test]
    fn test_traversing_directory_entry_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../escape/", None)]);

        let err = extract_archive(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::PathTraversal(_)));
    }

    #[test]
    fn test_zip_slip_rejected_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../../evil.txt", Some(b"pwned"))]);

        let dest = dir.path().join("a").join("b");
        let err = extract_archive(&archive, &dest).unwrap_err();
        assert!(matches!(err, Error::PathTraversal(_)));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.msix");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_archive(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::ArchiveError(_)));
    }
}
