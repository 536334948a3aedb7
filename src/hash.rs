// src/hash.rs

//! SHA-256 hashing for installer integrity
//!
//! Winget manifests publish an `InstallerSha256` per variant. Manifests write
//! it in upper case, so comparisons are case-insensitive.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 of everything a reader yields
pub fn sha256_reader<R: Read>(reader: &mut R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify a file matches an expected SHA-256
///
/// Streams the file content to avoid loading it entirely into memory.
pub fn verify_file_sha256(path: &Path, expected: &str) -> Result<()> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {e}", path.display())))?;
    let actual = sha256_reader(&mut file)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {e}", path.display())))?;

    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
