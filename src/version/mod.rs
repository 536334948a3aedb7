// src/version/mod.rs

//! Version ordering for winget package versions
//!
//! Winget versions are free-form strings. They are compared segment by
//! segment on `.`: numerically when both segments are integers, ordinally
//! otherwise. A missing segment sorts below any present one, so `1.0` is
//! lower than `1.0.0`. The `Unknown` sentinel sorts below every real version.

use std::cmp::Ordering;
use std::fmt;

/// Sentinel reported by winget when a version is not known
pub const UNKNOWN_VERSION: &str = "Unknown";

/// A version string with winget ordering semantics
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion(String);

impl PackageVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the unknown-version sentinel
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_VERSION
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.0, &other.0)
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings
///
/// Never fails: segments that do not parse as integers fall back to ordinal
/// string comparison.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a == UNKNOWN_VERSION, b == UNKNOWN_VERSION) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = compare_segment(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn compare_segment(l: &str, r: &str) -> Ordering {
    match (l.parse::<u64>(), r.parse::<u64>()) {
        (Ok(l), Ok(r)) => l.cmp(&r),
        _ => l.cmp(r),
    }
}

/// Return the highest version from a set of version strings
///
/// Returns `None` only for an empty input. When versions compare equal the
/// first one encountered wins.
pub fn highest_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().fold(None, |best, candidate| match best {
        Some(current) if compare_versions(candidate, current) != Ordering::Greater => {
            Some(current)
        }
        _ => Some(candidate),
    })
}
