// tests/catalog.rs

//! Catalog build tests: snapshot extraction, reconstruction, cleanup, search.

mod common;

use common::SnapshotRow;
use std::sync::atomic::AtomicBool;
use wingetpack::catalog::find_entry;
use wingetpack::config::{CatalogConfig, HttpConfig};
use wingetpack::{CatalogBuilder, Error, search_catalog};

fn builder(scratch: &std::path::Path) -> CatalogBuilder {
    let config = CatalogConfig {
        scratch_dir: Some(scratch.to_path_buf()),
        ..Default::default()
    };
    CatalogBuilder::new(config, &HttpConfig::default()).unwrap()
}

fn leftover_scratch(scratch: &std::path::Path) -> usize {
    std::fs::read_dir(scratch).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_highest_version_across_manifest_rows() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = common::write_snapshot(
        temp_dir.path(),
        &[
            SnapshotRow { id: "Foo.Bar", name: "Foo Bar", version: "1.0", tags: &["utility"] },
            SnapshotRow { id: "Foo.Bar", name: "Foo Bar", version: "1.2", tags: &["cli"] },
            SnapshotRow { id: "Foo.Bar", name: "Foo Bar", version: "1.1", tags: &[] },
            SnapshotRow { id: "Git.Git", name: "Git", version: "2.9.0", tags: &["vcs"] },
            SnapshotRow { id: "Git.Git", name: "Git", version: "2.10.0", tags: &["vcs"] },
        ],
    );
    let scratch = temp_dir.path().join("scratch");

    let entries = builder(&scratch)
        .build_from_archive(&archive, &AtomicBool::new(false))
        .unwrap();

    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["Foo.Bar", "Git.Git"]);

    let foo = find_entry(&entries, "Foo.Bar").unwrap();
    assert_eq!(foo.version.as_deref(), Some("1.2"));
    assert!(foo.tags.contains("utility") && foo.tags.contains("cli"));

    let git = find_entry(&entries, "Git.Git").unwrap();
    assert_eq!(git.version.as_deref(), Some("2.10.0"));

    assert_eq!(leftover_scratch(&scratch), 0);
}

#[test]
fn test_search_built_catalog() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = common::write_snapshot(
        temp_dir.path(),
        &[
            SnapshotRow { id: "Mozilla.Firefox", name: "Mozilla Firefox", version: "121.0", tags: &["browser"] },
            SnapshotRow { id: "Git.Git", name: "Git", version: "2.43.0", tags: &["vcs"] },
        ],
    );

    let entries = builder(&temp_dir.path().join("scratch"))
        .build_from_archive(&archive, &AtomicBool::new(false))
        .unwrap();

    let hits = search_catalog(&entries, "BROWSER");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "Mozilla.Firefox");
    assert_eq!(search_catalog(&entries, "git").len(), 1);
}

#[test]
fn test_zip_slip_aborts_build_and_cleans_up() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = temp_dir.path().join("evil.msix");
    common::write_zip(
        &archive,
        &[
            ("Public/readme.txt", b"ok".as_slice()),
            ("../../evil.txt", b"pwned".as_slice()),
        ],
    );
    let scratch = temp_dir.path().join("scratch");

    let err = builder(&scratch)
        .build_from_archive(&archive, &AtomicBool::new(false))
        .unwrap_err();

    assert!(matches!(err, Error::PathTraversal(_)));
    assert!(!temp_dir.path().join("evil.txt").exists());
    assert_eq!(leftover_scratch(&scratch), 0);
}

#[test]
fn test_cancelled_build() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = common::write_snapshot(
        temp_dir.path(),
        &[SnapshotRow { id: "Foo.Bar", name: "Foo Bar", version: "1.0", tags: &[] }],
    );
    let scratch = temp_dir.path().join("scratch");

    let err = builder(&scratch)
        .build_from_archive(&archive, &AtomicBool::new(true))
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(leftover_scratch(&scratch), 0);
}

#[test]
fn test_download_failure_aborts_and_cleans_up() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scratch = temp_dir.path().join("scratch");
    let config = CatalogConfig {
        scratch_dir: Some(scratch.clone()),
        ..Default::default()
    };
    let http = HttpConfig {
        timeout_secs: 5,
        max_retries: 1,
    };

    // Nothing listens on port 1, so the connection is refused immediately
    let err = CatalogBuilder::new(config, &http)
        .unwrap()
        .build("http://127.0.0.1:1/source.msix", &AtomicBool::new(false))
        .unwrap_err();

    assert!(matches!(err, Error::DownloadError(_)));
    assert_eq!(leftover_scratch(&scratch), 0);
}
