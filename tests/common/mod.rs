// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use rusqlite::Connection;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// One manifest row of a fabricated index snapshot
pub struct SnapshotRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub version: &'a str,
    pub tags: &'a [&'a str],
}

fn lookup_or_insert(conn: &Connection, table: &str, column: &str, value: &str) -> i64 {
    let existing: Option<i64> = conn
        .query_row(
            &format!("SELECT rowid FROM {table} WHERE {column} = ?1"),
            [value],
            |row| row.get(0),
        )
        .ok();
    existing.unwrap_or_else(|| {
        conn.execute(&format!("INSERT INTO {table}({column}) VALUES (?1)"), [value])
            .unwrap();
        conn.last_insert_rowid()
    })
}

/// Write an index database with the given manifest rows.
pub fn write_index_db(path: &Path, rows: &[SnapshotRow<'_>]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE ids(id TEXT NOT NULL);
         CREATE TABLE names(name TEXT NOT NULL);
         CREATE TABLE versions(version TEXT NOT NULL);
         CREATE TABLE tags(tag TEXT NOT NULL);
         CREATE TABLE manifest(id INT64 NOT NULL, name INT64 NOT NULL, moniker INT64,
                               version INT64 NOT NULL, channel INT64, pathpart INT64);
         CREATE TABLE tags_map(manifest INT64 NOT NULL, tag INT64 NOT NULL);",
    )
    .unwrap();

    for row in rows {
        let id = lookup_or_insert(&conn, "ids", "id", row.id);
        let name = lookup_or_insert(&conn, "names", "name", row.name);
        let version = lookup_or_insert(&conn, "versions", "version", row.version);
        conn.execute(
            "INSERT INTO manifest(id, name, version) VALUES (?1, ?2, ?3)",
            [id, name, version],
        )
        .unwrap();
        let manifest = conn.last_insert_rowid();

        for tag in row.tags {
            let tag = lookup_or_insert(&conn, "tags", "tag", tag);
            conn.execute(
                "INSERT INTO tags_map(manifest, tag) VALUES (?1, ?2)",
                [manifest, tag],
            )
            .unwrap();
        }
    }
}

/// Write a zip archive with the given (name, content) file entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

/// Build a `source.msix` snapshot in `dir` laid out like the published one.
pub fn write_snapshot(dir: &Path, rows: &[SnapshotRow<'_>]) -> PathBuf {
    let db_path = dir.join("index.db");
    write_index_db(&db_path, rows);
    let db = std::fs::read(&db_path).unwrap();

    let archive = dir.join("source.msix");
    write_zip(
        &archive,
        &[
            ("AppxManifest.xml", b"<Package/>".as_slice()),
            ("Public/index.db", db.as_slice()),
        ],
    );
    archive
}

/// Place an installer manifest in a local `manifests/` tree.
pub fn write_manifest(root: &Path, id: &str, version: &str, yaml: &str) {
    let first = id.chars().next().unwrap().to_lowercase().to_string();
    let mut dir = root.join(first);
    for segment in id.split('.') {
        dir.push(segment);
    }
    dir.push(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{id}.installer.yaml")), yaml).unwrap();
}
