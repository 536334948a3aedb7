// src/catalog/snapshot.rs

//! Reader for the winget index snapshot (`Public/index.db`)
//!
//! The index is a normalized SQLite database:
//!
//! | Table | Columns |
//! |-------|---------|
//! | `ids` | `rowid`, `id` |
//! | `names` | `rowid`, `name` |
//! | `versions` | `rowid`, `version` |
//! | `manifest` | `rowid`, `id`, `name`, `version`, ... (foreign keys) |
//! | `tags` | `rowid`, `tag` |
//! | `tags_map` | `manifest`, `tag` |
//!
//! Each catalog entry is rebuilt with explicit lookups (identifier, then its
//! manifests, then their tags) since the snapshot is read once and discarded.

use crate::error::{Error, Result};
use crate::model::CatalogEntry;
use crate::version::highest_version;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A manifest row with its foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestRow {
    pub rowid: i64,
    pub name_fk: i64,
    pub version_fk: i64,
}

/// Read-only view of an extracted index database
pub struct SnapshotReader {
    conn: Connection,
}

impl SnapshotReader {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ParseError(format!(
                "Snapshot index not found at {}",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// All package identifiers with their row ids
    pub fn package_ids(&self) -> Result<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare("SELECT rowid, id FROM ids")?;
        let ids = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Manifest rows referencing an identifier row
    pub fn manifests_for_id(&self, id_fk: i64) -> Result<Vec<ManifestRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT rowid, name, version FROM manifest WHERE id = ?1 ORDER BY rowid")?;
        let rows = stmt
            .query_map([id_fk], |row| {
                Ok(ManifestRow {
                    rowid: row.get(0)?,
                    name_fk: row.get(1)?,
                    version_fk: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn version(&self, rowid: i64) -> Result<String> {
        self.lookup_value("SELECT version FROM versions WHERE rowid = ?1", "version", rowid)
    }

    pub fn name(&self, rowid: i64) -> Result<String> {
        self.lookup_value("SELECT name FROM names WHERE rowid = ?1", "name", rowid)
    }

    /// Tags reachable from a set of manifests through `tags_map`
    pub fn tags_for_manifests(&self, manifests: &[i64]) -> Result<BTreeSet<String>> {
        let mut map_stmt = self
            .conn
            .prepare("SELECT tag FROM tags_map WHERE manifest = ?1")?;

        let mut tag_fks = BTreeSet::new();
        for manifest in manifests {
            let fks = map_stmt
                .query_map([manifest], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            tag_fks.extend(fks);
        }

        let mut tags = BTreeSet::new();
        for fk in tag_fks {
            tags.insert(self.lookup_value("SELECT tag FROM tags WHERE rowid = ?1", "tag", fk)?);
        }
        Ok(tags)
    }

    fn lookup_value(&self, sql: &str, what: &str, rowid: i64) -> Result<String> {
        self.conn
            .query_row(sql, [rowid], |row| row.get::<_, String>(0))
            .optional()?
            .ok_or_else(|| Error::NotFoundError(format!("{what} row {rowid} is missing")))
    }

    /// Rebuild the catalog entry for one identifier row
    pub fn catalog_entry(&self, id_fk: i64, id: &str) -> Result<CatalogEntry> {
        let manifests = self.manifests_for_id(id_fk)?;
        if manifests.is_empty() {
            return Err(Error::NotFoundError(format!("{id} has no manifests")));
        }

        let versions = manifests
            .iter()
            .map(|m| self.version(m.version_fk))
            .collect::<Result<Vec<_>>>()?;

        let highest = highest_version(versions.iter().map(String::as_str)).map(str::to_string);

        // Name comes from the manifest carrying the highest version
        let name_fk = manifests
            .iter()
            .zip(&versions)
            .find(|(_, v)| Some(v.as_str()) == highest.as_deref())
            .map_or(manifests[0].name_fk, |(m, _)| m.name_fk);
        let name = self.name(name_fk)?;

        let manifest_ids: Vec<i64> = manifests.iter().map(|m| m.rowid).collect();
        let tags = self.tags_for_manifests(&manifest_ids)?;

        Ok(CatalogEntry {
            id: id.to_string(),
            name,
            version: highest,
            tags,
        })
    }

    /// Rebuild every catalog entry, sorted by identifier
    ///
    /// An identifier that fails to reconstruct is logged and skipped.
    /// `cancel` is checked before each identifier; once set, the build stops
    /// and returns [`Error::Cancelled`].
    pub fn read_catalog(&self, cancel: &AtomicBool) -> Result<Vec<CatalogEntry>> {
        let ids = self.package_ids()?;
        info!("Rebuilding catalog from {} package identifiers", ids.len());

        let mut entries = Vec::with_capacity(ids.len());
        let mut skipped = 0usize;
        for (rowid, id) in ids {
            if cancel.load(Ordering::Relaxed) {
                info!("Catalog build cancelled after {} entries", entries.len());
                return Err(Error::Cancelled);
            }

            match self.catalog_entry(rowid, &id) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("Skipping catalog entry {}: {}", id, e);
                    skipped += 1;
                }
            }
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Catalog built: {} entries, {} skipped", entries.len(), skipped);
        Ok(entries)
    }
}
