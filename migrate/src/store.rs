//! Filesystem migration store (spec §5, component C4).
//!
//! Each migration is a single JSON artifact named `<version>_<slug>.json`,
//! unlike the teacher's per-migration directory of `up.sql`/`down.sql` files
//! — the planner already produces a fully reversible [`Migration`] as one
//! value, so there's nothing to split across files.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;

/// Reads and writes migration artifacts under a directory.
pub struct MigrationStore {
    dir: PathBuf,
}

impl MigrationStore {
    /// Point a store at `dir`. The directory need not exist yet; it is
    /// created on first [`MigrationStore::write`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if it doesn't exist.
    pub async fn ensure_dir(&self) -> MigrateResult<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// List every migration artifact's filename stem, sorted ascending by
    /// version (the filename's leading `<version>_` component sorts
    /// lexicographically with the version itself, spec §3).
    pub async fn list(&self) -> MigrateResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn path_for(&self, version: &str, description: &str) -> PathBuf {
        let slug = slugify(description);
        let filename = if slug.is_empty() {
            format!("{version}.json")
        } else {
            format!("{version}_{slug}.json")
        };
        self.dir.join(filename)
    }

    /// Find the artifact path whose filename starts with `<version>_` or
    /// equals `<version>.json`.
    async fn find_path(&self, version: &str) -> MigrateResult<Option<PathBuf>> {
        if !self.dir.exists() {
            return Ok(None);
        }
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem == version || stem.starts_with(&format!("{version}_")) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Serialize `migration` to `<version>_<slug>.json` under the store
    /// directory, creating it first if needed.
    pub async fn write(&self, migration: &Migration) -> MigrateResult<PathBuf> {
        self.ensure_dir().await?;
        let path = self.path_for(&migration.version, &migration.description);
        let json = serde_json::to_vec_pretty(migration)
            .map_err(|e| MigrateError::malformed_artifact(path.display().to_string(), e.to_string()))?;
        fs::write(&path, json).await?;
        Ok(path)
    }

    /// Read back the migration with the given version, if present.
    pub async fn read(&self, version: &str) -> MigrateResult<Option<Migration>> {
        let Some(path) = self.find_path(version).await? else {
            return Ok(None);
        };
        self.read_path(&path).await.map(Some)
    }

    /// Read every migration artifact in the store, ordered by version.
    pub async fn read_all(&self) -> MigrateResult<Vec<Migration>> {
        let mut migrations = Vec::new();
        for stem in self.list().await? {
            let path = self.dir.join(format!("{stem}.json"));
            migrations.push(self.read_path(&path).await?);
        }
        migrations.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(migrations)
    }

    async fn read_path(&self, path: &Path) -> MigrateResult<Migration> {
        let bytes = fs::read(path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| MigrateError::malformed_artifact(path.display().to_string(), e.to_string()))
    }
}

/// Lowercase, dash-separated slug of `text`, used for the human-readable
/// part of an artifact's filename. Never the sole identity of a migration —
/// `version` is.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = true;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::migration::{MigrationStep, ObjectKind, StepType};

    fn sample_migration(version: &str) -> Migration {
        Migration::new(
            version,
            "create users table",
            Utc::now(),
            vec![MigrationStep::new(
                StepType::Create,
                ObjectKind::Table,
                "User",
                "CREATE TABLE \"public\".\"User\" ()",
                "DROP TABLE \"public\".\"User\"",
            )],
        )
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let store = MigrationStore::new(dir.path());
        let migration = sample_migration("0001");
        store.write(&migration).await.unwrap();

        let read_back = store.read("0001").await.unwrap().unwrap();
        assert_eq!(read_back, migration);
    }

    #[tokio::test]
    async fn filename_includes_slugified_description() {
        let dir = tempdir().unwrap();
        let store = MigrationStore::new(dir.path());
        let path = store.write(&sample_migration("0001")).await.unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "0001_create-users-table.json");
    }

    #[tokio::test]
    async fn list_returns_versions_in_ascending_order() {
        let dir = tempdir().unwrap();
        let store = MigrationStore::new(dir.path());
        store.write(&sample_migration("0002")).await.unwrap();
        store.write(&sample_migration("0001")).await.unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all[0].version, "0001");
        assert_eq!(all[1].version, "0002");
    }

    #[tokio::test]
    async fn missing_version_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = MigrationStore::new(dir.path());
        assert!(store.read("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_artifact_reports_its_path() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path()).await.unwrap();
        let bad_path = dir.path().join("0001_broken.json");
        fs::write(&bad_path, b"{ not json").await.unwrap();

        let store = MigrationStore::new(dir.path());
        let err = store.read("0001").await.unwrap_err();
        assert!(matches!(err, MigrateError::MalformedArtifact { .. }));
    }
}
