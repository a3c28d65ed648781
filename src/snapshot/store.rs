use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::types::{BASELINE, META_FILE, SnapshotMeta, SnapshotName};
use crate::error::{AppError, Result};

/// A snapshot directory found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub name: String,
    /// `None` when `meta.json` is missing or unreadable
    pub meta: Option<SnapshotMeta>,
}

impl SnapshotEntry {
    pub fn is_baseline(&self) -> bool {
        self.name == BASELINE
    }
}

/// The `snapshots/` directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir(&self, name: &SnapshotName) -> PathBuf {
        self.root.join(name.as_str())
    }

    pub fn exists(&self, name: &SnapshotName) -> bool {
        self.dir(name).is_dir()
    }

    pub fn has_baseline(&self) -> bool {
        self.exists(&SnapshotName::baseline())
    }

    /// Create the snapshot directory (and the store root) if missing
    pub fn create_dir(&self, name: &SnapshotName) -> Result<PathBuf> {
        let dir = self.dir(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// All snapshot directories, baseline first, the rest by name
    pub fn list(&self) -> Result<Vec<SnapshotEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "Skipping snapshot with non UTF-8 name");
                continue;
            };
            let meta = read_meta_file(&entry.path()).unwrap_or_else(|e| {
                warn!(snapshot = %name, error = %e, "Unreadable snapshot metadata");
                None
            });
            entries.push(SnapshotEntry { name, meta });
        }

        entries.sort_by(|a, b| {
            b.is_baseline()
                .cmp(&a.is_baseline())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(entries)
    }

    pub fn read_meta(&self, name: &SnapshotName) -> Result<Option<SnapshotMeta>> {
        read_meta_file(&self.dir(name))
    }

    pub fn write_meta(&self, name: &SnapshotName, meta: &SnapshotMeta) -> Result<()> {
        let json = serde_json::to_string_pretty(meta)?;
        fs::write(self.dir(name).join(META_FILE), json)?;
        Ok(())
    }

    /// Remove the whole snapshot directory
    pub fn delete(&self, name: &SnapshotName) -> Result<()> {
        let dir = self.dir(name);
        if !dir.is_dir() {
            return Err(AppError::SnapshotNotFound(name.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        info!(snapshot = %name, "Deleted snapshot");
        Ok(())
    }
}

fn read_meta_file(dir: &Path) -> Result<Option<SnapshotMeta>> {
    let path = dir.join(META_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn name(s: &str) -> SnapshotName {
        SnapshotName::parse(s).unwrap()
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snapshots"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_baseline_first_and_skips_files() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.create_dir(&name("work")).unwrap();
        store.create_dir(&name("alpha")).unwrap();
        store.create_dir(&SnapshotName::baseline()).unwrap();
        fs::write(dir.path().join("stray.txt"), "x").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec![BASELINE, "alpha", "work"]);
    }

    #[test]
    fn test_meta_roundtrip_and_corrupt_meta() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let work = name("work");
        store.create_dir(&work).unwrap();
        assert_eq!(store.read_meta(&work).unwrap(), None);

        let meta = SnapshotMeta {
            name: "work".to_string(),
            timestamp: chrono::Local::now().naive_local(),
            system_version: "14.5".to_string(),
        };
        store.write_meta(&work, &meta).unwrap();
        assert_eq!(store.read_meta(&work).unwrap(), Some(meta));

        let broken = name("broken");
        store.create_dir(&broken).unwrap();
        fs::write(store.dir(&broken).join(META_FILE), "nope").unwrap();
        assert!(store.read_meta(&broken).is_err());

        let listed = store.list().unwrap();
        let entry = listed.iter().find(|e| e.name == "broken").unwrap();
        assert_eq!(entry.meta, None);
    }

    #[test]
    fn test_delete_removes_from_listing() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let work = name("work");
        let snap_dir = store.create_dir(&work).unwrap();
        fs::write(snap_dir.join("com.apple.dock.plist"), "dock").unwrap();

        store.delete(&work).unwrap();
        assert!(!snap_dir.exists());
        assert!(store.list().unwrap().iter().all(|e| e.name != "work"));
    }

    #[test]
    fn test_delete_missing_is_error() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(matches!(
            store.delete(&name("ghost")),
            Err(AppError::SnapshotNotFound(_))
        ));
    }

    #[test]
    fn test_has_baseline() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(!store.has_baseline());
        store.create_dir(&SnapshotName::baseline()).unwrap();
        assert!(store.has_baseline());
    }
}
