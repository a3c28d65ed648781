use chrono::Local;
use tracing::{error, info, info_span};

use super::store::SnapshotStore;
use super::types::{Outcome, SnapshotMeta, SnapshotName};
use crate::error::Result;
use crate::prefs::PreferenceCopier;
use crate::system::{Shell, system_version};

/// Recorded when `sw_vers` cannot be queried
pub const UNKNOWN_VERSION: &str = "unknown";

/// Saves the configured preference files into a snapshot directory
pub struct SnapshotWriter<'a, S> {
    store: &'a SnapshotStore,
    copier: &'a PreferenceCopier<S>,
    identifiers: &'a [String],
}

impl<'a, S: Shell> SnapshotWriter<'a, S> {
    pub fn new(
        store: &'a SnapshotStore,
        copier: &'a PreferenceCopier<S>,
        identifiers: &'a [String],
    ) -> Self {
        Self {
            store,
            copier,
            identifiers,
        }
    }

    /// Copy every configured file into `snapshots/<name>/` and write `meta.json`.
    ///
    /// An existing snapshot of the same name is overwritten file by file.
    /// Identifiers whose live file is missing are reported in the outcome;
    /// only directory and metadata I/O errors are returned as `Err`.
    pub fn save(&self, name: &SnapshotName) -> Result<Outcome> {
        let span = info_span!("save", snapshot = %name);
        let _enter = span.enter();

        let dir = self.store.create_dir(name)?;

        let mut failed = Vec::new();
        for identifier in self.identifiers {
            info!(identifier = %identifier, "Attempting backup");
            if !self.copier.backup(identifier, &dir) {
                error!(identifier = %identifier, "Failed to back up preference file");
                failed.push(identifier.clone());
            }
        }

        let meta = SnapshotMeta {
            name: name.to_string(),
            timestamp: Local::now().naive_local(),
            system_version: system_version(self.copier.shell())
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        };
        self.store.write_meta(name, &meta)?;

        info!(path = %dir.display(), failed = failed.len(), "Snapshot saved");
        Ok(Outcome::from_failures(failed))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::config::DEFAULT_PLIST_FILES;
    use crate::prefs::file_name;
    use crate::testing::Fixture;

    #[test]
    fn test_save_copies_every_present_file() {
        let fx = Fixture::new();
        for (i, id) in DEFAULT_PLIST_FILES.iter().enumerate() {
            fx.write_pref(id, format!("content-{i}").as_bytes());
        }

        let work = SnapshotName::for_new("work").unwrap();
        let outcome = fx.writer().save(&work).unwrap();
        assert_eq!(outcome, Outcome::Complete);

        let dir = fx.store.dir(&work);
        for id in DEFAULT_PLIST_FILES {
            assert_eq!(
                fs::read(dir.join(file_name(id))).unwrap(),
                fx.read_pref(id).unwrap(),
                "{id} should match the live file"
            );
        }
    }

    #[test]
    fn test_save_without_dock_still_succeeds() {
        let fx = Fixture::new();
        for id in DEFAULT_PLIST_FILES.iter().filter(|id| **id != "com.apple.dock") {
            fx.write_pref(id, id.as_bytes());
        }

        let work = SnapshotName::for_new("work").unwrap();
        let outcome = fx.writer().save(&work).unwrap();
        assert_eq!(
            outcome,
            Outcome::Partial {
                failed: vec!["com.apple.dock".to_string()]
            }
        );

        let dir = fx.store.dir(&work);
        assert!(!dir.join("com.apple.dock.plist").exists());
        for id in DEFAULT_PLIST_FILES.iter().filter(|id| **id != "com.apple.dock") {
            assert!(dir.join(file_name(id)).exists(), "{id} missing from snapshot");
        }
        assert!(fx.store.read_meta(&work).unwrap().is_some());
    }

    #[test]
    fn test_save_writes_metadata() {
        let fx = Fixture::new();
        let work = SnapshotName::for_new("work").unwrap();
        fx.writer().save(&work).unwrap();

        let meta = fx.store.read_meta(&work).unwrap().unwrap();
        assert_eq!(meta.name, "work");
        assert_eq!(meta.system_version, "14.5");
        assert!(fx.shell.calls().contains(&"sw_vers -productVersion".to_string()));
    }

    #[test]
    fn test_save_records_unknown_version_on_failure() {
        let fx = Fixture::with_shell(crate::testing::RecordingShell::new().failing(&["sw_vers"]));
        let work = SnapshotName::for_new("work").unwrap();
        fx.writer().save(&work).unwrap();

        let meta = fx.store.read_meta(&work).unwrap().unwrap();
        assert_eq!(meta.system_version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_save_overwrites_previous_metadata() {
        let fx = Fixture::new();
        fx.write_pref("com.apple.finder", b"v1");
        let work = SnapshotName::for_new("work").unwrap();
        fx.writer().save(&work).unwrap();
        let first = fx.store.read_meta(&work).unwrap().unwrap();

        fx.write_pref("com.apple.finder", b"v2");
        fx.writer().save(&work).unwrap();
        let second = fx.store.read_meta(&work).unwrap().unwrap();

        assert!(second.timestamp >= first.timestamp);
        assert_eq!(
            fs::read(fx.store.dir(&work).join("com.apple.finder.plist")).unwrap(),
            b"v2"
        );
    }
}
