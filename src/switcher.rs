use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{AppPaths, Config, Timing};
use crate::error::{AppError, Result};
use crate::prefs::PreferenceCopier;
use crate::snapshot::{
    FileSummary, Outcome, SnapshotApplier, SnapshotEntry, SnapshotMeta, SnapshotName,
    SnapshotStore, SnapshotWriter, inspect,
};
use crate::system::{ProcessTable, Shell, logout};

/// Metadata plus per-file summary of one snapshot
#[derive(Debug, Clone)]
pub struct SnapshotDetails {
    pub name: SnapshotName,
    pub meta: Option<SnapshotMeta>,
    pub files: Vec<FileSummary>,
}

/// Everything the front ends need: configuration, the snapshot store, the
/// copier wired to one shell, and the process table used after an apply.
pub struct Switcher<S> {
    config: Config,
    store: SnapshotStore,
    copier: PreferenceCopier<S>,
    processes: Box<dyn ProcessTable>,
    timing: Timing,
}

impl<S: Shell> Switcher<S> {
    pub fn new(
        config: Config,
        paths: &AppPaths,
        prefs_dir: impl Into<PathBuf>,
        shell: S,
        processes: Box<dyn ProcessTable>,
        timing: Timing,
    ) -> Self {
        let copier = PreferenceCopier::new(prefs_dir, shell, timing.dock_settle);
        Self {
            config,
            store: SnapshotStore::new(paths.snapshots_dir()),
            copier,
            processes,
            timing,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn list(&self) -> Result<Vec<SnapshotEntry>> {
        self.store.list()
    }

    pub fn has_baseline(&self) -> bool {
        self.store.has_baseline()
    }

    fn writer(&self) -> SnapshotWriter<'_, S> {
        SnapshotWriter::new(&self.store, &self.copier, self.config.plist_files())
    }

    /// Save a new user snapshot. `backup_default` is refused before anything
    /// touches the disk.
    pub fn create(&self, name: &str) -> Result<Outcome> {
        let name = SnapshotName::for_new(name)?;
        self.writer().save(&name)
    }

    /// Save the current state as the baseline
    pub fn create_baseline(&self, overwrite: bool) -> Result<Outcome> {
        if self.has_baseline() && !overwrite {
            return Err(AppError::SnapshotExists(SnapshotName::baseline().to_string()));
        }
        info!("Creating default snapshot");
        self.writer().save(&SnapshotName::baseline())
    }

    pub fn apply(&self, name: &str) -> Result<Outcome> {
        let name = SnapshotName::parse(name)?;
        SnapshotApplier::new(
            &self.store,
            &self.copier,
            self.config.plist_files(),
            self.processes.as_ref(),
            &self.timing,
        )
        .apply(&name)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let name = SnapshotName::parse(name)?;
        if name.is_baseline() {
            warn!("Deleting the default snapshot, apply fails until it is recreated");
        }
        self.store.delete(&name)
    }

    pub fn details(&self, name: &str) -> Result<SnapshotDetails> {
        let name = SnapshotName::parse(name)?;
        if !self.store.exists(&name) {
            return Err(AppError::SnapshotNotFound(name.to_string()));
        }
        let dir = self.store.dir(&name);
        Ok(SnapshotDetails {
            meta: self.store.read_meta(&name)?,
            files: inspect(&dir, self.config.plist_files()),
            name,
        })
    }

    /// End the login session so settings read only at login take effect
    pub fn logout(&self) -> bool {
        logout(self.copier.shell())
    }
}
