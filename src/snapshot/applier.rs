use std::path::Path;

use tracing::{error, info, info_span, warn};

use super::store::SnapshotStore;
use super::types::{Outcome, SnapshotName};
use crate::config::Timing;
use crate::error::{AppError, Result};
use crate::prefs::PreferenceCopier;
use crate::system::{ProcessTable, Shell, restart_services};

/// Restores a snapshot on top of the baseline and restarts the affected services
pub struct SnapshotApplier<'a, S> {
    store: &'a SnapshotStore,
    copier: &'a PreferenceCopier<S>,
    identifiers: &'a [String],
    processes: &'a dyn ProcessTable,
    timing: &'a Timing,
}

impl<'a, S: Shell> SnapshotApplier<'a, S> {
    pub fn new(
        store: &'a SnapshotStore,
        copier: &'a PreferenceCopier<S>,
        identifiers: &'a [String],
        processes: &'a dyn ProcessTable,
        timing: &'a Timing,
    ) -> Self {
        Self {
            store,
            copier,
            identifiers,
            processes,
            timing,
        }
    }

    /// Apply `name`.
    ///
    /// Both the target and the baseline must exist; otherwise nothing is
    /// touched and an error is returned. Every configured identifier is
    /// first restored from the baseline, then from the target, so any file
    /// the target lacks stays at its baseline content. The outcome lists
    /// identifiers the target pass could not restore.
    pub fn apply(&self, name: &SnapshotName) -> Result<Outcome> {
        let span = info_span!("apply", snapshot = %name);
        let _enter = span.enter();

        if !self.store.exists(name) {
            error!("Snapshot not found");
            return Err(AppError::SnapshotNotFound(name.to_string()));
        }
        let baseline = SnapshotName::baseline();
        if !self.store.exists(&baseline) {
            error!("Default snapshot not found");
            return Err(AppError::BaselineMissing);
        }

        let baseline_failed = self.restore_all(&self.store.dir(&baseline));
        if !baseline_failed.is_empty() {
            warn!(identifiers = ?baseline_failed, "Baseline pass left files untouched");
        }

        let failed = self.restore_all(&self.store.dir(name));
        for identifier in &failed {
            if baseline_failed.contains(identifier) {
                error!(identifier = %identifier, "Not restored from any snapshot");
            } else {
                info!(identifier = %identifier, "Kept baseline copy");
            }
        }

        if !restart_services(self.copier.shell(), self.processes, self.timing) {
            warn!("Continuing without confirmed service relaunch");
        }

        info!(failed = failed.len(), "Applied snapshot");
        Ok(Outcome::from_failures(failed))
    }

    /// Restore every identifier from `dir`, returning the ones that failed
    fn restore_all(&self, dir: &Path) -> Vec<String> {
        self.identifiers
            .iter()
            .filter(|identifier| !self.copier.restore(identifier, dir))
            .cloned()
            .collect()
    }
}
