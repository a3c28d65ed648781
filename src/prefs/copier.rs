use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use super::location::{DOCK, file_name};
use crate::system::Shell;

/// Copies single preference files between the OS preferences directory and
/// a snapshot directory.
///
/// Every operation reports success as a bool and never raises: a missing
/// source is a warning, an I/O failure is an error, and either way the
/// caller moves on to the next identifier.
#[derive(Debug, Clone)]
pub struct PreferenceCopier<S> {
    prefs_dir: PathBuf,
    shell: S,
    dock_settle: Duration,
}

impl<S: Shell> PreferenceCopier<S> {
    pub fn new(prefs_dir: impl Into<PathBuf>, shell: S, dock_settle: Duration) -> Self {
        Self {
            prefs_dir: prefs_dir.into(),
            shell,
            dock_settle,
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Live location of the preference file for `identifier`
    pub fn os_path(&self, identifier: &str) -> PathBuf {
        self.prefs_dir.join(file_name(identifier))
    }

    /// Copy the live file into `dest_dir`
    pub fn backup(&self, identifier: &str, dest_dir: &Path) -> bool {
        let src = self.os_path(identifier);
        let dst = dest_dir.join(file_name(identifier));

        if copy_existing(&src, &dst, identifier) {
            info!(identifier, "Backed up preference file");
            true
        } else {
            false
        }
    }

    /// Copy the snapshot's file from `src_dir` back to the live location
    pub fn restore(&self, identifier: &str, src_dir: &Path) -> bool {
        let src = src_dir.join(file_name(identifier));
        let dst = self.os_path(identifier);

        if !copy_existing(&src, &dst, identifier) {
            return false;
        }
        info!(identifier, "Restored preference file");

        if identifier == DOCK {
            // Read the domain back so cfprefsd picks up the new file before
            // the Dock is killed.
            self.shell.run("defaults", &["read", DOCK]);
            thread::sleep(self.dock_settle);
        }
        true
    }
}

fn copy_existing(src: &Path, dst: &Path, identifier: &str) -> bool {
    if !src.exists() {
        warn!(identifier, path = %src.display(), "File not found");
        return false;
    }

    match fs::copy(src, dst) {
        Ok(_) => true,
        Err(e) => {
            error!(
                identifier,
                from = %src.display(),
                to = %dst.display(),
                error = %e,
                "Failed to copy preference file"
            );
            false
        }
    }
}
