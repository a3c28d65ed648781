use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Identifier of the global preferences domain
pub const GLOBAL_PREFERENCES: &str = ".GlobalPreferences";

/// Identifier that gets a read-back probe after restore
pub const DOCK: &str = "com.apple.dock";

const GLOBAL_PREFERENCES_FILE: &str = ".GlobalPreferences.plist";

/// On-disk file name for a preference identifier
pub fn file_name(identifier: &str) -> String {
    match identifier {
        GLOBAL_PREFERENCES => GLOBAL_PREFERENCES_FILE.to_string(),
        other => format!("{}.plist", other),
    }
}

/// `~/Library/Preferences`
pub fn user_preferences_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Library").join("Preferences"))
        .ok_or(AppError::NoHomeDir)
}
