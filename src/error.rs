use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Snapshot '{0}' not found")]
    SnapshotNotFound(String),

    #[error("Default snapshot 'backup_default' not found, create it first")]
    BaselineMissing,

    #[error("Snapshot '{0}' already exists")]
    SnapshotExists(String),

    #[error("'{0}' is reserved for the default snapshot")]
    ReservedName(String),

    #[error("Invalid snapshot name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("Failed to parse plist: {0}")]
    PlistParse(#[from] plist::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
