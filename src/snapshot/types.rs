use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Name of the snapshot holding the original system state
pub const BASELINE: &str = "backup_default";

pub const META_FILE: &str = "meta.json";

/// A snapshot directory name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotName(String);

impl SnapshotName {
    /// Any valid name, the baseline included
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason| AppError::InvalidName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name.trim() != name {
            return Err(invalid("leading or trailing whitespace"));
        }
        if name == "." || name == ".." {
            return Err(invalid("not a directory name"));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(invalid("contains a path separator"));
        }
        Ok(Self(name.to_string()))
    }

    /// A name for a new user snapshot; the baseline name is refused
    pub fn for_new(name: &str) -> Result<Self> {
        if name == BASELINE {
            return Err(AppError::ReservedName(name.to_string()));
        }
        Self::parse(name)
    }

    pub fn baseline() -> Self {
        Self(BASELINE.to_string())
    }

    pub fn is_baseline(&self) -> bool {
        self.0 == BASELINE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contents of `meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub name: String,
    /// Local time without offset, e.g. `2024-05-01T09:30:12.345678`
    pub timestamp: NaiveDateTime,
    #[serde(rename = "systemVersion")]
    pub system_version: String,
}

/// How completely a save or apply went.
///
/// Fatal conditions (missing snapshot, missing baseline) are errors, not outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every configured identifier was copied
    Complete,
    /// The listed identifiers were not copied; see the log for why
    Partial { failed: Vec<String> },
}

impl Outcome {
    pub fn from_failures(failed: Vec<String>) -> Self {
        if failed.is_empty() {
            Outcome::Complete
        } else {
            Outcome::Partial { failed }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete)
    }

    pub fn failed(&self) -> &[String] {
        match self {
            Outcome::Complete => &[],
            Outcome::Partial { failed } => failed,
        }
    }
}
