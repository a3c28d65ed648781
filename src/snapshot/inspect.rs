use std::fs;
use std::path::Path;

use plist::Value;

use crate::error::Result;
use crate::prefs::file_name;

/// What a snapshot holds for one configured identifier
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub identifier: String,
    pub file_name: String,
    /// `None` when the snapshot has no file for this identifier
    pub size: Option<u64>,
    /// Top-level entries, `None` when the file is absent or not a readable plist
    pub keys: Option<usize>,
}

/// Count top-level keys of a plist (binary or XML)
fn count_keys(path: &Path) -> Result<usize> {
    let value = Value::from_file(path)?;
    Ok(match value {
        Value::Dictionary(dict) => dict.len(),
        Value::Array(arr) => arr.len(),
        _ => 1,
    })
}

/// Summarize `dir` against the configured identifiers
pub fn inspect(dir: &Path, identifiers: &[String]) -> Vec<FileSummary> {
    identifiers
        .iter()
        .map(|identifier| {
            let file_name = file_name(identifier);
            let path = dir.join(&file_name);
            let size = fs::metadata(&path).ok().map(|m| m.len());
            let keys = size.and_then(|_| count_keys(&path).ok());
            FileSummary {
                identifier: identifier.clone(),
                file_name,
                size,
                keys,
            }
        })
        .collect()
}
