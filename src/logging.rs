use std::fs;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppPaths;

/// Install the process-wide subscriber. Call once, before anything logs.
///
/// Events always go to `macswitcher.log` under the workspace root. With
/// `console` they are echoed to stderr as well; the TUI turns that off
/// because it owns the terminal. The level comes from `RUST_LOG`, default
/// `info`.
pub fn init(paths: &AppPaths, console: bool) -> anyhow::Result<()> {
    fs::create_dir_all(&paths.root)
        .with_context(|| format!("creating {}", paths.root.display()))?;

    let log_file = paths.log_file();
    let (Some(dir), Some(file_name)) = (log_file.parent(), log_file.file_name()) else {
        anyhow::bail!("invalid log path {}", log_file.display());
    };
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("opening {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("installing log subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing::warn;

    #[test]
    fn test_events_land_in_log_file() {
        let dir = tempdir().unwrap();
        let paths = AppPaths::new(dir.path().join("workspace"));
        init(&paths, false).unwrap();

        warn!(identifier = "com.apple.dock", "File not found");

        let files: Vec<String> = fs::read_dir(&paths.root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec!["macswitcher.log"]);

        let contents = fs::read_to_string(paths.log_file()).unwrap();
        assert!(contents.contains("WARN"));
        assert!(contents.contains("File not found"));
        assert!(contents.contains("com.apple.dock"));
    }
}
