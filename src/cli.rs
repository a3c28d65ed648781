use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, warn};

use crate::snapshot::{BASELINE, Outcome};
use crate::switcher::Switcher;
use crate::system::Shell;

#[derive(Parser, Debug)]
#[command(name = "mac-switcher", version, about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Directory holding config.json, snapshots/ and the log
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Live preferences directory (default: ~/Library/Preferences)
    #[arg(long, global = true)]
    pub prefs_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Cmd {
    /// Save the current preferences as a named snapshot
    Save { name: String },
    /// Restore a snapshot on top of the default snapshot
    Apply {
        name: String,
        /// Log out right after a successful apply
        #[arg(long)]
        logout: bool,
    },
    /// Save the current preferences as the default snapshot
    Init {
        /// Replace an existing default snapshot
        #[arg(long)]
        force: bool,
    },
    /// List snapshots
    List,
    /// Show a snapshot's metadata and files
    Show { name: String },
    /// Delete a snapshot
    Delete { name: String },
    /// Interactive terminal UI (default)
    Tui,
}

impl Cli {
    /// Whether this invocation runs the TUI
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Cmd::Tui))
    }
}

fn report(action: &str, name: &str, outcome: &Outcome) {
    if outcome.is_complete() {
        println!("✓ {action} '{name}'");
    } else {
        println!("✓ {action} '{name}' (skipped: {})", outcome.failed().join(", "));
    }
}

/// Run a non-interactive command
pub fn run<S: Shell>(cmd: Cmd, switcher: &Switcher<S>) -> Result<()> {
    let result = dispatch(cmd, switcher);
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}

fn dispatch<S: Shell>(cmd: Cmd, switcher: &Switcher<S>) -> Result<()> {
    match cmd {
        Cmd::Save { name } => {
            let outcome = switcher.create(&name)?;
            report("Saved snapshot", &name, &outcome);
            if !switcher.has_baseline() {
                warn!("No default snapshot yet");
                println!("! No default snapshot exists yet; run `init` before applying snapshots");
            }
        }
        Cmd::Apply { name, logout } => {
            let outcome = switcher.apply(&name)?;
            report("Applied snapshot", &name, &outcome);
            if logout {
                if !switcher.logout() {
                    anyhow::bail!("logout request failed");
                }
            } else {
                println!("Some settings only take effect after logging out (rerun with --logout).");
            }
        }
        Cmd::Init { force } => {
            let outcome = switcher.create_baseline(force)?;
            report("Saved default snapshot", BASELINE, &outcome);
        }
        Cmd::List => {
            for entry in switcher.list()? {
                let marker = if entry.is_baseline() { " (#base)" } else { "" };
                match &entry.meta {
                    Some(meta) => println!(
                        "{}{}\t{}\tmacOS {}",
                        entry.name,
                        marker,
                        meta.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        meta.system_version
                    ),
                    None => println!("{}{}", entry.name, marker),
                }
            }
        }
        Cmd::Show { name } => {
            let details = switcher.details(&name)?;
            println!("Snapshot: {}", details.name);
            if let Some(meta) = &details.meta {
                println!("Created:  {}", meta.timestamp.format("%Y-%m-%d %H:%M:%S"));
                println!("macOS:    {}", meta.system_version);
            }
            for file in &details.files {
                match (file.size, file.keys) {
                    (Some(size), Some(keys)) => {
                        println!("  ✓ {} ({} bytes, {} keys)", file.file_name, size, keys)
                    }
                    (Some(size), None) => println!("  ✓ {} ({} bytes)", file.file_name, size),
                    (None, _) => println!("  ✗ {} (missing)", file.file_name),
                }
            }
        }
        Cmd::Delete { name } => {
            switcher.delete(&name)?;
            println!("✓ Deleted snapshot '{name}'");
        }
        Cmd::Tui => anyhow::bail!("the TUI cannot run as a one-shot command"),
    }
    Ok(())
}
