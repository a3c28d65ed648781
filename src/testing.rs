//! Test doubles shared by the unit tests

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use tempfile::TempDir;

use crate::config::{AppPaths, Config, Timing};
use crate::prefs::{PreferenceCopier, file_name};
use crate::snapshot::{SnapshotApplier, SnapshotStore, SnapshotWriter};
use crate::switcher::Switcher;
use crate::system::ProcessTable;
use crate::system::shell::{CommandOutput, Shell, command_line};

#[derive(Debug, Default)]
struct ShellState {
    calls: Vec<String>,
    failing: Vec<String>,
}

/// Records every command line and answers with canned output.
///
/// `sw_vers` reports `14.5`, everything else succeeds silently unless
/// listed in `failing`. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingShell {
    state: Rc<RefCell<ShellState>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given programs exit with status 1
    pub fn failing(self, programs: &[&str]) -> Self {
        self.state
            .borrow_mut()
            .failing
            .extend(programs.iter().map(|p| p.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<String> {
        let prefix = format!("{program} ");
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&prefix) || c == program)
            .collect()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }
}

impl Shell for RecordingShell {
    fn output(&self, program: &str, args: &[&str]) -> CommandOutput {
        let mut state = self.state.borrow_mut();
        state.calls.push(command_line(program, args));

        if state.failing.iter().any(|p| p == program) {
            return CommandOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: "scripted failure".to_string(),
            };
        }

        let stdout = match program {
            "sw_vers" => "14.5\n".to_string(),
            _ => String::new(),
        };
        CommandOutput {
            status: Some(0),
            stdout,
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct ProcessState {
    queried: Vec<String>,
    fixed_pids: bool,
    stale_for: usize,
    next_pid: u32,
}

/// Scripted process table.
///
/// Every lookup returns PID 100 while the table is stale, and a fresh PID
/// afterwards, so killed services look relaunched. Clones share the same
/// record.
#[derive(Debug, Clone, Default)]
pub struct FakeProcesses {
    state: Rc<RefCell<ProcessState>>,
}

impl FakeProcesses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never report a new PID
    pub fn with_fixed_pids(self) -> Self {
        self.state.borrow_mut().fixed_pids = true;
        self
    }

    /// Report the old PID for the first `lookups` lookups
    pub fn stale_for(self, lookups: usize) -> Self {
        self.state.borrow_mut().stale_for = lookups;
        self
    }

    /// Names looked up so far, in order
    pub fn queried(&self) -> Vec<String> {
        self.state.borrow().queried.clone()
    }
}

impl ProcessTable for FakeProcesses {
    fn pids(&self, name: &str) -> HashSet<u32> {
        let mut state = self.state.borrow_mut();
        state.queried.push(name.to_string());

        if state.fixed_pids || state.queried.len() <= state.stale_for {
            return HashSet::from([100]);
        }
        state.next_pid += 1;
        HashSet::from([100 + state.next_pid])
    }
}

/// Scratch workspace with a fake preferences directory
pub struct Fixture {
    _dir: TempDir,
    pub paths: AppPaths,
    pub prefs: PathBuf,
    pub store: SnapshotStore,
    pub shell: RecordingShell,
    pub processes: FakeProcesses,
    pub copier: PreferenceCopier<RecordingShell>,
    pub identifiers: Vec<String>,
    pub timing: Timing,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_shell(RecordingShell::new())
    }

    pub fn with_shell(shell: RecordingShell) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(dir.path().join("workspace"));
        let prefs = dir.path().join("Preferences");
        fs::create_dir_all(&prefs).unwrap();

        let timing = Timing {
            dock_settle: Duration::ZERO,
            restart_timeout: Duration::ZERO,
            restart_poll: Duration::ZERO,
        };

        Self {
            store: SnapshotStore::new(paths.snapshots_dir()),
            copier: PreferenceCopier::new(&prefs, shell.clone(), timing.dock_settle),
            identifiers: Config::default().plist_files().to_vec(),
            _dir: dir,
            paths,
            prefs,
            shell,
            processes: FakeProcesses::new(),
            timing,
        }
    }

    pub fn write_pref(&self, identifier: &str, bytes: &[u8]) {
        fs::write(self.prefs.join(file_name(identifier)), bytes).unwrap();
    }

    pub fn read_pref(&self, identifier: &str) -> Option<Vec<u8>> {
        fs::read(self.prefs.join(file_name(identifier))).ok()
    }

    /// File name to contents for everything in the preferences directory
    pub fn prefs_state(&self) -> BTreeMap<String, Vec<u8>> {
        fs::read_dir(&self.prefs)
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                (
                    entry.file_name().to_string_lossy().into_owned(),
                    fs::read(entry.path()).unwrap(),
                )
            })
            .collect()
    }

    pub fn writer(&self) -> SnapshotWriter<'_, RecordingShell> {
        SnapshotWriter::new(&self.store, &self.copier, &self.identifiers)
    }

    pub fn applier(&self) -> SnapshotApplier<'_, RecordingShell> {
        SnapshotApplier::new(
            &self.store,
            &self.copier,
            &self.identifiers,
            &self.processes,
            &self.timing,
        )
    }

    pub fn switcher(&self) -> Switcher<RecordingShell> {
        Switcher::new(
            Config::default(),
            &self.paths,
            &self.prefs,
            self.shell.clone(),
            Box::new(self.processes.clone()),
            self.timing.clone(),
        )
    }
}
