use std::time::Instant;

use ratatui::widgets::ListState;
use tracing::error;

use crate::snapshot::{BASELINE, Outcome, SnapshotEntry, SnapshotName};
use crate::switcher::{SnapshotDetails, Switcher};
use crate::system::Shell;

/// Long-running work, run by the main loop after the loading screen is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    CreateBaseline,
    Create(String),
    Apply(String),
}

/// Application screen state
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// No default snapshot yet, offer to create one
    FirstRun,
    /// Snapshot list with details
    Browse,
    /// Typing the name of a new snapshot
    NameInput,
    ConfirmDelete(String),
    Loading(Task),
    /// Snapshot applied, offer to log out
    ConfirmLogout(String),
    Error(String),
}

/// Status message type
#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
}

/// Status message
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub created_at: Instant,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Success)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Warning)
    }

    fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    /// Check if message is still valid (within 3 seconds)
    pub fn is_valid(&self) -> bool {
        self.created_at.elapsed().as_secs() < 3
    }
}

fn outcome_status(done: &str, outcome: &Outcome) -> StatusMessage {
    match outcome {
        Outcome::Complete => StatusMessage::success(format!("✓ {done}")),
        Outcome::Partial { failed } => StatusMessage::warning(format!(
            "{done}, skipped {} file{}: {}",
            failed.len(),
            if failed.len() == 1 { "" } else { "s" },
            failed.join(", ")
        )),
    }
}

/// Application state
pub struct App<S> {
    pub switcher: Switcher<S>,
    pub screen: Screen,
    pub entries: Vec<SnapshotEntry>,
    pub details: Option<SnapshotDetails>,
    pub selected_index: usize,
    pub list_state: ListState,
    pub input: String,
    pub should_quit: bool,
    pub status: Option<StatusMessage>,
}

impl<S: Shell> App<S> {
    pub fn new(switcher: Switcher<S>) -> Self {
        let screen = if switcher.has_baseline() {
            Screen::Browse
        } else {
            Screen::FirstRun
        };
        let mut app = Self {
            switcher,
            screen,
            entries: Vec::new(),
            details: None,
            selected_index: 0,
            list_state: ListState::default(),
            input: String::new(),
            should_quit: false,
            status: None,
        };
        app.refresh();
        app
    }

    /// Set status message
    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    /// Get valid status message
    pub fn get_status(&self) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|s| s.is_valid())
    }

    /// Reload the snapshot list, keeping the selection in range
    pub fn refresh(&mut self) {
        match self.switcher.list() {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                error!(error = %e, "Failed to list snapshots");
                self.screen = Screen::Error(format!("Failed to list snapshots: {e}"));
                return;
            }
        }

        if self.entries.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(self.entries.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
        self.load_details();
    }

    fn load_details(&mut self) {
        self.details = self
            .selected_entry()
            .map(|entry| entry.name.clone())
            .and_then(|name| self.switcher.details(&name).ok());
    }

    pub fn selected_entry(&self) -> Option<&SnapshotEntry> {
        self.entries.get(self.selected_index)
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        if self.screen == Screen::Browse && self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
            self.load_details();
        }
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.screen == Screen::Browse
            && self.selected_index < self.entries.len().saturating_sub(1)
        {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
            self.load_details();
        }
    }

    /// Accept the first-run prompt
    pub fn accept_baseline(&mut self) {
        self.screen = Screen::Loading(Task::CreateBaseline);
        self.status = Some(StatusMessage::info("Saving current settings as the default snapshot..."));
    }

    /// Skip the first-run prompt
    pub fn decline_baseline(&mut self) {
        self.screen = Screen::Browse;
        self.status = Some(StatusMessage::warning(
            "No default snapshot, applying is disabled until one exists [b]",
        ));
    }

    pub fn start_create(&mut self) {
        if self.screen == Screen::Browse {
            self.input.clear();
            self.screen = Screen::NameInput;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.screen == Screen::NameInput {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.screen == Screen::NameInput {
            self.input.pop();
        }
    }

    /// Validate the typed name and queue the save
    pub fn submit_name(&mut self) {
        if self.screen != Screen::NameInput {
            return;
        }
        match SnapshotName::for_new(&self.input) {
            Ok(name) => {
                self.status = Some(StatusMessage::info(format!("Saving snapshot '{name}'...")));
                self.screen = Screen::Loading(Task::Create(name.to_string()));
            }
            Err(e) => self.set_status(StatusMessage::warning(e.to_string())),
        }
    }

    /// Back to the list from any prompt
    pub fn cancel(&mut self) {
        match self.screen {
            Screen::NameInput | Screen::ConfirmDelete(_) | Screen::ConfirmLogout(_) => {
                self.input.clear();
                self.screen = Screen::Browse;
            }
            Screen::Error(_) => {
                self.screen = Screen::Browse;
                self.refresh();
            }
            _ => {}
        }
    }

    pub fn request_apply(&mut self) {
        if self.screen != Screen::Browse {
            return;
        }
        if let Some(name) = self.selected_entry().map(|e| e.name.clone()) {
            self.status = Some(StatusMessage::info(format!(
                "Applying '{name}' and restarting Dock, Finder and SystemUIServer..."
            )));
            self.screen = Screen::Loading(Task::Apply(name));
        } else {
            self.set_status(StatusMessage::warning("Select a snapshot first"));
        }
    }

    pub fn request_delete(&mut self) {
        if self.screen != Screen::Browse {
            return;
        }
        if let Some(name) = self.selected_entry().map(|e| e.name.clone()) {
            self.screen = Screen::ConfirmDelete(name);
        } else {
            self.set_status(StatusMessage::warning("Select a snapshot first"));
        }
    }

    pub fn confirm_delete(&mut self) {
        let Screen::ConfirmDelete(name) = self.screen.clone() else {
            return;
        };
        match self.switcher.delete(&name) {
            Ok(()) => {
                self.screen = Screen::Browse;
                self.set_status(StatusMessage::success(format!("✓ Deleted snapshot '{name}'")));
                self.refresh();
            }
            Err(e) => {
                error!(snapshot = %name, error = %e, "Failed to delete snapshot");
                self.screen = Screen::Error(format!("Failed to delete snapshot: {e}"));
            }
        }
    }

    /// Answer the post-apply logout prompt
    pub fn answer_logout(&mut self, logout: bool) {
        if !matches!(self.screen, Screen::ConfirmLogout(_)) {
            return;
        }
        if logout {
            if self.switcher.logout() {
                self.should_quit = true;
            } else {
                self.screen = Screen::Error("Logout request failed, see the log".to_string());
            }
        } else {
            self.screen = Screen::Browse;
        }
    }

    /// Create the baseline from the list when it was skipped at first run
    pub fn request_baseline(&mut self) {
        if self.screen == Screen::Browse && !self.switcher.has_baseline() {
            self.accept_baseline();
        }
    }

    /// Run the queued task (called from main loop)
    pub fn execute_task(&mut self) {
        let Screen::Loading(task) = self.screen.clone() else {
            return;
        };

        let result = match &task {
            Task::CreateBaseline => self.switcher.create_baseline(false),
            Task::Create(name) => self.switcher.create(name),
            Task::Apply(name) => self.switcher.apply(name),
        };

        match (task, result) {
            (Task::CreateBaseline, Ok(outcome)) => {
                self.screen = Screen::Browse;
                self.status = Some(outcome_status("Default snapshot saved", &outcome));
            }
            (Task::Create(name), Ok(outcome)) => {
                self.screen = Screen::Browse;
                self.status = Some(outcome_status(&format!("Snapshot '{name}' saved"), &outcome));
                self.select_named(&name);
            }
            (Task::Apply(name), Ok(outcome)) => {
                self.status = Some(outcome_status(&format!("Snapshot '{name}' applied"), &outcome));
                self.screen = Screen::ConfirmLogout(name);
            }
            (task, Err(e)) => {
                error!(task = ?task, error = %e, "Task failed");
                self.screen = Screen::Error(e.to_string());
            }
        }
        self.refresh();
    }

    fn select_named(&mut self, name: &str) {
        if let Ok(entries) = self.switcher.list() {
            self.entries = entries;
        }
        if let Some(index) = self.entries.iter().position(|e| e.name == name) {
            self.selected_index = index;
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.entries.iter().any(|e| e.name == BASELINE)
    }

    /// Check if currently in loading state
    pub fn is_loading(&self) -> bool {
        matches!(self.screen, Screen::Loading(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, RecordingShell};

    fn type_name(app: &mut App<RecordingShell>, name: &str) {
        app.start_create();
        for c in name.chars() {
            app.push_char(c);
        }
        app.submit_name();
    }

    #[test]
    fn test_first_run_prompt_creates_baseline() {
        let fx = Fixture::new();
        let mut app = App::new(fx.switcher());
        assert_eq!(app.screen, Screen::FirstRun);

        app.accept_baseline();
        assert!(app.is_loading());
        app.execute_task();

        assert_eq!(app.screen, Screen::Browse);
        assert!(app.has_baseline());
        assert_eq!(app.entries.len(), 1);
    }

    #[test]
    fn test_declined_first_run_goes_to_browse() {
        let fx = Fixture::new();
        let mut app = App::new(fx.switcher());
        app.decline_baseline();
        assert_eq!(app.screen, Screen::Browse);
        assert!(!app.has_baseline());
    }

    #[test]
    fn test_create_snapshot_selects_it() {
        let fx = Fixture::new();
        fx.switcher().create_baseline(false).unwrap();
        let mut app = App::new(fx.switcher());

        type_name(&mut app, "work");
        assert_eq!(app.screen, Screen::Loading(Task::Create("work".to_string())));
        app.execute_task();

        assert_eq!(app.screen, Screen::Browse);
        assert_eq!(app.selected_entry().unwrap().name, "work");
        assert_eq!(app.details.as_ref().unwrap().name.as_str(), "work");
    }

    #[test]
    fn test_reserved_name_stays_in_prompt() {
        let fx = Fixture::new();
        fx.switcher().create_baseline(false).unwrap();
        let mut app = App::new(fx.switcher());

        type_name(&mut app, BASELINE);
        assert_eq!(app.screen, Screen::NameInput);
        assert_eq!(app.get_status().unwrap().kind, StatusKind::Warning);
    }

    #[test]
    fn test_apply_then_decline_logout() {
        let fx = Fixture::new();
        fx.switcher().create_baseline(false).unwrap();
        let mut app = App::new(fx.switcher());

        app.request_apply();
        app.execute_task();
        assert_eq!(app.screen, Screen::ConfirmLogout(BASELINE.to_string()));

        app.answer_logout(false);
        assert_eq!(app.screen, Screen::Browse);
        assert!(!app.should_quit);
        assert!(fx.shell.calls_to("osascript").is_empty());
    }

    #[test]
    fn test_apply_then_logout_quits() {
        let fx = Fixture::new();
        fx.switcher().create_baseline(false).unwrap();
        let mut app = App::new(fx.switcher());

        app.request_apply();
        app.execute_task();
        app.answer_logout(true);
        assert!(app.should_quit);
        assert_eq!(fx.shell.calls_to("osascript").len(), 1);
    }

    #[test]
    fn test_apply_without_baseline_shows_error() {
        let fx = Fixture::new();
        fx.switcher().create("work").unwrap();
        let mut app = App::new(fx.switcher());
        app.decline_baseline();

        app.request_apply();
        app.execute_task();
        assert!(matches!(app.screen, Screen::Error(_)));

        app.cancel();
        assert_eq!(app.screen, Screen::Browse);
    }

    #[test]
    fn test_delete_flow() {
        let fx = Fixture::new();
        fx.switcher().create_baseline(false).unwrap();
        fx.switcher().create("work").unwrap();
        let mut app = App::new(fx.switcher());

        app.move_down();
        assert_eq!(app.selected_entry().unwrap().name, "work");
        app.request_delete();
        assert_eq!(app.screen, Screen::ConfirmDelete("work".to_string()));
        app.confirm_delete();

        assert_eq!(app.screen, Screen::Browse);
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.selected_index, 0);
    }
}
