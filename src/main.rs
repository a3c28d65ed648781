mod app;
mod cli;
mod config;
mod error;
mod logging;
mod prefs;
mod snapshot;
mod switcher;
mod system;
#[cfg(test)]
mod testing;
mod ui;

use std::io;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use app::App;
use cli::Cli;
use config::{AppPaths, Config, Timing};
use switcher::Switcher;
use system::{Shell, SystemProcesses, SystemShell};
use ui::{handle_input, render};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(cli.root.clone());
    logging::init(&paths, !cli.is_interactive())?;
    info!(root = %paths.root.display(), "Starting mac-switcher");

    let prefs_dir = match cli.prefs_dir.clone() {
        Some(dir) => dir,
        None => prefs::user_preferences_dir()?,
    };
    let config = Config::load(&paths.config_file());
    let switcher = Switcher::new(
        config,
        &paths,
        prefs_dir,
        SystemShell,
        Box::new(SystemProcesses::new()),
        Timing::default(),
    );

    match cli.command {
        None | Some(cli::Cmd::Tui) => run_tui(switcher),
        Some(cmd) => cli::run(cmd, &switcher),
    }
}

fn run_tui<S: Shell>(switcher: Switcher<S>) -> anyhow::Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run application
    let result = run_app(&mut terminal, switcher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "TUI exited with an error");
    }

    result
}

fn run_app<S: Shell>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    switcher: Switcher<S>,
) -> anyhow::Result<()> {
    let mut app = App::new(switcher);

    loop {
        // Draw screen
        terminal.draw(|f| render(f, &mut app))?;

        // If a task is queued, run it after the loading screen is drawn
        if app.is_loading() {
            app.execute_task();
            continue;
        }

        // Handle user input
        if handle_input(&mut app)? {
            break;
        }
    }

    Ok(())
}
