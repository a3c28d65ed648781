use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Screen};
use crate::system::Shell;

pub fn handle_input<S: Shell>(app: &mut App<S>) -> io::Result<bool> {
    if event::poll(std::time::Duration::from_millis(100))?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        handle_key(app, key);
    }
    Ok(app.should_quit)
}

fn handle_key<S: Shell>(app: &mut App<S>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::NameInput => match key.code {
            KeyCode::Enter => app.submit_name(),
            KeyCode::Esc => app.cancel(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        },
        Screen::FirstRun => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.accept_baseline(),
            KeyCode::Char('n') | KeyCode::Esc => app.decline_baseline(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
        Screen::ConfirmDelete(_) => match key.code {
            KeyCode::Char('y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel(),
            _ => {}
        },
        Screen::ConfirmLogout(_) => match key.code {
            KeyCode::Char('y') => app.answer_logout(true),
            KeyCode::Char('n') | KeyCode::Esc => app.answer_logout(false),
            _ => {}
        },
        Screen::Error(_) => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('r') => app.cancel(),
            _ => {}
        },
        Screen::Browse => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Char('n') => app.start_create(),
            KeyCode::Enter | KeyCode::Char('a') => app.request_apply(),
            KeyCode::Char('d') => app.request_delete(),
            KeyCode::Char('b') => app.request_baseline(),
            KeyCode::Char('r') => app.refresh(),
            _ => {}
        },
        // Input is ignored while a task is queued
        Screen::Loading(_) => {}
    }
}
