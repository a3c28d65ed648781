use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Screen, StatusKind};
use crate::system::Shell;

pub fn render<S: Shell>(frame: &mut Frame, app: &mut App<S>) {
    match app.screen.clone() {
        Screen::FirstRun => render_first_run_screen(frame, app),
        Screen::Browse => render_browse_screen(frame, app),
        Screen::NameInput => {
            render_browse_screen(frame, app);
            render_name_prompt(frame, app);
        }
        Screen::ConfirmDelete(name) => {
            render_browse_screen(frame, app);
            render_confirm(
                frame,
                " Delete ",
                Color::Red,
                vec![
                    Line::from(format!("  Delete snapshot '{}'?", name)),
                    Line::from(""),
                    Line::from(Span::styled(
                        "  [y] Delete  [n] Cancel",
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
            );
        }
        Screen::ConfirmLogout(name) => {
            render_browse_screen(frame, app);
            render_confirm(
                frame,
                " Applied ",
                Color::Green,
                vec![
                    Line::from(vec![
                        Span::styled("  ✓ ", Style::default().fg(Color::Green)),
                        Span::raw(format!("Snapshot '{}' applied", name)),
                    ]),
                    Line::from(""),
                    Line::from("  Some settings (Stage Manager, scrolling direction, ...)"),
                    Line::from("  only take effect after logging out."),
                    Line::from("  Save your work before logging out."),
                    Line::from(""),
                    Line::from(Span::styled(
                        "  [y] Log out now  [n] Later",
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
            );
        }
        Screen::Loading(_) => render_loading_screen(frame, app),
        Screen::Error(msg) => render_error_screen(frame, &msg),
    }
}

fn status_color(kind: &StatusKind) -> Color {
    match kind {
        StatusKind::Success => Color::Green,
        StatusKind::Warning => Color::Yellow,
        StatusKind::Info => Color::Cyan,
    }
}

fn render_first_run_screen<S: Shell>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let title = Paragraph::new("mac-switcher - macOS Settings Snapshots")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let targets = app.switcher.config().plist_files().len();
    let instructions = Paragraph::new(vec![
        Line::from(""),
        Line::from("  No default snapshot found."),
        Line::from(""),
        Line::from(format!(
            "  The current state of {} preference files will be saved as",
            targets
        )),
        Line::from("  'backup_default'. Every apply restores it first, so it should"),
        Line::from("  capture your settings before any customization."),
        Line::from(""),
        Line::from("  Create the default snapshot now?"),
        Line::from(""),
        Line::from(Span::styled(
            "  [y] Create  [n] Skip  [q] Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(" First Run "));
    frame.render_widget(instructions, chunks[1]);

    let status = Paragraph::new("Waiting for confirmation")
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[2]);
}

fn render_browse_screen<S: Shell>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    // Header (show status message if available)
    let (header_text, header_color) = match app.get_status() {
        Some(status) => (status.text.clone(), status_color(&status.kind)),
        None if !app.has_baseline() => (
            "No default snapshot - press [b] to create it".to_string(),
            Color::Yellow,
        ),
        None => (format!("{} snapshots", app.entries.len()), Color::Cyan),
    };

    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(header_color)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" mac-switcher "));
    frame.render_widget(header, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    render_snapshot_list(frame, app, main_chunks[0]);
    render_details(frame, app, main_chunks[1]);

    let footer_text = if app.has_baseline() {
        "[j/k] Move  [Enter] Apply  [n] New  [d] Delete  [r] Refresh  [q] Quit"
    } else {
        "[j/k] Move  [b] Create default  [n] New  [d] Delete  [r] Refresh  [q] Quit"
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(footer, chunks[2]);
}

fn render_snapshot_list<S: Shell>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| {
            if entry.is_baseline() {
                ListItem::new(Line::from(vec![
                    Span::raw(entry.name.clone()),
                    Span::styled(" (#base)", Style::default().fg(Color::DarkGray)),
                ]))
            } else {
                ListItem::new(entry.name.clone())
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Snapshots "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_details<S: Shell>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(details) = &app.details else {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No snapshot selected. Press [n] to save one.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![Line::from("")];
    match &details.meta {
        Some(meta) => {
            lines.push(Line::from(vec![
                Span::styled("  Created  ", Style::default().fg(Color::DarkGray)),
                Span::raw(meta.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  macOS    ", Style::default().fg(Color::DarkGray)),
                Span::raw(meta.system_version.clone()),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "  meta.json missing or unreadable",
            Style::default().fg(Color::Yellow),
        ))),
    }
    lines.push(Line::from(""));

    for file in &details.files {
        let line = match (file.size, file.keys) {
            (Some(size), keys) => {
                let keys = keys.map(|k| format!(", {} keys", k)).unwrap_or_default();
                Line::from(vec![
                    Span::styled("  ✓ ", Style::default().fg(Color::Green)),
                    Span::raw(file.identifier.clone()),
                    Span::styled(
                        format!("  {} bytes{}", size, keys),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            }
            (None, _) => Line::from(vec![
                Span::styled("  ✗ ", Style::default().fg(Color::Red)),
                Span::styled(file.identifier.clone(), Style::default().fg(Color::DarkGray)),
                Span::styled("  not in snapshot", Style::default().fg(Color::DarkGray)),
            ]),
        };
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Centered box over the current screen
fn popup_area(area: Rect, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical[1])[1]
}

fn render_name_prompt<S: Shell>(frame: &mut Frame, app: &mut App<S>) {
    let area = popup_area(frame.area(), 7);

    let hint = match app.get_status() {
        Some(status) if status.kind == StatusKind::Warning => {
            Span::styled(format!("  {}", status.text), Style::default().fg(Color::Yellow))
        }
        _ => Span::styled(
            "  [Enter] Save  [Esc] Cancel",
            Style::default().fg(Color::DarkGray),
        ),
    };

    let prompt = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(Color::Cyan)),
            Span::raw(app.input.clone()),
            Span::styled("_", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(hint),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New Snapshot "),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}

fn render_confirm(frame: &mut Frame, title: &str, color: Color, lines: Vec<Line>) {
    let area = popup_area(frame.area(), lines.len() as u16 + 3);
    let mut body = vec![Line::from("")];
    body.extend(lines);

    let confirm = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(confirm, area);
}

fn render_loading_screen<S: Shell>(frame: &mut Frame, app: &mut App<S>) {
    let area = popup_area(frame.area(), 7);

    let msg = app
        .get_status()
        .map(|s| s.text.as_str())
        .unwrap_or("Working...");

    let loading_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Working ");

    let loading = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ◐ ", Style::default().fg(Color::Yellow)),
            Span::raw(msg),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Please wait...",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: false })
    .block(loading_block);

    frame.render_widget(loading, area);
}

fn render_error_screen(frame: &mut Frame, msg: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(frame.area());

    let error = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ✗ ", Style::default().fg(Color::Red)),
            Span::raw(msg),
        ]),
    ])
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title(" Error "));
    frame.render_widget(error, chunks[0]);

    let help = Paragraph::new("Press [Enter] to go back or [q] to quit. Details are in macswitcher.log")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, chunks[1]);
}
