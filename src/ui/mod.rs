pub mod detail_panel;
pub mod graphs;
pub mod header;
pub mod help;
pub mod statusbar;
pub mod table_widget;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::app::{App, InputMode};
use crate::system::process::unix_now;

pub fn draw(frame: &mut Frame, app: &mut App) {
    draw_at(frame, app, unix_now());
}

/// Draws one frame with `now` (seconds since epoch) as the reference for
/// process durations.
pub fn draw_at(frame: &mut Frame, app: &mut App, now: u64) {
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &app.summary,
        app.table.snapshot().len(),
        app.table.sort_mode(),
        &app.theme,
    );

    app.table_area = Some(chunks[1]);
    app.table_offset = table_widget::render(frame, chunks[1], &app.table, now, &app.theme);

    graphs::render(frame, chunks[2], &app.history, &app.summary, &app.theme);

    statusbar::render_pager(
        frame,
        chunks[3],
        app.table.page(),
        app.table.page_count(),
        &app.theme,
    );
    let status = statusbar::StatusLine {
        input_mode: app.input_mode,
        query: app.table.query(),
        message: app.status_message.as_ref(),
        last_updated: app.last_updated,
        keybinds: &app.keybinds,
    };
    statusbar::render(frame, chunks[4], &status, &app.theme);

    // Overlays are rendered last to appear on top
    if app.input_mode == InputMode::Details
        && let Some(details) = &app.details
    {
        detail_panel::render(frame, frame.area(), details, now, &app.theme);
    }
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
