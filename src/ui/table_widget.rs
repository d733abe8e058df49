use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::{format_duration, truncate_unicode};
use crate::table::ProcessTable;
use crate::ui::theme::Theme;

pub const COLUMNS: [&str; 6] = ["PID", "Name", "State", "CPU (%)", "Memory (MB)", "Duration"];

const NAME_WIDTH: usize = 28;

/// Draws the current page and returns the scroll offset ratatui settled on,
/// so mouse clicks can be mapped back to rows.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    table: &ProcessTable,
    now: u64,
    theme: &Theme,
) -> usize {
    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(theme.accent_fg)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = table
        .page_rows()
        .map(|p| {
            let (bg, fg) = theme.row_colors(p.state);
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(truncate_unicode(&p.name, NAME_WIDTH)),
                Cell::from(p.state.label()),
                Cell::from(format!("{:.1}", p.cpu_percent)),
                Cell::from(format!("{:.1}", p.memory_mb)),
                Cell::from(format_duration(p.elapsed_secs(now))),
            ])
            .style(Style::default().fg(fg).bg(bg))
        })
        .collect();

    let title = if table.query().is_empty() {
        format!(" Processes ({}) ", table.total_rows())
    } else {
        format!(" Processes ({}) matching \"{}\" ", table.total_rows(), table.query())
    };

    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.overlay_border))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(theme.text_secondary)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(theme.background));

    let mut state = TableState::default().with_selected(table.selected_row());
    frame.render_stateful_widget(widget, area, &mut state);
    state.offset()
}
