use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Sparkline};

use crate::system::history::UsageHistory;
use crate::system::summary::SystemSummary;
use crate::ui::theme::Theme;

/// Series values are percent scaled by 100.
const SERIES_MAX: u64 = 10_000;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    history: &UsageHistory,
    summary: &SystemSummary,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let cpu = history.cpu_series();
    render_sparkline(
        frame,
        chunks[0],
        format!(" CPU Usage {:.1}% ", summary.cpu_percent),
        &cpu,
        theme.sparkline_cpu,
        theme,
    );

    let memory = history.memory_series();
    render_sparkline(
        frame,
        chunks[1],
        format!(" Memory Usage {:.1}% ", summary.memory_percent()),
        &memory,
        theme.sparkline_memory,
        theme,
    );
}

fn render_sparkline(
    frame: &mut Frame,
    area: Rect,
    title: String,
    data: &[u64],
    color: ratatui::style::Color,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    // Newest samples on the right edge.
    let width = area.width.saturating_sub(2) as usize;
    let visible = &data[data.len().saturating_sub(width)..];

    let sparkline = Sparkline::default()
        .block(block)
        .data(visible)
        .max(SERIES_MAX)
        .style(Style::default().fg(color));

    frame.render_widget(sparkline, area);
}
