use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::format_gb;
use crate::system::summary::SystemSummary;
use crate::table::SortMode;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    summary: &SystemSummary,
    process_count: usize,
    sort_mode: SortMode,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default()
        .fg(theme.text_secondary)
        .add_modifier(Modifier::BOLD);
    let value = Style::default().fg(theme.text_primary);

    let line = Line::from(vec![
        Span::styled(
            " procwatch ",
            Style::default()
                .fg(theme.accent_fg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("CPU ", label),
        Span::styled(format!("{:.1}%", summary.cpu_percent), value),
        Span::raw("  "),
        Span::styled("Memory ", label),
        Span::styled(
            format!(
                "{} / {} ({:.1}%)",
                format_gb(summary.memory_used),
                format_gb(summary.memory_total),
                summary.memory_percent()
            ),
            value,
        ),
        Span::raw("  "),
        Span::styled("Procs ", label),
        Span::styled(process_count.to_string(), value),
        Span::raw("  "),
        Span::styled("Sort ", label),
        Span::styled(sort_mode.label(), value),
    ]);

    frame.render_widget(Paragraph::new(line), inner);
}
