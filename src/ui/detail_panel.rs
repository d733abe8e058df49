use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::format::{format_bytes, format_duration, truncate_unicode};
use crate::system::details::{DetailError, ProcessDetails};
use crate::ui::theme::Theme;

const WIDTH: u16 = 64;
const COMMAND_WIDTH: usize = 200;

/// Centered popup with everything `ProcessInspector` found out, or why it
/// could not.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    details: &Result<ProcessDetails, DetailError>,
    now: u64,
    theme: &Theme,
) {
    let (title, lines) = match details {
        Ok(d) => (format!(" Process {} ", d.pid), detail_lines(d, now, theme)),
        Err(err) => (
            " Process Details ".to_string(),
            vec![Line::from(Span::styled(
                format!(" {err}"),
                Style::default()
                    .fg(theme.status_err)
                    .add_modifier(Modifier::BOLD),
            ))],
        ),
    };

    let width = WIDTH.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 4).min(area.height.saturating_sub(2));
    let overlay = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(
            " Esc to close ",
            Style::default().fg(theme.text_secondary),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(theme.surface_bg));
    frame.render_widget(paragraph, overlay);
}

fn detail_lines(d: &ProcessDetails, now: u64, theme: &Theme) -> Vec<Line<'static>> {
    let command = if d.command.is_empty() {
        "(none)".to_string()
    } else {
        truncate_unicode(&d.command, COMMAND_WIDTH)
    };

    vec![
        detail_line("PID", d.pid.to_string(), theme),
        detail_line("Name", d.name.clone(), theme),
        detail_line("State", d.state.label().to_string(), theme),
        detail_line("User", d.user.clone(), theme),
        detail_line(
            "Started",
            format!("{} ago", format_duration(now.saturating_sub(d.start_time))),
            theme,
        ),
        detail_line("Memory", format_bytes(d.memory_bytes), theme),
        detail_line("Threads", optional(d.thread_count), theme),
        detail_line("Priority", optional(d.priority), theme),
        detail_line("Command", command, theme),
    ]
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn detail_line(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {label:<9}"),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.text_primary)),
    ])
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}
