use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, ResolvedKeybinds, StatusKind, StatusMessage, key_label};
use crate::ui::theme::Theme;

const CLOCK_WIDTH: u16 = 36;

/// Everything the bottom line shows, borrowed from the app for one frame.
pub struct StatusLine<'a> {
    pub input_mode: InputMode,
    pub query: &'a str,
    pub message: Option<&'a StatusMessage>,
    pub last_updated: Option<DateTime<Local>>,
    pub keybinds: &'a ResolvedKeybinds,
}

pub fn render(frame: &mut Frame, area: Rect, status: &StatusLine, theme: &Theme) {
    let StatusLine {
        input_mode,
        query,
        message: status_message,
        last_updated,
        keybinds: kb,
    } = *status;
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(CLOCK_WIDTH)])
        .split(area);

    let clock = match last_updated {
        Some(at) => format!("Last Updated: {} ", at.format("%Y-%m-%d %H:%M:%S")),
        None => "Last Updated: -- ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(clock, Style::default().fg(theme.text_secondary)))
            .alignment(Alignment::Right)
            .style(bg_style),
        chunks[1],
    );

    // Status message takes priority
    if let Some(message) = status_message {
        let color = match message.kind {
            StatusKind::Info => theme.status_ok,
            StatusKind::Error => theme.status_err,
        };
        let line = Line::from(Span::styled(
            format!(" {}", message.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), chunks[0]);
        return;
    }

    let line = match input_mode {
        InputMode::Search => {
            let mut spans = vec![
                Span::styled(
                    " Search ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {query}"), Style::default().fg(theme.pill_desc_fg)),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Done", theme));
            Line::from(spans)
        }
        _ if !query.is_empty() => {
            let mut spans = vec![
                Span::styled(
                    " Search: ",
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(query, Style::default().fg(theme.pill_desc_fg)),
            ];
            spans.extend(pill_spans(&key_label(kb.deselect), "Clear", theme));
            spans.extend(pill_spans(&key_label(kb.search), "Edit", theme));
            Line::from(spans)
        }
        _ => {
            let mut spans = Vec::new();
            for (code, desc) in [
                (kb.quit, "Quit"),
                (kb.search, "Search"),
                (kb.terminate, "Terminate"),
                (kb.force_kill, "Kill"),
                (kb.details, "Details"),
                (kb.cycle_sort, "Sort"),
                (kb.help, "Help"),
            ] {
                spans.extend(pill_spans(&key_label(code), desc, theme));
            }
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), chunks[0]);
}

fn pill_spans<'a>(key: &str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}

/// Page indicator shown under the table.
pub fn render_pager(frame: &mut Frame, area: Rect, page: usize, page_count: usize, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" ◀ p ", Style::default().fg(theme.text_secondary)),
        Span::styled(
            format!("Page {} of {}", page + 1, page_count),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" n ▶ ", Style::default().fg(theme.text_secondary)),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.background)),
        area,
    );
}
