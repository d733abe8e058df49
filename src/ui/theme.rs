use ratatui::style::Color;

use crate::system::process::ProcessState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    pub background: Color,
    pub surface_bg: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub accent_fg: Color,
    pub overlay_border: Color,
    pub row_running: Color,
    pub row_stopped: Color,
    pub row_other: Color,
    pub row_fg: Color,
    pub row_other_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub sparkline_cpu: Color,
    pub sparkline_memory: Color,
    pub statusbar_bg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            kind: ThemeKind::Dark,
            background: Color::Rgb(0x12, 0x12, 0x12),
            surface_bg: Color::Rgb(0x1e, 0x1e, 0x1e),
            text_primary: Color::White,
            text_secondary: Color::Rgb(0xbb, 0xde, 0xfb),
            accent: Color::Rgb(0x02, 0x88, 0xd1),
            accent_fg: Color::White,
            overlay_border: Color::Rgb(0x02, 0x88, 0xd1),
            row_running: Color::Rgb(0x38, 0x8e, 0x3c),
            row_stopped: Color::Rgb(0xd3, 0x2f, 0x2f),
            row_other: Color::Rgb(0xff, 0xca, 0x28),
            row_fg: Color::White,
            row_other_fg: Color::Black,
            selection_bg: Color::Rgb(0x02, 0x77, 0xbd),
            selection_fg: Color::White,
            sparkline_cpu: Color::Rgb(0x02, 0x88, 0xd1),
            sparkline_memory: Color::Rgb(0xff, 0xca, 0x28),
            statusbar_bg: Color::Rgb(0x12, 0x12, 0x12),
            status_ok: Color::Rgb(0x66, 0xbb, 0x6a),
            status_err: Color::Rgb(0xef, 0x53, 0x50),
            pill_key_fg: Color::White,
            pill_key_bg: Color::Rgb(0x02, 0x88, 0xd1),
            pill_desc_fg: Color::Rgb(0xbb, 0xde, 0xfb),
        }
    }

    pub fn light() -> Self {
        Theme {
            kind: ThemeKind::Light,
            background: Color::Rgb(0xfa, 0xfa, 0xfa),
            surface_bg: Color::Rgb(0xee, 0xee, 0xee),
            text_primary: Color::Rgb(0x21, 0x21, 0x21),
            text_secondary: Color::Rgb(0x45, 0x5a, 0x64),
            accent: Color::Rgb(0x01, 0x57, 0x9b),
            accent_fg: Color::White,
            overlay_border: Color::Rgb(0x01, 0x57, 0x9b),
            row_running: Color::Rgb(0xc8, 0xe6, 0xc9),
            row_stopped: Color::Rgb(0xff, 0xcd, 0xd2),
            row_other: Color::Rgb(0xff, 0xf9, 0xc4),
            row_fg: Color::Rgb(0x21, 0x21, 0x21),
            row_other_fg: Color::Rgb(0x21, 0x21, 0x21),
            selection_bg: Color::Rgb(0x01, 0x57, 0x9b),
            selection_fg: Color::White,
            sparkline_cpu: Color::Rgb(0x01, 0x57, 0x9b),
            sparkline_memory: Color::Rgb(0xe6, 0x51, 0x00),
            statusbar_bg: Color::Rgb(0xee, 0xee, 0xee),
            status_ok: Color::Rgb(0x2e, 0x7d, 0x32),
            status_err: Color::Rgb(0xc6, 0x28, 0x28),
            pill_key_fg: Color::White,
            pill_key_bg: Color::Rgb(0x01, 0x57, 0x9b),
            pill_desc_fg: Color::Rgb(0x45, 0x5a, 0x64),
        }
    }

    /// Background and foreground for a table row in the given state.
    pub fn row_colors(&self, state: ProcessState) -> (Color, Color) {
        match state {
            ProcessState::Running => (self.row_running, self.row_fg),
            ProcessState::Stopped => (self.row_stopped, self.row_fg),
            _ => (self.row_other, self.row_other_fg),
        }
    }
}
