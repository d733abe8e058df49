use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::collector::SnapshotCollector;
use crate::system::details::{DetailError, ProcessDetails, ProcessInspector};
use crate::system::history::UsageHistory;
use crate::system::kill::{KillResult, ProcessControl};
use crate::system::summary::{SummarySampler, SystemSummary};
use crate::table::{ProcessTable, SortMode};
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Help,
    Details,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub search: KeyCode,
    pub terminate: KeyCode,
    pub force_kill: KeyCode,
    pub details: KeyCode,
    pub refresh: KeyCode,
    pub deselect: KeyCode,
    pub next_page: KeyCode,
    pub prev_page: KeyCode,
    pub cycle_sort: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            search: parse_key(&kb.search).unwrap_or(KeyCode::Char('/')),
            terminate: parse_key(&kb.terminate).unwrap_or(KeyCode::Char('k')),
            force_kill: parse_key(&kb.force_kill).unwrap_or(KeyCode::Char('K')),
            details: parse_key(&kb.details).unwrap_or(KeyCode::Enter),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            deselect: parse_key(&kb.deselect).unwrap_or(KeyCode::Esc),
            next_page: parse_key(&kb.next_page).unwrap_or(KeyCode::Char('n')),
            prev_page: parse_key(&kb.prev_page).unwrap_or(KeyCode::Char('p')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.search), "Search by name"),
            (key_label(self.terminate), "Terminate (SIGTERM)"),
            (key_label(self.force_kill), "Force kill (SIGKILL)"),
            (key_label(self.details), "Show details"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.deselect), "Deselect"),
            (key_label(self.next_page), "Next page"),
            (key_label(self.prev_page), "Previous page"),
            (key_label(self.cycle_sort), "Cycle sort column"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓".to_string(), "Select row"));
        entries.push(("PgUp/PgDn".to_string(), "Change page"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub created: Instant,
}

pub struct App {
    pub running: bool,
    pub collector: SnapshotCollector,
    pub control: ProcessControl,
    pub inspector: ProcessInspector,
    summary_sampler: SummarySampler,
    pub summary: SystemSummary,
    pub history: UsageHistory,
    pub table: ProcessTable,
    pub input_mode: InputMode,
    pub details: Option<Result<ProcessDetails, DetailError>>,
    pub status_message: Option<StatusMessage>,
    pub last_updated: Option<DateTime<Local>>,
    pub table_area: Option<Rect>,
    pub table_offset: usize,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: Config) -> Self {
        let collector = SnapshotCollector::new(config.general.cpu_refresh_interval());
        Self::with_collector(&config, collector)
    }

    pub fn with_collector(config: &Config, collector: SnapshotCollector) -> Self {
        let history = UsageHistory::new(
            config.graphs.history_length,
            Duration::from_millis(config.graphs.sample_interval_ms),
        );
        let table = ProcessTable::new(
            config.general.processes_per_page,
            SortMode::from_str_config(&config.general.default_sort),
        );

        let mut app = App {
            running: true,
            collector,
            control: ProcessControl::new(),
            inspector: ProcessInspector::new(),
            summary_sampler: SummarySampler::new(),
            summary: SystemSummary::default(),
            history,
            table,
            input_mode: InputMode::Normal,
            details: None,
            status_message: None,
            last_updated: None,
            table_area: None,
            table_offset: 0,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        };

        // Fill the table before the first frame instead of waiting a tick.
        match app.collector.collect_now() {
            Ok(snapshot) => app.table.set_snapshot(snapshot),
            Err(err) => app.set_status(StatusKind::Error, format!("Failed to update data: {err}")),
        }
        app.sample_summary();
        app
    }

    /// One polling cycle: pick up whatever the collector has finished and
    /// start the next pass.
    pub fn refresh_data(&mut self) {
        let snapshot = self.collector.request_snapshot();
        if let Some(err) = self.collector.take_error() {
            warn!(error = %err, "snapshot refresh failed");
            self.set_status(StatusKind::Error, format!("Failed to update data: {err}"));
        }
        self.table.set_snapshot(snapshot);
        self.sample_summary();

        if let Some(message) = &self.status_message
            && message.created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    fn sample_summary(&mut self) {
        self.summary = self.summary_sampler.sample();
        self.history.record(Instant::now(), &self.summary);
        self.last_updated = Some(Local::now());
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Search => self.map_key_search(key),
            InputMode::Help => self.map_key_help(key),
            InputMode::Details => self.map_key_details(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Arrow and paging keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageDown | KeyCode::Right => return Action::NextPage,
            KeyCode::PageUp | KeyCode::Left => return Action::PrevPage,
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.search {
            return Action::EnterSearchMode;
        }
        if code == kb.terminate {
            return self.with_selected(Action::Terminate, "terminate");
        }
        if code == kb.force_kill {
            return self.with_selected(Action::ForceKill, "kill");
        }
        if code == kb.details {
            return self.with_selected(Action::ShowDetails, "inspect");
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.deselect {
            return if self.table.selected_pid().is_some() {
                Action::Deselect
            } else if !self.table.query().is_empty() {
                Action::ClearSearch
            } else {
                Action::None
            };
        }
        if code == kb.next_page {
            return Action::NextPage;
        }
        if code == kb.prev_page {
            return Action::PrevPage;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn with_selected(&self, make: fn(u32) -> Action, verb: &'static str) -> Action {
        match self.table.selected_pid() {
            Some(pid) => make(pid),
            None => Action::NeedsSelection(verb),
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_details(&self, key: KeyEvent) -> Action {
        let code = key.code;
        if code == KeyCode::Esc || code == KeyCode::Enter || code == self.keybinds.details {
            return Action::CloseOverlay;
        }
        Action::None
    }

    fn map_key_search(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearSearch,
            KeyCode::Enter => Action::ExitSearchMode,
            KeyCode::Backspace => {
                let mut text = self.table.query().to_string();
                text.pop();
                Action::UpdateSearch(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.table.query().to_string();
                text.push(c);
                Action::UpdateSearch(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(Direction::Up) => self.table.select_prev(),
            Action::Navigate(Direction::Down) => self.table.select_next(),
            Action::NextPage => {
                self.table.next_page();
            }
            Action::PrevPage => {
                self.table.prev_page();
            }
            Action::EnterSearchMode => self.input_mode = InputMode::Search,
            Action::ExitSearchMode => self.input_mode = InputMode::Normal,
            Action::ClearSearch => {
                self.table.set_query(String::new());
                self.input_mode = InputMode::Normal;
            }
            Action::UpdateSearch(text) => self.table.set_query(text),
            Action::Terminate(pid) => {
                let result = self.control.terminate(pid);
                self.after_kill(result);
            }
            Action::ForceKill(pid) => {
                let result = self.control.force_kill(pid);
                self.after_kill(result);
            }
            Action::ShowDetails(pid) => {
                let details = self.inspector.get_details(pid);
                if let Err(err) = &details {
                    debug!(pid, %err, "details unavailable");
                }
                self.details = Some(details);
                self.input_mode = InputMode::Details;
            }
            Action::NeedsSelection(verb) => {
                self.set_status(StatusKind::Info, format!("Select a process to {verb} first"));
            }
            Action::CloseOverlay => {
                self.details = None;
                self.input_mode = InputMode::Normal;
            }
            Action::Deselect => self.table.deselect(),
            Action::CycleSortMode => {
                let next = self.table.sort_mode().next();
                self.table.set_sort_mode(next);
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => {
                self.refresh_data();
                let failed = self
                    .status_message
                    .as_ref()
                    .is_some_and(|m| m.kind == StatusKind::Error);
                if !failed {
                    self.set_status(StatusKind::Info, "Data refreshed".to_string());
                }
            }
            Action::SelectAt(col, row) => self.select_at(col, row),
            Action::None => {}
        }
    }

    fn after_kill(&mut self, result: KillResult) {
        let (success, message) = result.into_report();
        if success {
            self.table.deselect();
            self.refresh_data();
            self.set_status(StatusKind::Info, message);
        } else {
            self.set_status(StatusKind::Error, message);
        }
    }

    fn select_at(&mut self, col: u16, row: u16) {
        let Some(area) = self.table_area else {
            return;
        };
        // Border plus header row sit above the first data row.
        let first_row = area.y + 2;
        let last_row = area.y + area.height.saturating_sub(1);
        if col < area.x || col >= area.x + area.width || row < first_row || row >= last_row {
            return;
        }
        let index = self.table_offset + (row - first_row) as usize;
        self.table.select_row(index);
    }

    pub fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            kind,
            created: Instant::now(),
        });
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    /// Lets an in-flight pass finish before the process exits.
    pub fn shutdown(&self, timeout: Duration) {
        if !self.collector.wait_idle(timeout) {
            warn!("collection pass still running at shutdown");
        }
    }
}
