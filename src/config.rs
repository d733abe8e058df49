use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub graphs: GraphsConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub cpu_refresh_interval_ms: u64,
    pub processes_per_page: usize,
    pub default_sort: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            cpu_refresh_interval_ms: 5000,
            processes_per_page: 50,
            default_sort: "cpu".to_string(),
        }
    }
}

impl GeneralConfig {
    pub fn refresh_rate(&self) -> Duration {
        Duration::from_millis(self.refresh_rate_ms.max(100))
    }

    pub fn cpu_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_refresh_interval_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphsConfig {
    pub history_length: usize,
    pub sample_interval_ms: u64,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        GraphsConfig {
            history_length: 60,
            sample_interval_ms: 4000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub search: String,
    pub terminate: String,
    pub force_kill: String,
    pub details: String,
    pub refresh: String,
    pub deselect: String,
    pub next_page: String,
    pub prev_page: String,
    pub cycle_sort: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            search: "/".to_string(),
            terminate: "k".to_string(),
            force_kill: "K".to_string(),
            details: "Enter".to_string(),
            refresh: "r".to_string(),
            deselect: "Escape".to_string(),
            next_page: "n".to_string(),
            prev_page: "p".to_string(),
            cycle_sort: "s".to_string(),
            help: "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Log destination for the interactive UI. Nothing is logged without it.
    pub file: Option<PathBuf>,
}

/// Parses a keybind name from the config file.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" | "enter" => Some(KeyCode::Enter),
        "Escape" | "Esc" | "escape" | "esc" => Some(KeyCode::Esc),
        "Tab" | "tab" => Some(KeyCode::Tab),
        "Backspace" | "backspace" => Some(KeyCode::Backspace),
        "Delete" | "Del" | "delete" => Some(KeyCode::Delete),
        "Space" | "space" => Some(KeyCode::Char(' ')),
        "PageUp" | "pageup" => Some(KeyCode::PageUp),
        "PageDown" | "pagedown" => Some(KeyCode::PageDown),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procwatch").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
