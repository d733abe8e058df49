use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::Level;

use crate::config::{LogFormat, LogLevel, LoggingConfig};

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Where log lines go.
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

/// Picks the destination for the current mode. The interactive UI owns the
/// terminal, so it only logs when a file is configured.
pub fn target_for<'a>(settings: &'a LoggingConfig, headless: bool) -> Option<LogTarget<'a>> {
    match (&settings.file, headless) {
        (Some(path), _) => Some(LogTarget::File(path.as_path())),
        (None, true) => Some(LogTarget::Stderr),
        (None, false) => None,
    }
}

pub fn init(settings: &LoggingConfig, target: LogTarget<'_>) -> Result<()> {
    let level = Level::from(settings.level);
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_names(true);

    let result = match target {
        LogTarget::File(path) => {
            ensure_parent_dir(path)?;
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            match settings.format {
                LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
                LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
            }
        }
        LogTarget::Stderr => {
            let builder = builder.with_writer(std::io::stderr);
            match settings.format {
                LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
                LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
            }
        }
    };
    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;

    tracing::info!(?level, "logging initialized");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn interactive_mode_without_file_does_not_log() {
        let settings = LoggingConfig::default();
        assert!(target_for(&settings, false).is_none());
        assert!(matches!(target_for(&settings, true), Some(LogTarget::Stderr)));
    }

    #[test]
    fn configured_file_wins() {
        let settings = LoggingConfig {
            file: Some(PathBuf::from("/tmp/procwatch.log")),
            ..LoggingConfig::default()
        };
        assert!(matches!(target_for(&settings, false), Some(LogTarget::File(_))));
        assert!(matches!(target_for(&settings, true), Some(LogTarget::File(_))));
    }

    #[test]
    fn level_mapping() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }
}
