use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sysinfo::ProcessStatus;

use super::source::RawProcess;

/// Name reported when the OS cannot tell us what a process is called.
pub const UNKNOWN_NAME: &str = "Unknown";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskSleep,
    Idle,
    Stopped,
    Tracing,
    Zombie,
    Dead,
    Unknown,
}

impl ProcessState {
    pub fn label(self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Sleeping => "sleeping",
            ProcessState::DiskSleep => "disk-sleep",
            ProcessState::Idle => "idle",
            ProcessState::Stopped => "stopped",
            ProcessState::Tracing => "tracing-stop",
            ProcessState::Zombie => "zombie",
            ProcessState::Dead => "dead",
            ProcessState::Unknown => "unknown",
        }
    }
}

impl From<ProcessStatus> for ProcessState {
    fn from(status: ProcessStatus) -> Self {
        match status {
            ProcessStatus::Run => ProcessState::Running,
            ProcessStatus::Sleep => ProcessState::Sleeping,
            ProcessStatus::UninterruptibleDiskSleep => ProcessState::DiskSleep,
            ProcessStatus::Idle => ProcessState::Idle,
            ProcessStatus::Stop => ProcessState::Stopped,
            ProcessStatus::Tracing => ProcessState::Tracing,
            ProcessStatus::Zombie => ProcessState::Zombie,
            ProcessStatus::Dead => ProcessState::Dead,
            _ => ProcessState::Unknown,
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One live process as seen by a single collection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    pub state: ProcessState,
    /// Percent of one core since the previous CPU sample of this pid.
    pub cpu_percent: f32,
    pub memory_mb: f64,
    /// Seconds since the Unix epoch.
    pub start_time: u64,
}

impl ProcessSnapshot {
    pub fn from_raw(raw: RawProcess, cpu_percent: f32) -> Self {
        ProcessSnapshot {
            pid: raw.pid,
            name: raw
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            state: raw.state,
            cpu_percent,
            memory_mb: raw.memory_bytes as f64 / BYTES_PER_MB,
            start_time: raw.start_time,
        }
    }

    /// Whole seconds the process has been alive at `now` (seconds since epoch).
    pub fn elapsed_secs(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_time)
    }
}

/// Current wall clock in seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
