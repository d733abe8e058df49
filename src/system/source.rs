//! The seam between the collector and the operating system's process table.

use std::time::Instant;

use sysinfo::{
    MINIMUM_CPU_UPDATE_INTERVAL, Process, ProcessRefreshKind, ProcessesToUpdate, System,
};

use super::process::ProcessState;

/// What a source could read about one process.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: Option<String>,
    pub state: ProcessState,
    pub memory_bytes: u64,
    pub start_time: u64,
    /// Present only when the pass asked for a fresh CPU sample.
    pub cpu_percent: Option<f32>,
}

/// Expected churn while walking the process table. Never fatal to a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("process {0} exited during the read")]
    Vanished(u32),
    #[error("access to process {0} denied")]
    AccessDenied(u32),
    #[error("process {0} is defunct")]
    Zombie(u32),
}

pub type ProcessRead = Result<RawProcess, ReadError>;

/// A failure that aborts a whole collection pass.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("process enumeration is not supported on {0}")]
    Unsupported(&'static str),
    #[error("process enumeration failed: {0}")]
    Enumeration(String),
    #[error("could not start collection thread: {0}")]
    Spawn(#[source] std::io::Error),
}

pub trait ProcessSource: Send {
    /// Walk every running process. `sample_cpu` asks for a new CPU
    /// measurement since the previous sampled call.
    fn enumerate(&mut self, sample_cpu: bool) -> Result<Vec<ProcessRead>, CollectError>;
}

pub struct SysinfoSource {
    sys: System,
    cpu_baseline: Instant,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        // Baseline CPU counters so the first sampled pass yields a real delta.
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        SysinfoSource {
            sys,
            cpu_baseline: Instant::now(),
        }
    }

    /// Blocks until the CPU counters are old enough for sysinfo to report
    /// a usable delta. Only the first sample after construction waits.
    fn settle_cpu_baseline(&self) {
        let age = self.cpu_baseline.elapsed();
        if age < MINIMUM_CPU_UPDATE_INTERVAL {
            let wait = MINIMUM_CPU_UPDATE_INTERVAL - age;
            tracing::trace!(wait_ms = wait.as_millis() as u64, "waiting for cpu baseline");
            std::thread::sleep(wait);
        }
    }
}

impl ProcessSource for SysinfoSource {
    fn enumerate(&mut self, sample_cpu: bool) -> Result<Vec<ProcessRead>, CollectError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(CollectError::Unsupported(std::env::consts::OS));
        }

        let kind = if sample_cpu {
            self.settle_cpu_baseline();
            ProcessRefreshKind::nothing().with_memory().with_cpu()
        } else {
            ProcessRefreshKind::nothing().with_memory()
        };
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, kind);
        if sample_cpu {
            self.cpu_baseline = Instant::now();
        }

        Ok(self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| read_process(pid.as_u32(), process, sample_cpu))
            .collect())
    }
}

fn read_process(pid: u32, process: &Process, sample_cpu: bool) -> ProcessRead {
    let state = ProcessState::from(process.status());
    match state {
        ProcessState::Zombie => return Err(ReadError::Zombie(pid)),
        ProcessState::Dead => return Err(ReadError::Vanished(pid)),
        _ => {}
    }

    let name = process.name().to_string_lossy();
    Ok(RawProcess {
        pid,
        name: (!name.is_empty()).then(|| name.into_owned()),
        state,
        memory_bytes: process.memory(),
        start_time: process.start_time(),
        cpu_percent: sample_cpu.then(|| process.cpu_usage()),
    })
}
