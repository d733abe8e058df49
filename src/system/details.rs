use serde::Serialize;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};
use tracing::debug;

use super::platform;
use super::process::{ProcessState, UNKNOWN_NAME};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessDetails {
    pub pid: u32,
    pub name: String,
    pub command: String,
    pub state: ProcessState,
    pub start_time: u64,
    pub user: String,
    pub thread_count: Option<usize>,
    pub priority: Option<i32>,
    pub memory_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetailError {
    #[error("Process {0} not found")]
    NotFound(u32),
    #[error("Process {0} is a zombie")]
    Zombie(u32),
}

/// One-shot lookups of information the table does not carry.
pub struct ProcessInspector {
    sys: System,
    users: Users,
}

impl Default for ProcessInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInspector {
    pub fn new() -> Self {
        ProcessInspector {
            sys: System::new(),
            users: Users::new_with_refreshed_list(),
        }
    }

    pub fn get_details(&mut self, pid: u32) -> Result<ProcessDetails, DetailError> {
        let sys_pid = Pid::from_u32(pid);
        let pids = [sys_pid];
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet)
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );

        let process = self.sys.process(sys_pid).ok_or(DetailError::NotFound(pid))?;
        let state = ProcessState::from(process.status());
        match state {
            ProcessState::Zombie => return Err(DetailError::Zombie(pid)),
            ProcessState::Dead => return Err(DetailError::NotFound(pid)),
            _ => {}
        }

        let user = process
            .user_id()
            .map(|uid| {
                self.users
                    .get_user_by_id(uid)
                    .map(|user| user.name().to_string())
                    .unwrap_or_else(|| format!("{uid:?}"))
            })
            .unwrap_or_else(|| "N/A".to_string());

        let name = process.name().to_string_lossy().to_string();
        let command = process
            .cmd()
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        debug!(pid, %user, "details looked up");

        Ok(ProcessDetails {
            pid,
            name: if name.is_empty() {
                UNKNOWN_NAME.to_string()
            } else {
                name
            },
            command,
            state,
            start_time: process.start_time(),
            user,
            thread_count: platform::thread_count(pid),
            priority: platform::process_priority(pid),
            memory_bytes: process.memory(),
        })
    }
}
