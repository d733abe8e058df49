use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
    NotFound(u32),
}

impl KillResult {
    pub fn success(&self) -> bool {
        matches!(self, KillResult::Success(..))
    }

    pub fn message(&self) -> String {
        match self {
            KillResult::Success(pid, signal) => format!("Sent {signal} to PID {pid}"),
            KillResult::Failed(_, err) => err.clone(),
            KillResult::NotFound(pid) => format!("Process {pid} not found"),
        }
    }

    /// The `(success, message)` pair shown to the user.
    pub fn into_report(self) -> (bool, String) {
        (self.success(), self.message())
    }
}

/// Sends termination signals to single processes on demand.
pub struct ProcessControl {
    sys: System,
}

impl Default for ProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl {
    pub fn new() -> Self {
        ProcessControl { sys: System::new() }
    }

    /// Asks the process to exit (SIGTERM where signals exist).
    pub fn terminate(&mut self, pid: u32) -> KillResult {
        self.send(pid, Signal::Term)
    }

    pub fn force_kill(&mut self, pid: u32) -> KillResult {
        self.send(pid, Signal::Kill)
    }

    fn send(&mut self, pid: u32, signal: Signal) -> KillResult {
        if pid == 0 {
            return KillResult::NotFound(pid);
        }
        let pids = [Pid::from_u32(pid)];
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing(),
        );
        let result = kill_process(&self.sys, pid, signal);
        match &result {
            KillResult::Success(pid, signal) => info!(pid, signal, "signal delivered"),
            KillResult::Failed(pid, err) => warn!(pid, %err, "signal failed"),
            KillResult::NotFound(pid) => warn!(pid, "signal target not found"),
        }
        result
    }
}

pub fn kill_process(sys: &System, pid: u32, signal: Signal) -> KillResult {
    let sysinfo_pid = Pid::from_u32(pid);
    match sys.process(sysinfo_pid) {
        Some(process) => {
            let signal_name = match signal {
                Signal::Term => "SIGTERM",
                Signal::Kill => "SIGKILL",
                _ => "signal",
            };
            match process.kill_with(signal) {
                Some(true) => KillResult::Success(pid, signal_name),
                Some(false) => KillResult::Failed(
                    pid,
                    format!("Failed to send {signal_name} to PID {pid} (permission denied?)"),
                ),
                None => {
                    // Signal not supported on this platform, fall back to kill()
                    if process.kill() {
                        KillResult::Success(pid, signal_name)
                    } else {
                        KillResult::Failed(
                            pid,
                            format!("Failed to kill PID {pid} (permission denied?)"),
                        )
                    }
                }
            }
        }
        None => KillResult::NotFound(pid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_messages() {
        assert_eq!(
            KillResult::Success(7, "SIGTERM").into_report(),
            (true, "Sent SIGTERM to PID 7".to_string())
        );
        assert_eq!(
            KillResult::NotFound(7).into_report(),
            (false, "Process 7 not found".to_string())
        );
        assert!(!KillResult::Failed(7, "nope".to_string()).success());
    }

    #[test]
    fn pid_zero_is_never_signalled() {
        let mut control = ProcessControl::new();
        assert_eq!(control.terminate(0), KillResult::NotFound(0));
    }
}
