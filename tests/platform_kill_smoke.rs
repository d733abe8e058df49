use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use procwatch::system::details::ProcessInspector;
use procwatch::system::kill::{KillResult, ProcessControl};

fn spawn_long_lived_child() -> Child {
    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("powershell");
        c.args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "Start-Sleep -Seconds 30",
        ]);
        c
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new("sh");
        c.args(["-c", "sleep 30"]);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn child process")
}

fn wait_for_exit(child: &mut Child, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) if Instant::now() < deadline => {
                thread::sleep(Duration::from_millis(50));
            }
            Ok(None) => {
                let _ = child.kill();
                panic!("child process did not exit before timeout");
            }
            Err(err) => {
                let _ = child.kill();
                panic!("failed waiting for child exit: {err}");
            }
        }
    }
}

#[test]
fn terminate_nonexistent_pid_returns_not_found() {
    let mut control = ProcessControl::new();
    let result = control.terminate(u32::MAX);
    assert!(matches!(result, KillResult::NotFound(_)));
    assert!(!result.success());
}

#[test]
fn details_of_spawned_child_are_readable() {
    let mut child = spawn_long_lived_child();
    let pid = child.id();

    let mut inspector = ProcessInspector::new();
    let details = inspector.get_details(pid);
    let _ = child.kill();
    let _ = child.wait();

    let details = details.expect("child should be visible to the inspector");
    assert_eq!(details.pid, pid);
    assert!(!details.name.is_empty());
}

#[test]
fn terminate_spawned_child() {
    let mut child = spawn_long_lived_child();
    let pid = child.id();
    let mut control = ProcessControl::new();

    let mut result = if cfg!(windows) {
        control.force_kill(pid)
    } else {
        control.terminate(pid)
    };
    if !result.success() {
        thread::sleep(Duration::from_millis(100));
        result = control.force_kill(pid);
    }

    match result {
        KillResult::Success(signalled, _) => {
            assert_eq!(signalled, pid);
            wait_for_exit(&mut child, Duration::from_secs(5));
        }
        KillResult::Failed(_, err) => {
            let _ = child.kill();
            panic!("signal delivery reported failure: {err}");
        }
        KillResult::NotFound(_) => {
            let _ = child.kill();
            panic!("child process not found before signalling");
        }
    }
}
