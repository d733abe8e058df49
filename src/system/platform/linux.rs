use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn thread_count(pid: u32) -> Option<usize> {
        // /proc/{pid}/status carries a "Threads:\t<n>" line
        let path = format!("/proc/{pid}/status");
        let contents = std::fs::read_to_string(path).ok()?;
        parse_thread_count(&contents)
    }

    fn process_priority(pid: u32) -> Option<i32> {
        // Read /proc/{pid}/stat and parse priority (field 18, 0-indexed from stat)
        let path = format!("/proc/{pid}/stat");
        let contents = std::fs::read_to_string(path).ok()?;
        parse_priority(&contents)
    }
}

fn parse_thread_count(status: &str) -> Option<usize> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|value| value.trim().parse().ok())
}

fn parse_priority(stat: &str) -> Option<i32> {
    // comm field may contain spaces and parens, so find the closing )
    let after_comm = stat.rfind(')')? + 1;
    let fields: Vec<&str> = stat[after_comm..].split_whitespace().collect();
    // Fields after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4)
    // tpgid(5) flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10)
    // utime(11) stime(12) cutime(13) cstime(14) priority(15) nice(16)
    fields.get(15)?.parse().ok()
}
