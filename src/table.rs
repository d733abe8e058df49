//! Search, ordering, paging and selection over the latest snapshot.
//!
//! Pure model code: no terminal types and no OS calls.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::system::collector::Snapshot;
use crate::system::process::ProcessSnapshot;

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Cpu,
    Memory,
    Name,
    Pid,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Cpu => SortMode::Memory,
            SortMode::Memory => SortMode::Name,
            SortMode::Name => SortMode::Pid,
            SortMode::Pid => SortMode::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Cpu => "CPU",
            SortMode::Memory => "Memory",
            SortMode::Name => "Name",
            SortMode::Pid => "PID",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => SortMode::Memory,
            "name" => SortMode::Name,
            "pid" => SortMode::Pid,
            _ => SortMode::Cpu,
        }
    }

    fn compare(self, a: &ProcessSnapshot, b: &ProcessSnapshot) -> Ordering {
        let primary = match self {
            SortMode::Cpu => b.cpu_percent.total_cmp(&a.cpu_percent),
            SortMode::Memory => b.memory_mb.total_cmp(&a.memory_mb),
            SortMode::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortMode::Pid => Ordering::Equal,
        };
        primary.then(a.pid.cmp(&b.pid))
    }
}

/// Indices of the processes whose name contains `query`, case-insensitively.
pub fn filter_indices(processes: &[ProcessSnapshot], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    processes
        .iter()
        .enumerate()
        .filter(|(_, p)| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Number of pages needed for `rows` entries. Always at least one.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    rows.div_ceil(page_size).max(1)
}

pub struct ProcessTable {
    snapshot: Snapshot,
    rows: Vec<usize>,
    query: String,
    sort_mode: SortMode,
    page: usize,
    page_size: usize,
    selected_pid: Option<u32>,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SortMode::default())
    }
}

impl ProcessTable {
    pub fn new(page_size: usize, sort_mode: SortMode) -> Self {
        ProcessTable {
            snapshot: Arc::new(Vec::new()),
            rows: Vec::new(),
            query: String::new(),
            sort_mode,
            page: 0,
            page_size: page_size.max(1),
            selected_pid: None,
        }
    }

    /// Adopts a new snapshot. The selection survives as long as its pid is
    /// still listed.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.rebuild();
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 0;
        self.rebuild();
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) {
        self.sort_mode = sort_mode;
        self.rebuild();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.rows.len(), self.page_size)
    }

    /// Processes matching the current search.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn page_rows(&self) -> impl Iterator<Item = &ProcessSnapshot> {
        let start = (self.page * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        self.rows[start..end].iter().map(|&i| &self.snapshot[i])
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_pid
    }

    pub fn selected(&self) -> Option<&ProcessSnapshot> {
        let pid = self.selected_pid?;
        self.rows
            .iter()
            .map(|&i| &self.snapshot[i])
            .find(|p| p.pid == pid)
    }

    /// Position of the selection within the current page.
    pub fn selected_row(&self) -> Option<usize> {
        let pid = self.selected_pid?;
        self.page_rows().position(|p| p.pid == pid)
    }

    pub fn select_row(&mut self, row: usize) -> bool {
        let pid = self.page_rows().nth(row).map(|p| p.pid);
        match pid {
            Some(pid) => {
                self.selected_pid = Some(pid);
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.step_selection(-1);
    }

    pub fn deselect(&mut self) {
        self.selected_pid = None;
    }

    fn step_selection(&mut self, delta: isize) {
        let len = self.page_rows().count();
        if len == 0 {
            return;
        }
        let target = match self.selected_row() {
            Some(row) => row.saturating_add_signed(delta).min(len - 1),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.select_row(target);
    }

    fn rebuild(&mut self) {
        let snapshot = &self.snapshot;
        let mut rows = filter_indices(snapshot, &self.query);
        let sort_mode = self.sort_mode;
        rows.sort_by(|&a, &b| sort_mode.compare(&snapshot[a], &snapshot[b]));
        self.rows = rows;

        let last_page = self.page_count() - 1;
        self.page = self.page.min(last_page);

        if let Some(pid) = self.selected_pid
            && !self.rows.iter().any(|&i| self.snapshot[i].pid == pid)
        {
            self.selected_pid = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::process::ProcessState;

    fn proc(pid: u32, name: &str, cpu: f32, memory_mb: f64) -> ProcessSnapshot {
        ProcessSnapshot {
            pid,
            name: name.to_string(),
            state: ProcessState::Running,
            cpu_percent: cpu,
            memory_mb,
            start_time: 0,
        }
    }

    fn table(processes: Vec<ProcessSnapshot>, page_size: usize) -> ProcessTable {
        let mut table = ProcessTable::new(page_size, SortMode::Pid);
        table.set_snapshot(Arc::new(processes));
        table
    }

    #[test]
    fn sort_mode_cycles_through_all_variants() {
        let mode = SortMode::Cpu;
        assert_eq!(mode.next(), SortMode::Memory);
        assert_eq!(mode.next().next(), SortMode::Name);
        assert_eq!(mode.next().next().next(), SortMode::Pid);
        assert_eq!(mode.next().next().next().next(), SortMode::Cpu);
    }

    #[test]
    fn cpu_sort_is_descending_with_pid_tiebreak() {
        let mut t = table(
            vec![
                proc(3, "c", 5.0, 1.0),
                proc(1, "a", 50.0, 1.0),
                proc(2, "b", 5.0, 1.0),
            ],
            10,
        );
        t.set_sort_mode(SortMode::Cpu);
        let pids: Vec<u32> = t.page_rows().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1, 2, 3]);
    }

    #[test]
    fn nan_cpu_sorts_to_a_stable_position() {
        let mut t = table(
            vec![
                proc(1, "a", 3.0, f64::NAN),
                proc(2, "b", f32::NAN, 2.0),
                proc(3, "c", 7.0, 1.0),
                proc(4, "d", 3.0, 4.0),
            ],
            10,
        );
        t.set_sort_mode(SortMode::Cpu);
        let pids: Vec<u32> = t.page_rows().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 3, 1, 4]);

        t.set_sort_mode(SortMode::Memory);
        let pids: Vec<u32> = t.page_rows().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1, 4, 2, 3]);
    }

    #[test]
    fn select_row_picks_from_current_page() {
        let processes = (1..=15).map(|pid| proc(pid, "p", 0.0, 1.0)).collect();
        let mut t = table(processes, 10);
        assert!(t.next_page());

        assert!(t.select_row(2));
        assert_eq!(t.selected_pid(), Some(13));
        assert_eq!(t.selected_row(), Some(2));

        assert!(!t.select_row(5));
        assert_eq!(t.selected_pid(), Some(13));
    }

    #[test]
    fn search_is_case_insensitive_and_resets_page() {
        let processes = (1..=30)
            .map(|pid| proc(pid, if pid % 2 == 0 { "Firefox" } else { "bash" }, 0.0, 1.0))
            .collect();
        let mut t = table(processes, 10);
        assert!(t.next_page());
        t.set_query("FIRE");
        assert_eq!(t.page(), 0);
        assert_eq!(t.total_rows(), 15);
        assert_eq!(t.page_count(), 2);
    }

    #[test]
    fn empty_table_has_one_page() {
        let t = table(Vec::new(), 50);
        assert_eq!(t.page_count(), 1);
        assert_eq!(t.page_rows().count(), 0);
    }

    #[test]
    fn selection_survives_refresh_but_not_exit() {
        let mut t = table(vec![proc(1, "a", 0.0, 1.0), proc(2, "b", 0.0, 1.0)], 10);
        t.select_next();
        t.select_next();
        assert_eq!(t.selected_pid(), Some(2));

        t.set_snapshot(Arc::new(vec![proc(2, "b", 9.0, 1.0), proc(3, "c", 0.0, 1.0)]));
        assert_eq!(t.selected_pid(), Some(2));
        assert_eq!(t.selected().map(|p| p.cpu_percent), Some(9.0));

        t.set_snapshot(Arc::new(vec![proc(3, "c", 0.0, 1.0)]));
        assert_eq!(t.selected_pid(), None);
    }

    #[test]
    fn page_clamps_when_rows_shrink() {
        let processes = (1..=25).map(|pid| proc(pid, "p", 0.0, 1.0)).collect();
        let mut t = table(processes, 10);
        t.next_page();
        t.next_page();
        assert_eq!(t.page(), 2);
        assert!(!t.next_page());

        t.set_snapshot(Arc::new(vec![proc(1, "p", 0.0, 1.0)]));
        assert_eq!(t.page(), 0);
    }
}
