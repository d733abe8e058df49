use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq)]
struct CpuSample {
    start_time: u64,
    percent: f32,
}

/// Last measured CPU percentage per pid.
///
/// Entries remember the start time of the process they were measured on, so
/// a recycled pid never inherits the reading of its predecessor.
#[derive(Debug, Default)]
pub struct CpuSampleCache {
    entries: HashMap<u32, CpuSample>,
}

impl CpuSampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pid: u32, start_time: u64, percent: f32) {
        self.entries.insert(
            pid,
            CpuSample {
                start_time,
                percent,
            },
        );
    }

    pub fn lookup(&self, pid: u32, start_time: u64) -> Option<f32> {
        self.entries
            .get(&pid)
            .filter(|sample| sample.start_time == start_time)
            .map(|sample| sample.percent)
    }

    /// Raw entry for `pid`, regardless of which process instance produced it.
    pub fn get(&self, pid: u32) -> Option<f32> {
        self.entries.get(&pid).map(|sample| sample.percent)
    }

    /// Drop entries for pids that were not observed by the latest resample.
    pub fn retain_pids(&mut self, alive: &HashSet<u32>) {
        self.entries.retain(|pid, _| alive.contains(pid));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
