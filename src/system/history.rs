use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::summary::SystemSummary;

const DEFAULT_CAPACITY: usize = 60;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(4);

/// Rolling window of system CPU and memory percentages for the graphs.
#[derive(Debug, Clone)]
pub struct UsageHistory {
    pub cpu: VecDeque<f64>,
    pub memory: VecDeque<f64>,
    capacity: usize,
    interval: Duration,
    last_sample: Option<Instant>,
}

impl UsageHistory {
    pub fn new(capacity: usize, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            cpu: VecDeque::with_capacity(capacity),
            memory: VecDeque::with_capacity(capacity),
            capacity,
            interval,
            last_sample: None,
        }
    }

    /// Records `summary` unless the previous point is younger than the
    /// sampling interval. Returns whether a point was added.
    pub fn record(&mut self, now: Instant, summary: &SystemSummary) -> bool {
        if self
            .last_sample
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval)
        {
            return false;
        }
        if self.cpu.len() == self.capacity {
            self.cpu.pop_front();
        }
        if self.memory.len() == self.capacity {
            self.memory.pop_front();
        }
        self.cpu.push_back(f64::from(summary.cpu_percent).clamp(0.0, 100.0));
        self.memory.push_back(summary.memory_percent());
        self.last_sample = Some(now);
        true
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    /// Percentages scaled by 100 for sparkline rendering.
    pub fn cpu_series(&self) -> Vec<u64> {
        scaled(&self.cpu)
    }

    pub fn memory_series(&self) -> Vec<u64> {
        scaled(&self.memory)
    }
}

fn scaled(values: &VecDeque<f64>) -> Vec<u64> {
    values.iter().map(|v| (v * 100.0).round() as u64).collect()
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_INTERVAL)
    }
}
