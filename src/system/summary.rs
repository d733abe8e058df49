use serde::Serialize;
use sysinfo::System;

/// System-wide totals shown above the process table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SystemSummary {
    pub cpu_percent: f32,
    pub memory_used: u64,
    pub memory_total: u64,
}

impl SystemSummary {
    pub fn memory_percent(&self) -> f64 {
        if self.memory_total == 0 {
            return 0.0;
        }
        (self.memory_used as f64 / self.memory_total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

pub struct SummarySampler {
    sys: System,
}

impl Default for SummarySampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SummarySampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        SummarySampler { sys }
    }

    /// CPU usage is measured since the previous call.
    pub fn sample(&mut self) -> SystemSummary {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_usage();
        SystemSummary {
            cpu_percent: self.sys.global_cpu_usage(),
            memory_used: self.sys.used_memory(),
            memory_total: self.sys.total_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_percent_handles_zero_total() {
        assert_eq!(SystemSummary::default().memory_percent(), 0.0);
        let summary = SystemSummary {
            cpu_percent: 0.0,
            memory_used: 25,
            memory_total: 100,
        };
        assert!((summary.memory_percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sampler_reports_memory() {
        let mut sampler = SummarySampler::new();
        let summary = sampler.sample();
        assert!(summary.memory_total > 0);
        assert!(summary.memory_used <= summary.memory_total);
    }
}
