use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use tracing::{debug, trace, warn};

use super::cache::CpuSampleCache;
use super::process::ProcessSnapshot;
use super::source::{CollectError, ProcessSource, SysinfoSource};

/// Minimum spacing between two CPU resamples.
pub const DEFAULT_CPU_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// The full process list produced by one completed pass.
pub type Snapshot = Arc<Vec<ProcessSnapshot>>;

/// Owns process enumeration and publishes snapshots without ever blocking
/// the caller on it.
///
/// At most one pass runs at a time. A request that arrives while a pass is in
/// flight gets the last completed snapshot back and starts nothing.
pub struct SnapshotCollector {
    shared: Arc<Shared>,
}

struct Shared {
    collecting: AtomicBool,
    current: ArcSwap<Vec<ProcessSnapshot>>,
    pass: Mutex<PassState>,
    cpu_refresh_interval: Duration,
    completed_passes: AtomicU64,
    last_error: Mutex<Option<CollectError>>,
}

struct PassState {
    source: Box<dyn ProcessSource>,
    cache: CpuSampleCache,
    last_cpu_update: Option<Instant>,
}

/// Clears the collecting flag when the pass ends, even by panic.
struct CollectingGuard<'a>(&'a AtomicBool);

impl Drop for CollectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for SnapshotCollector {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_REFRESH_INTERVAL)
    }
}

impl SnapshotCollector {
    pub fn new(cpu_refresh_interval: Duration) -> Self {
        Self::with_source(SysinfoSource::new(), cpu_refresh_interval)
    }

    pub fn with_source(source: impl ProcessSource + 'static, cpu_refresh_interval: Duration) -> Self {
        SnapshotCollector {
            shared: Arc::new(Shared {
                collecting: AtomicBool::new(false),
                current: ArcSwap::from_pointee(Vec::new()),
                pass: Mutex::new(PassState {
                    source: Box::new(source),
                    cache: CpuSampleCache::new(),
                    last_cpu_update: None,
                }),
                cpu_refresh_interval,
                completed_passes: AtomicU64::new(0),
                last_error: Mutex::new(None),
            }),
        }
    }

    /// Returns the latest completed snapshot and, unless one is already
    /// running, kicks off a new pass in the background.
    pub fn request_snapshot(&self) -> Snapshot {
        if !self.shared.try_begin() {
            trace!("collection pass in flight, serving previous snapshot");
            return self.shared.current.load_full();
        }

        let snapshot = self.shared.current.load_full();
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("snapshot-collector".to_string())
            .spawn(move || {
                let _guard = CollectingGuard(&shared.collecting);
                if let Err(err) = shared.run_pass() {
                    warn!(error = %err, "collection pass failed");
                    *lock(&shared.last_error) = Some(err);
                }
            });

        if let Err(err) = spawned {
            warn!(error = %err, "could not spawn collection thread");
            *lock(&self.shared.last_error) = Some(CollectError::Spawn(err));
            self.shared.collecting.store(false, Ordering::Release);
        }

        snapshot
    }

    /// Runs a pass on the calling thread. If a background pass is already in
    /// flight the last completed snapshot is returned instead.
    pub fn collect_now(&self) -> Result<Snapshot, CollectError> {
        if !self.shared.try_begin() {
            return Ok(self.shared.current.load_full());
        }
        let _guard = CollectingGuard(&self.shared.collecting);
        self.shared.run_pass()
    }

    /// Latest completed snapshot, without starting anything.
    pub fn current(&self) -> Snapshot {
        self.shared.current.load_full()
    }

    pub fn is_collecting(&self) -> bool {
        self.shared.collecting.load(Ordering::Acquire)
    }

    pub fn completed_passes(&self) -> u64 {
        self.shared.completed_passes.load(Ordering::Acquire)
    }

    pub fn last_cpu_update(&self) -> Option<Instant> {
        lock(&self.shared.pass).last_cpu_update
    }

    pub fn cpu_refresh_interval(&self) -> Duration {
        self.shared.cpu_refresh_interval
    }

    /// Cached CPU percentage for `pid`, if any pass has recorded one.
    pub fn cached_cpu(&self, pid: u32) -> Option<f32> {
        lock(&self.shared.pass).cache.get(pid)
    }

    pub fn cached_cpu_len(&self) -> usize {
        lock(&self.shared.pass).cache.len()
    }

    /// Takes the error of the most recent failed pass, if any.
    pub fn take_error(&self) -> Option<CollectError> {
        lock(&self.shared.last_error).take()
    }

    /// Waits for an in-flight pass to finish. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_collecting() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }
}

impl Shared {
    fn try_begin(&self) -> bool {
        self.collecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn run_pass(&self) -> Result<Snapshot, CollectError> {
        let started = Instant::now();
        let processes = lock(&self.pass).collect(self.cpu_refresh_interval)?;
        let snapshot = Arc::new(processes);
        self.current.store(Arc::clone(&snapshot));
        let passes = self.completed_passes.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            pass = passes,
            processes = snapshot.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot published"
        );
        Ok(snapshot)
    }
}

impl PassState {
    fn collect(&mut self, interval: Duration) -> Result<Vec<ProcessSnapshot>, CollectError> {
        let now = Instant::now();
        let refresh_cpu = self
            .last_cpu_update
            .is_none_or(|last| now.duration_since(last) >= interval);

        let reads = self.source.enumerate(refresh_cpu)?;

        let mut processes = Vec::with_capacity(reads.len());
        let mut skipped = 0usize;
        for read in reads {
            let raw = match read {
                Ok(raw) => raw,
                Err(reason) => {
                    trace!(%reason, "skipping process");
                    skipped += 1;
                    continue;
                }
            };

            let cpu_percent = if refresh_cpu {
                let sampled = raw.cpu_percent.unwrap_or(0.0);
                self.cache.record(raw.pid, raw.start_time, sampled);
                sampled
            } else {
                self.cache.lookup(raw.pid, raw.start_time).unwrap_or(0.0)
            };
            processes.push(ProcessSnapshot::from_raw(raw, cpu_percent));
        }

        if refresh_cpu {
            let alive: HashSet<u32> = processes.iter().map(|p| p.pid).collect();
            self.cache.retain_pids(&alive);
            self.last_cpu_update = Some(now);
        }

        debug!(
            processes = processes.len(),
            skipped, refresh_cpu, "collection pass complete"
        );
        Ok(processes)
    }
}
