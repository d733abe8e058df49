use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use procwatch::system::collector::SnapshotCollector;
use procwatch::system::process::ProcessState;
use procwatch::system::source::{CollectError, ProcessRead, ProcessSource, RawProcess, ReadError};

const LONG: Duration = Duration::from_secs(3600);
const WAIT: Duration = Duration::from_secs(5);

fn raw(pid: u32, start_time: u64, cpu: Option<f32>) -> RawProcess {
    RawProcess {
        pid,
        name: Some(format!("proc{pid}")),
        state: ProcessState::Running,
        memory_bytes: 2 * 1024 * 1024,
        start_time,
        cpu_percent: cpu,
    }
}

/// Source driven by a closure that sees whether CPU is being sampled.
struct FnSource<F>(F);

impl<F> ProcessSource for FnSource<F>
where
    F: FnMut(bool) -> Result<Vec<ProcessRead>, CollectError> + Send,
{
    fn enumerate(&mut self, sample_cpu: bool) -> Result<Vec<ProcessRead>, CollectError> {
        (self.0)(sample_cpu)
    }
}

fn fn_source<F>(f: F) -> FnSource<F>
where
    F: FnMut(bool) -> Result<Vec<ProcessRead>, CollectError> + Send,
{
    FnSource(f)
}

/// Source whose passes block until the test hands out a permit.
struct Gated {
    permits: Receiver<()>,
    started: Arc<AtomicUsize>,
}

impl ProcessSource for Gated {
    fn enumerate(&mut self, _sample_cpu: bool) -> Result<Vec<ProcessRead>, CollectError> {
        let pass = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        self.permits
            .recv()
            .map_err(|_| CollectError::Enumeration("gate closed".to_string()))?;
        Ok(vec![Ok(raw(pass as u32, 0, Some(1.0)))])
    }
}

fn gated() -> (SnapshotCollector, Sender<()>, Arc<AtomicUsize>) {
    let (tx, rx) = channel();
    let started = Arc::new(AtomicUsize::new(0));
    let source = Gated {
        permits: rx,
        started: Arc::clone(&started),
    };
    (SnapshotCollector::with_source(source, LONG), tx, started)
}

fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not reached in time");
}

#[test]
fn request_during_pass_returns_previous_snapshot_and_starts_nothing() {
    let (collector, permits, started) = gated();

    permits.send(()).unwrap();
    let first = collector.collect_now().unwrap();
    assert_eq!(first.len(), 1);

    // Second pass starts in the background and parks on the gate.
    let served = collector.request_snapshot();
    assert!(Arc::ptr_eq(&served, &first));
    wait_until(|| started.load(Ordering::SeqCst) == 2);
    assert!(collector.is_collecting());

    for _ in 0..5 {
        let again = collector.request_snapshot();
        assert!(Arc::ptr_eq(&again, &first));
    }
    assert!(Arc::ptr_eq(&collector.collect_now().unwrap(), &first));
    assert_eq!(started.load(Ordering::SeqCst), 2);

    permits.send(()).unwrap();
    assert!(collector.wait_idle(WAIT));
    assert_eq!(collector.completed_passes(), 2);
    assert!(!Arc::ptr_eq(&collector.current(), &first));
    assert_eq!(collector.current()[0].pid, 2);
}

#[test]
fn first_pass_always_samples_cpu() {
    let sampled = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&sampled);
    let source = fn_source(move |sample_cpu| {
        log.lock().unwrap().push(sample_cpu);
        Ok(vec![Ok(raw(1, 0, sample_cpu.then_some(4.0)))])
    });
    let collector = SnapshotCollector::with_source(source, LONG);
    assert!(collector.last_cpu_update().is_none());

    let snapshot = collector.collect_now().unwrap();
    assert_eq!(snapshot[0].cpu_percent, 4.0);
    assert!(collector.last_cpu_update().is_some());
    assert_eq!(*sampled.lock().unwrap(), vec![true]);
}

#[test]
fn throttled_pass_keeps_cpu_update_time_and_cached_values() {
    let source = fn_source(|sample_cpu| {
        let cpu = if sample_cpu { Some(10.0) } else { Some(99.0) };
        Ok(vec![Ok(raw(100, 500, cpu))])
    });
    let collector = SnapshotCollector::with_source(source, LONG);

    collector.collect_now().unwrap();
    let stamped = collector.last_cpu_update();

    let second = collector.collect_now().unwrap();
    assert_eq!(second[0].cpu_percent, 10.0);
    assert_eq!(collector.last_cpu_update(), stamped);
}

#[test]
fn pass_after_interval_resamples() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let source = fn_source(move |sample_cpu| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let cpu = sample_cpu.then_some(if n == 0 { 5.0 } else { 25.0 });
        Ok(vec![Ok(raw(100, 500, cpu))])
    });
    let collector = SnapshotCollector::with_source(source, Duration::from_millis(20));

    collector.collect_now().unwrap();
    let first_update = collector.last_cpu_update().unwrap();

    thread::sleep(Duration::from_millis(40));
    let second = collector.collect_now().unwrap();
    assert_eq!(second[0].cpu_percent, 25.0);
    assert!(collector.last_cpu_update().unwrap() > first_update);
}

#[test]
fn vanished_and_denied_processes_are_left_out() {
    let source = fn_source(|_| {
        Ok(vec![
            Ok(raw(1, 0, Some(1.0))),
            Err(ReadError::Vanished(2)),
            Err(ReadError::AccessDenied(3)),
            Err(ReadError::Zombie(5)),
            Ok(raw(4, 0, Some(2.0))),
        ])
    });
    let collector = SnapshotCollector::with_source(source, LONG);
    let snapshot = collector.collect_now().unwrap();
    let pids: Vec<u32> = snapshot.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1, 4]);
}

#[test]
fn cached_cpu_follows_pid_through_throttled_passes() {
    // pid 100 is sampled at 10%, then keeps that value until the next
    // resample. A process that shows up between samples reads 0.
    let pass = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pass);
    let source = fn_source(move |sample_cpu| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let cpu = sample_cpu.then_some(10.0);
        let mut reads = vec![Ok(raw(100, 500, cpu))];
        if n >= 1 {
            reads.push(Ok(raw(200, 900, cpu)));
        }
        Ok(reads)
    });
    let collector = SnapshotCollector::with_source(source, LONG);

    collector.collect_now().unwrap();
    assert_eq!(collector.cached_cpu(100), Some(10.0));

    let second = collector.collect_now().unwrap();
    let by_pid = |pid: u32| second.iter().find(|p| p.pid == pid).map(|p| p.cpu_percent);
    assert_eq!(by_pid(100), Some(10.0));
    assert_eq!(by_pid(200), Some(0.0));
    assert_eq!(collector.cached_cpu(200), None);
}

#[test]
fn recycled_pid_does_not_inherit_cpu() {
    let pass = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pass);
    let source = fn_source(move |sample_cpu| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let start_time = if n == 0 { 500 } else { 800 };
        Ok(vec![Ok(raw(100, start_time, sample_cpu.then_some(70.0)))])
    });
    let collector = SnapshotCollector::with_source(source, LONG);

    collector.collect_now().unwrap();
    let second = collector.collect_now().unwrap();
    assert_eq!(second[0].cpu_percent, 0.0);
}

#[test]
fn background_failure_is_reported_once() {
    let source = fn_source(|_| Err(CollectError::Enumeration("boom".to_string())));
    let collector = SnapshotCollector::with_source(source, LONG);

    let snapshot = collector.request_snapshot();
    assert!(snapshot.is_empty());
    assert!(collector.wait_idle(WAIT));

    let err = collector.take_error().unwrap();
    assert!(err.to_string().contains("boom"));
    assert!(collector.take_error().is_none());
    assert_eq!(collector.completed_passes(), 0);
}
