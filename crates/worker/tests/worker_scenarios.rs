//! End-to-end worker scenarios: batched commits, freshness flushes,
//! eviction, persistence failures, and hysteresis re-arming.

use std::sync::Arc;
use std::time::Duration;

use vsa_core::Key;
use vsa_persist::MockPersister;
use vsa_store::Store;
use vsa_worker::{Worker, WorkerConfig};

#[test]
fn worker_batched_commit_scenario() {
    // three entries, two crossing the threshold, one not.
    let store = Arc::new(Store::new(100));
    let a = store.get_or_create("a");
    let b = store.get_or_create("b");
    let c = store.get_or_create("c");
    a.accumulator.update(3);
    b.accumulator.update(5);
    c.accumulator.update(2);

    let persister = Arc::new(MockPersister::new());
    let worker = Worker::new(
        Arc::clone(&store),
        persister,
        WorkerConfig::default().with_commit_threshold(3),
    );

    // Drive exactly one commit-scan tick via the terminal drain path's
    // sibling: start/stop is the only externally observable way to run a
    // tick deterministically without racing a background thread, so we
    // start the worker, give it one interval to fire, then stop it.
    worker.start();
    std::thread::sleep(Duration::from_millis(1200));
    worker.stop().unwrap();

    assert_eq!(a.accumulator.state(), (103, 0));
    assert_eq!(b.accumulator.state(), (105, 0));
    // c never crossed the threshold, but the terminal drain on stop()
    // flushes every non-zero vector regardless of threshold.
    assert_eq!(c.accumulator.state(), (102, 0));
}

#[test]
fn max_age_freshness_flush_scenario() {
    // a stale entry below the commit threshold still gets flushed once it
    // ages past commit_max_age.
    let store = Arc::new(Store::new(0));
    let entry = store.get_or_create("k");
    entry.accumulator.update(1);
    entry.set_last_accessed_for_test(0); // simulate "touched a long time ago"

    let persister = Arc::new(MockPersister::new());
    let worker = Worker::new(
        Arc::clone(&store),
        persister,
        WorkerConfig::default()
            .with_commit_threshold(1000)
            .with_commit_max_age(Duration::from_millis(1)),
    );

    worker.start();
    std::thread::sleep(Duration::from_millis(1500));
    worker.stop().unwrap();

    assert_eq!(entry.accumulator.state(), (1, 0));
}

#[test]
fn eviction_with_final_commit_scenario() {
    // an idle entry gets a final commit, then is evicted from the store.
    let store = Arc::new(Store::new(100));
    let entry = store.get_or_create("k");
    entry.accumulator.update(4);
    entry.set_last_accessed_for_test(0);

    let persister = Arc::new(MockPersister::new());
    let worker = Worker::new(
        Arc::clone(&store),
        persister,
        WorkerConfig::default()
            .with_commit_threshold(1_000_000)
            .with_eviction_age(Duration::from_millis(1))
            .with_eviction_interval(Duration::from_millis(50)),
    );

    worker.start();
    std::thread::sleep(Duration::from_millis(500));
    worker.stop().unwrap();

    assert!(store.get(&Key::from("k")).is_none());

    let fresh = store.get_or_create("k");
    assert_eq!(fresh.accumulator.state(), (100, 0));
}

#[test]
fn persistence_failure_preserves_in_memory_state() {
    let store = Arc::new(Store::new(0));
    let entry = store.get_or_create("k");
    entry.accumulator.update(500);

    let persister = Arc::new(MockPersister::new());
    persister.fail_next(100); // keep failing for the life of this test

    let worker = Worker::new(
        Arc::clone(&store),
        Arc::clone(&persister) as Arc<dyn vsa_persist::Persister>,
        WorkerConfig::default().with_commit_threshold(10),
    );

    worker.start();
    std::thread::sleep(Duration::from_millis(300));

    // Vector is preserved (commit never applied) since every batch failed.
    assert_eq!(entry.accumulator.state(), (0, 500));

    // stop() surfaces the terminal-drain failure rather than silently
    // swallowing it.
    assert!(worker.stop().is_err());
    assert_eq!(entry.accumulator.state(), (0, 500));
}

#[test]
fn rearm_after_dropping_below_low_watermark() {
    let store = Arc::new(Store::new(0));
    let entry = store.get_or_create("k");
    entry.accumulator.update(10);

    let persister = Arc::new(MockPersister::new());
    let worker = Worker::new(
        Arc::clone(&store),
        persister,
        WorkerConfig::default()
            .with_commit_threshold(10)
            .with_low_commit_threshold(2)
            .with_commit_interval(Duration::from_millis(50)),
    );

    worker.start();
    std::thread::sleep(Duration::from_millis(200));
    // Threshold-triggered commit folds 10 into scalar, disarming the entry.
    assert_eq!(entry.accumulator.state(), (10, 0));
    assert!(!entry.is_armed());

    // Vector stays within [-2, 2] -> should re-arm on a later tick.
    entry.accumulator.update(1);
    std::thread::sleep(Duration::from_millis(200));
    assert!(entry.is_armed());

    worker.stop().unwrap();
}
