//! Tests for crash recovery
//!
//! These tests verify:
//! - LSN continuation across restarts (no reuse of recovered LSNs)
//! - Exact reconstruction of durable state after a simulated crash
//! - Pending (un-flushed) writes never reporting false success

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, Sender};
use strata::error::StrataError;
use strata::wal::{FileSegment, FileSegmentsDirectory, LogsReader, LogsWriter, Wal};
use strata::{InMemoryEngine, Storage};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const WAIT: Duration = Duration::from_secs(5);

fn open_wal(dir: &Path, flush_timeout: Duration, max_batch_size: usize) -> Arc<Wal> {
    let segment = FileSegment::open(dir, 1 << 20).unwrap();
    let writer = LogsWriter::new(Box::new(segment));
    let reader = LogsReader::new(Box::new(FileSegmentsDirectory::new(dir)));
    Arc::new(Wal::new(writer, reader, flush_timeout, max_batch_size).unwrap())
}

fn start_flush_loop(wal: &Arc<Wal>) -> (Sender<()>, thread::JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = bounded(1);
    let handle = thread::spawn({
        let wal = Arc::clone(wal);
        move || wal.run(shutdown_rx)
    });
    (shutdown_tx, handle)
}

// =============================================================================
// Restart Tests
// =============================================================================

#[test]
fn restart_resumes_lsns_above_the_recovered_maximum() {
    let dir = TempDir::new().unwrap();

    // First life: three durable writes.
    {
        let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
        let (shutdown, handle) = start_flush_loop(&wal);
        for i in 1..=3 {
            let future = wal.set(1, &format!("k{i}"), &format!("v{i}"));
            assert!(future.wait_for(WAIT).expect("never flushed").is_ok());
        }
        let _ = shutdown.send(());
        handle.join().unwrap();
    }

    // Second life: recovery must push the LSN counter past 3.
    let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
    let recovered = wal.recover().unwrap();
    assert_eq!(recovered.len(), 3);
    assert_eq!(recovered.last().unwrap().lsn, 3);

    let (shutdown, handle) = start_flush_loop(&wal);
    let future = wal.set(2, "k4", "v4");
    assert!(future.wait_for(WAIT).expect("never flushed").is_ok());
    let _ = shutdown.send(());
    handle.join().unwrap();

    let all = LogsReader::new(Box::new(FileSegmentsDirectory::new(dir.path())))
        .read()
        .unwrap();
    let lsns: Vec<u64> = all.iter().map(|r| r.lsn).collect();
    assert_eq!(lsns, vec![1, 2, 3, 4], "recovered LSNs must never be reused");
}

#[test]
fn recovery_is_idempotent() {
    let dir = TempDir::new().unwrap();

    {
        let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
        let (shutdown, handle) = start_flush_loop(&wal);
        for i in 0..5 {
            let future = wal.set(1, &format!("k{i}"), "v");
            assert!(future.wait_for(WAIT).expect("never flushed").is_ok());
        }
        let _ = shutdown.send(());
        handle.join().unwrap();
    }

    let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
    let first = wal.recover().unwrap();
    let second = wal.recover().unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Crash Scenario Tests
// =============================================================================

#[test]
fn crash_loses_only_the_unflushed_write() {
    let dir = TempDir::new().unwrap();

    // First life: three durable writes, then a fourth submitted while the
    // flush loop is already gone, so it stays pending forever.
    {
        let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
        let (shutdown, handle) = start_flush_loop(&wal);
        for i in 1..=3 {
            let future = wal.set(1, &format!("k{i}"), &format!("v{i}"));
            assert!(future.wait_for(WAIT).expect("never flushed").is_ok());
        }
        let _ = shutdown.send(());
        handle.join().unwrap();

        let pending = wal.set(1, "k4", "v4");
        // The write was accepted but nothing will flush it; its future must
        // not report success.
        assert!(
            pending.wait_for(Duration::from_millis(100)).is_none(),
            "an un-flushed write must never resolve successfully"
        );
        // Process "crashes" here: the wal is dropped with the write pending.
    }

    // Second life: exactly the three durable keys come back.
    let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
    let engine = InMemoryEngine::with_partitions(4).unwrap();
    let storage = Storage::new(engine, Some(Arc::clone(&wal))).unwrap();

    for i in 1..=3 {
        assert_eq!(
            storage.get(0, &format!("k{i}")).unwrap(),
            format!("v{i}")
        );
    }
    assert!(matches!(
        storage.get(0, "k4"),
        Err(StrataError::KeyNotFound)
    ));
    assert_eq!(storage.engine().len(), 3);
}

#[test]
fn corrupt_segment_fails_startup() {
    let dir = TempDir::new().unwrap();

    {
        let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
        let (shutdown, handle) = start_flush_loop(&wal);
        let future = wal.set(1, "k", "v");
        assert!(future.wait_for(WAIT).expect("never flushed").is_ok());
        let _ = shutdown.send(());
        handle.join().unwrap();
    }

    // Clip the tail of the only segment file to simulate a partial write.
    let segment_path = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.is_file())
        .unwrap();
    let mut bytes = std::fs::read(&segment_path).unwrap();
    bytes.truncate(bytes.len() - 3);
    std::fs::write(&segment_path, bytes).unwrap();

    let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
    let engine = InMemoryEngine::new();
    let result = Storage::new(engine, Some(Arc::clone(&wal)));
    assert!(
        matches!(result, Err(StrataError::WalCorruption(_))),
        "recovery over a corrupt segment must fail startup"
    );
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn replay_applies_sets_and_deletes_in_order() {
    let dir = TempDir::new().unwrap();

    {
        let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
        let (shutdown, handle) = start_flush_loop(&wal);

        let futures = vec![
            wal.set(1, "kept", "v1"),
            wal.set(1, "doomed", "v2"),
            wal.set(1, "kept", "v3"),
            wal.del(1, "doomed"),
        ];
        for future in futures {
            assert!(future.wait_for(WAIT).expect("never flushed").is_ok());
        }
        let _ = shutdown.send(());
        handle.join().unwrap();
    }

    let wal = open_wal(dir.path(), Duration::from_millis(10), 1);
    let engine = InMemoryEngine::with_partitions(2).unwrap();
    let storage = Storage::new(engine, Some(Arc::clone(&wal))).unwrap();

    assert_eq!(storage.get(0, "kept").unwrap(), "v3");
    assert!(matches!(
        storage.get(0, "doomed"),
        Err(StrataError::KeyNotFound)
    ));
}
