//! WAL coordinator
//!
//! Accumulates incoming writes into batches, decides when to flush (size or
//! time threshold), hands batches to the segment writer, and returns futures
//! to callers.

use std::time::Duration;

use crossbeam::channel::{bounded, tick, Receiver, Sender};
use crossbeam::select;
use parking_lot::Mutex;

use crate::compute::CommandId;
use crate::error::{Result, StrataError};

use super::reader::LogsReader;
use super::record::{FutureWriteResult, LogRecord, Lsn, WriteRequest};
use super::writer::LogsWriter;

/// LSN assignment shares the batch's serialization point: whichever write
/// acquires the lock first gets the lower LSN and the earlier batch slot.
struct PendingBatch {
    next_lsn: Lsn,
    requests: Vec<WriteRequest>,
}

/// The write-ahead log.
///
/// Submission is non-blocking: `set`/`del` append to the pending batch and
/// return a future immediately. A dedicated flush loop ([`Wal::run`]) drains
/// size-triggered batches from a capacity-1 handoff channel and flushes
/// whatever is pending on every timer tick, bounding worst-case write latency
/// even under low load.
pub struct Wal {
    writer: Mutex<LogsWriter>,
    reader: LogsReader,
    flush_timeout: Duration,
    max_batch_size: usize,
    pending: Mutex<PendingBatch>,
    batch_tx: Sender<Vec<WriteRequest>>,
    batch_rx: Receiver<Vec<WriteRequest>>,
}

impl Wal {
    pub fn new(
        writer: LogsWriter,
        reader: LogsReader,
        flush_timeout: Duration,
        max_batch_size: usize,
    ) -> Result<Self> {
        if max_batch_size == 0 {
            return Err(StrataError::InvalidArgument(
                "flush batch size must be non-zero".to_string(),
            ));
        }
        if flush_timeout.is_zero() {
            return Err(StrataError::InvalidArgument(
                "flush timeout must be non-zero".to_string(),
            ));
        }

        // Capacity 1: a full slot back-pressures size-triggered flushes
        // until the loop drains the previous handoff.
        let (batch_tx, batch_rx) = bounded(1);

        Ok(Self {
            writer: Mutex::new(writer),
            reader,
            flush_timeout,
            max_batch_size,
            pending: Mutex::new(PendingBatch {
                next_lsn: 1,
                requests: Vec::new(),
            }),
            batch_tx,
            batch_rx,
        })
    }

    /// Submit a durable SET; returns immediately with the outcome future.
    pub fn set(&self, tx_id: u64, key: &str, value: &str) -> FutureWriteResult {
        self.push(
            tx_id,
            CommandId::Set,
            vec![key.to_string(), value.to_string()],
        )
    }

    /// Submit a durable DEL; returns immediately with the outcome future.
    pub fn del(&self, tx_id: u64, key: &str) -> FutureWriteResult {
        self.push(tx_id, CommandId::Del, vec![key.to_string()])
    }

    fn push(&self, tx_id: u64, command_id: CommandId, arguments: Vec<String>) -> FutureWriteResult {
        let (future, full_batch) = {
            let mut pending = self.pending.lock();

            let lsn = pending.next_lsn;
            pending.next_lsn += 1;

            let request = WriteRequest::new(LogRecord::new(lsn, tx_id, command_id, arguments));
            let future = request.future_response();
            pending.requests.push(request);

            if pending.requests.len() >= self.max_batch_size {
                (future, Some(std::mem::take(&mut pending.requests)))
            } else {
                (future, None)
            }
        };

        if let Some(batch) = full_batch {
            // Blocks while the loop is still draining a previous handoff;
            // that is the admission-control point, not an error. The send is
            // outside the batch lock so a concurrent timer flush can proceed.
            // Recovery re-sorts by LSN, so batch order at the channel is not
            // load-bearing. The receiver lives in `self`; send cannot fail.
            let _ = self.batch_tx.send(batch);
        }

        future
    }

    /// Run the background flush loop until `shutdown` fires (or its sender is
    /// dropped). Intended for a dedicated thread; returns only on shutdown,
    /// after one final flush so no accepted request is silently dropped.
    pub fn run(&self, shutdown: Receiver<()>) {
        let ticker = tick(self.flush_timeout);
        tracing::debug!(
            flush_timeout = ?self.flush_timeout,
            max_batch_size = self.max_batch_size,
            "WAL flush loop started"
        );

        loop {
            select! {
                recv(shutdown) -> _ => {
                    // Drain any batch already handed off, flush what is still
                    // pending, then drain once more in case a size-triggered
                    // submitter was blocked on the channel while we flushed.
                    while let Ok(batch) = self.batch_rx.try_recv() {
                        self.write_batch(&batch);
                    }
                    self.flush_pending();
                    while let Ok(batch) = self.batch_rx.try_recv() {
                        self.write_batch(&batch);
                    }
                    tracing::debug!("WAL flush loop stopped");
                    return;
                }
                recv(self.batch_rx) -> batch => {
                    if let Ok(batch) = batch {
                        self.write_batch(&batch);
                    }
                }
                recv(ticker) -> _ => {
                    self.flush_pending();
                }
            }
        }
    }

    /// Swap out whatever is pending and write it, if anything
    fn flush_pending(&self) {
        let batch = {
            let mut pending = self.pending.lock();
            std::mem::take(&mut pending.requests)
        };
        if !batch.is_empty() {
            self.write_batch(&batch);
        }
    }

    fn write_batch(&self, batch: &[WriteRequest]) {
        self.writer.lock().write_batch(batch);
    }

    /// Produce the globally ordered record history for engine rehydration.
    ///
    /// Must complete before the coordinator accepts writes: the LSN counter
    /// resumes above the maximum recovered LSN so fresh assignments never
    /// collide with persisted ones.
    pub fn recover(&self) -> Result<Vec<LogRecord>> {
        let records = self.reader.read()?;

        if let Some(last) = records.last() {
            let mut pending = self.pending.lock();
            pending.next_lsn = last.lsn + 1;
        }

        Ok(records)
    }
}
