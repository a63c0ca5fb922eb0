//! WAL writer
//!
//! Encodes each record of a batch into the active segment and resolves every
//! request's promise with the batch outcome.

use std::sync::Arc;

use crate::error::Result;

use super::record::WriteRequest;
use super::segment::SegmentAppender;

/// Writes batches of records to segment storage.
///
/// A batch is an all-or-nothing unit of acknowledgment: records are appended
/// in order and synced once, and only then is every promise resolved with
/// success. If any append fails partway, every request in the batch resolves
/// with that same error, never a partial mix of acknowledgments.
pub struct LogsWriter {
    segment: Box<dyn SegmentAppender>,
}

impl LogsWriter {
    pub fn new(segment: Box<dyn SegmentAppender>) -> Self {
        Self { segment }
    }

    /// Persist a batch and resolve every attached promise exactly once.
    ///
    /// A durability failure is reported through the promises and logged; it
    /// must not take down the flush loop, which keeps serving later batches.
    pub fn write_batch(&mut self, batch: &[WriteRequest]) {
        match self.append_batch(batch) {
            Ok(()) => {
                for request in batch {
                    request.complete(Ok(()));
                }
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    records = batch.len(),
                    "failed to flush WAL batch"
                );
                let shared = Arc::new(err);
                for request in batch {
                    request.complete(Err(Arc::clone(&shared)));
                }
            }
        }
    }

    fn append_batch(&mut self, batch: &[WriteRequest]) -> Result<()> {
        for request in batch {
            let encoded = request.record().encode_to_vec()?;
            self.segment.append(&encoded)?;
        }
        // One sync per batch; no promise resolves before it returns.
        self.segment.sync()
    }
}
