//! WAL record definitions
//!
//! The durable record shape, its on-disk encoding, and the in-flight wrapper
//! carrying the promise a caller awaits.

use std::sync::Arc;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::compute::CommandId;
use crate::concurrency::{Future, Promise};
use crate::error::{Result, StrataError};

/// Log Sequence Number - monotonically increasing, never reused
pub type Lsn = u64;

/// Outcome of a durability operation, shared across a whole batch on failure
pub type WriteResult = std::result::Result<(), Arc<StrataError>>;

/// Read handle a caller blocks on to learn its write's durable outcome
pub type FutureWriteResult = Future<WriteResult>;

/// Fixed header preceding every encoded record payload:
/// payload length (4) + CRC32 of the payload (4)
pub const RECORD_HEADER_SIZE: usize = 8;

/// A single durable record in the log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Global write order; assigned when the write is accepted into a batch
    pub lsn: Lsn,

    /// Attribution of the originating request; not used for ordering
    pub tx_id: u64,

    /// The mutation this record replays
    pub command_id: CommandId,

    /// Command arguments in positional order
    pub arguments: Vec<String>,
}

impl LogRecord {
    pub fn new(lsn: Lsn, tx_id: u64, command_id: CommandId, arguments: Vec<String>) -> Self {
        Self {
            lsn,
            tx_id,
            command_id,
            arguments,
        }
    }

    /// Append the self-delimiting encoding of this record to `buf`
    pub fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        let payload =
            bincode::serialize(self).map_err(|e| StrataError::Serialization(e.to_string()))?;

        buf.put_u32_le(payload.len() as u32);
        buf.put_u32_le(crc32fast::hash(&payload));
        buf.put_slice(&payload);
        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE + 64);
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode one record from the front of `buf`, consuming exactly the bytes
    /// it occupies. Truncated input or a checksum mismatch is a corruption
    /// error, never a silent skip.
    pub fn decode(buf: &mut impl Buf) -> Result<LogRecord> {
        if buf.remaining() < RECORD_HEADER_SIZE {
            return Err(StrataError::WalCorruption(format!(
                "truncated record header: {} byte(s) remaining",
                buf.remaining()
            )));
        }

        let payload_len = buf.get_u32_le() as usize;
        let checksum = buf.get_u32_le();

        if buf.remaining() < payload_len {
            return Err(StrataError::WalCorruption(format!(
                "truncated record payload: expected {} byte(s), got {}",
                payload_len,
                buf.remaining()
            )));
        }

        let payload = buf.copy_to_bytes(payload_len);
        if crc32fast::hash(&payload) != checksum {
            return Err(StrataError::WalCorruption(
                "record checksum mismatch".to_string(),
            ));
        }

        bincode::deserialize(&payload)
            .map_err(|e| StrataError::WalCorruption(format!("undecodable record: {e}")))
    }
}

/// A [`LogRecord`] in flight through the WAL, plus the promise resolved once
/// the record is durably appended (or the append unrecoverably fails).
///
/// Owned exclusively by the WAL coordinator until handed to the segment
/// writer; only the future side is ever exposed to the caller.
pub struct WriteRequest {
    record: LogRecord,
    promise: Promise<WriteResult>,
}

impl WriteRequest {
    pub fn new(record: LogRecord) -> Self {
        Self {
            record,
            promise: Promise::new(),
        }
    }

    pub fn record(&self) -> &LogRecord {
        &self.record
    }

    /// The handle the submitting caller blocks on
    pub fn future_response(&self) -> FutureWriteResult {
        self.promise.future()
    }

    /// Resolve the attached promise; resolves at most once
    pub fn complete(&self, result: WriteResult) {
        self.promise.set(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(lsn: Lsn) -> LogRecord {
        LogRecord::new(
            lsn,
            9,
            CommandId::Set,
            vec!["key".to_string(), "value".to_string()],
        )
    }

    #[test]
    fn encode_decode_preserves_record() {
        let record = sample_record(17);
        let encoded = record.encode_to_vec().unwrap();

        let mut buf = encoded.as_slice();
        let decoded = LogRecord::decode(&mut buf).unwrap();

        assert_eq!(decoded, record);
        assert!(!buf.has_remaining(), "decode must consume the exact length");
    }

    #[test]
    fn decode_consumes_records_sequentially() {
        let mut encoded = Vec::new();
        for lsn in 1..=3 {
            sample_record(lsn).encode(&mut encoded).unwrap();
        }

        let mut buf = encoded.as_slice();
        for lsn in 1..=3 {
            assert_eq!(LogRecord::decode(&mut buf).unwrap().lsn, lsn);
        }
        assert!(!buf.has_remaining());
    }

    #[test]
    fn truncated_input_is_a_corruption_error() {
        let encoded = sample_record(1).encode_to_vec().unwrap();

        // Chop in the middle of the payload.
        let mut buf = &encoded[..encoded.len() - 3];
        assert!(matches!(
            LogRecord::decode(&mut buf),
            Err(StrataError::WalCorruption(_))
        ));

        // Chop in the middle of the header.
        let mut buf = &encoded[..RECORD_HEADER_SIZE - 2];
        assert!(matches!(
            LogRecord::decode(&mut buf),
            Err(StrataError::WalCorruption(_))
        ));
    }

    #[test]
    fn flipped_payload_byte_fails_the_checksum() {
        let mut encoded = sample_record(1).encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let mut buf = encoded.as_slice();
        assert!(matches!(
            LogRecord::decode(&mut buf),
            Err(StrataError::WalCorruption(_))
        ));
    }

    #[test]
    fn write_request_resolves_once() {
        let request = WriteRequest::new(sample_record(1));
        let future = request.future_response();

        request.complete(Ok(()));
        request.complete(Err(Arc::new(StrataError::WalWrite("late".to_string()))));

        assert!(future.wait().is_ok(), "first resolution must win");
    }
}
