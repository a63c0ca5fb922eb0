//! WAL reader / recovery
//!
//! Rebuilds the globally ordered write history from persisted segments.

use bytes::Buf;

use crate::error::Result;

use super::record::LogRecord;
use super::segment::SegmentsDirectory;

/// Decodes every record from every persisted segment and reconstructs total
/// log order.
///
/// Segment enumeration order is NOT trusted (a directory listing need not
/// match write order); the merge re-sorts the full collection by LSN. Any
/// decode failure aborts recovery: a corrupt segment is a fatal startup
/// condition, never silently skipped.
pub struct LogsReader {
    directory: Box<dyn SegmentsDirectory>,
}

impl LogsReader {
    pub fn new(directory: Box<dyn SegmentsDirectory>) -> Self {
        Self { directory }
    }

    /// The authoritative replay sequence: every persisted record, LSN ascending
    pub fn read(&self) -> Result<Vec<LogRecord>> {
        let mut records = Vec::new();

        self.directory
            .for_each(&mut |bytes| Self::read_segment(&mut records, bytes))?;

        records.sort_by_key(|record| record.lsn);
        Ok(records)
    }

    /// Decode records until the segment buffer is exhausted
    fn read_segment(records: &mut Vec<LogRecord>, data: &[u8]) -> Result<()> {
        let mut buf = data;
        while buf.has_remaining() {
            records.push(LogRecord::decode(&mut buf)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::CommandId;
    use crate::error::StrataError;

    /// In-memory directory with a controllable enumeration order.
    struct FakeDirectory {
        segments: Vec<Vec<u8>>,
    }

    impl SegmentsDirectory for FakeDirectory {
        fn for_each(
            &self,
            visit: &mut dyn FnMut(&[u8]) -> crate::error::Result<()>,
        ) -> crate::error::Result<()> {
            for segment in &self.segments {
                visit(segment)?;
            }
            Ok(())
        }
    }

    fn encoded_segment(lsns: &[u64]) -> Vec<u8> {
        let mut buf = Vec::new();
        for &lsn in lsns {
            LogRecord::new(lsn, 0, CommandId::Set, vec![format!("k{lsn}"), "v".into()])
                .encode(&mut buf)
                .unwrap();
        }
        buf
    }

    #[test]
    fn records_are_merged_in_lsn_order() {
        // Enumeration yields the newer segment first.
        let reader = LogsReader::new(Box::new(FakeDirectory {
            segments: vec![encoded_segment(&[4, 5]), encoded_segment(&[1, 2, 3])],
        }));

        let records = reader.read().unwrap();
        let lsns: Vec<u64> = records.iter().map(|r| r.lsn).collect();
        assert_eq!(lsns, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn enumeration_order_does_not_change_the_result() {
        let a = encoded_segment(&[1, 2]);
        let b = encoded_segment(&[3, 4]);

        let forward = LogsReader::new(Box::new(FakeDirectory {
            segments: vec![a.clone(), b.clone()],
        }))
        .read()
        .unwrap();
        let backward = LogsReader::new(Box::new(FakeDirectory {
            segments: vec![b, a],
        }))
        .read()
        .unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_directory_yields_empty_history() {
        let reader = LogsReader::new(Box::new(FakeDirectory { segments: vec![] }));
        assert!(reader.read().unwrap().is_empty());
    }

    #[test]
    fn corrupt_segment_aborts_recovery() {
        let mut corrupted = encoded_segment(&[1]);
        corrupted.truncate(corrupted.len() - 2);

        let reader = LogsReader::new(Box::new(FakeDirectory {
            segments: vec![encoded_segment(&[2]), corrupted],
        }));

        assert!(matches!(
            reader.read(),
            Err(StrataError::WalCorruption(_))
        ));
    }
}
