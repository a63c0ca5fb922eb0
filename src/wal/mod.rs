//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through batched, append-only logging.
//!
//! ## Responsibilities
//! - Assign a Log Sequence Number (LSN) to every accepted write
//! - Buffer write requests and flush them in batches (size or time triggered)
//! - Encode records into size-bounded segment files, rotating as needed
//! - Reconstruct the globally ordered write history on startup
//!
//! ## Record Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Record 1                                     │
//! │ ┌──────────┬──────────┬───────────────────┐  │
//! │ │ Len (4)  │ CRC (4)  │ Payload (bincode) │  │
//! │ └──────────┴──────────┴───────────────────┘  │
//! ├──────────────────────────────────────────────┤
//! │ Record 2                                     │
//! │ ┌──────────┬──────────┬───────────────────┐  │
//! │ │ Len (4)  │ CRC (4)  │ Payload (bincode) │  │
//! │ └──────────┴──────────┴───────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Records are self-delimiting: decoding consumes exactly the header plus the
//! announced payload length, so a segment is read back by decoding until its
//! buffer is exhausted. Decoded record order across segments is NOT the file
//! enumeration order; recovery re-sorts by LSN.

mod coordinator;
mod reader;
mod record;
mod segment;
mod writer;

pub use coordinator::Wal;
pub use reader::LogsReader;
pub use record::{
    FutureWriteResult, LogRecord, Lsn, WriteRequest, WriteResult, RECORD_HEADER_SIZE,
};
pub use segment::{
    segment_filename, FileSegment, FileSegmentsDirectory, SegmentAppender, SegmentsDirectory,
};
pub use writer::LogsWriter;
