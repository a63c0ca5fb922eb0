//! Concurrency primitives
//!
//! The write path hands callers a [`Future`] so they can await the durable
//! outcome of a request they submitted asynchronously; the WAL resolves the
//! matching [`Promise`] once the batch containing the request hits disk.

mod promise;

pub use promise::{Future, Promise};
