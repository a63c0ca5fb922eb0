//! # Strata
//!
//! An in-memory key-value store with:
//! - A batched, promise-acknowledged write-ahead log (WAL) for durability
//! - Size-bounded log segments with crash-recovery merge
//! - A partitioned in-memory engine bounding lock contention
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Database                                │
//! │            (parse → dispatch → format)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Storage                                 │
//! │          (WAL acknowledgment before mutation)                │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!     ┌─────────────┐               ┌───────────────┐
//!     │     WAL     │               │    Engine     │
//!     │  (batched,  │── recovery ──▶│ (partitioned  │
//!     │  segmented) │    replay     │  hash tables) │
//!     └─────────────┘               └───────────────┘
//! ```
//!
//! A write is accepted into the WAL's pending batch (receiving its LSN),
//! the caller gets a future, and a background flush loop moves full or aged
//! batches into segment files. On restart the segments are decoded, merged
//! in LSN order, and replayed into the engine before any query is served.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod compute;
pub mod concurrency;
pub mod database;
pub mod engine;
pub mod network;
pub mod storage;
pub mod wal;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use database::Database;
pub use engine::InMemoryEngine;
pub use error::{Result, StrataError};
pub use storage::Storage;
pub use wal::Wal;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Strata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
