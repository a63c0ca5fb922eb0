//! Storage Module
//!
//! The database-facing storage layer: every mutation goes through the WAL
//! first and is applied to the in-memory engine only after it is durable.
//!
//! ## Responsibilities
//! - Write ordering: WAL acknowledgment before engine mutation
//! - Startup recovery: replay the ordered log history into the engine
//! - Reads served directly from the engine

use std::sync::Arc;

use crate::compute::CommandId;
use crate::engine::InMemoryEngine;
use crate::error::{Result, StrataError};
use crate::wal::{LogRecord, Wal};

/// Coordinates the WAL and the in-memory engine.
///
/// Runs recovery at construction, before any write is accepted, so a
/// half-reconstructed state is never served and freshly assigned LSNs never
/// collide with recovered ones. A storage without a WAL is volatile but
/// functional (used when durability is configured off and in engine tests).
pub struct Storage {
    engine: InMemoryEngine,
    wal: Option<Arc<Wal>>,
}

impl Storage {
    pub fn new(engine: InMemoryEngine, wal: Option<Arc<Wal>>) -> Result<Self> {
        let storage = Self { engine, wal };
        storage.recover()?;
        Ok(storage)
    }

    /// Replay the recovered history through the same mutation path live
    /// traffic uses, in LSN order, exactly once per record.
    fn recover(&self) -> Result<()> {
        let Some(wal) = &self.wal else {
            return Ok(());
        };

        let records = wal.recover()?;
        let recovered = records.len();

        for record in &records {
            self.apply(record)?;
        }

        if recovered > 0 {
            tracing::info!(records = recovered, "replayed write-ahead log");
        }
        Ok(())
    }

    fn apply(&self, record: &LogRecord) -> Result<()> {
        match (record.command_id, record.arguments.as_slice()) {
            (CommandId::Set, [key, value]) => {
                self.engine.set(key, value);
                Ok(())
            }
            (CommandId::Del, [key]) => {
                self.engine.del(key);
                Ok(())
            }
            _ => Err(StrataError::WalCorruption(format!(
                "unreplayable record at lsn {}: {} with {} argument(s)",
                record.lsn,
                record.command_id.name(),
                record.arguments.len()
            ))),
        }
    }

    /// Durably set a key. Blocks until the write's batch is flushed.
    pub fn set(&self, tx_id: u64, key: &str, value: &str) -> Result<()> {
        if let Some(wal) = &self.wal {
            wal.set(tx_id, key, value)
                .wait()
                .map_err(|e| StrataError::WalWrite(e.to_string()))?;
        }
        self.engine.set(key, value);
        Ok(())
    }

    /// Read a key from the engine
    pub fn get(&self, _tx_id: u64, key: &str) -> Result<String> {
        self.engine.get(key)
    }

    /// Durably delete a key. Blocks until the delete's batch is flushed.
    pub fn del(&self, tx_id: u64, key: &str) -> Result<()> {
        if let Some(wal) = &self.wal {
            wal.del(tx_id, key)
                .wait()
                .map_err(|e| StrataError::WalWrite(e.to_string()))?;
        }
        self.engine.del(key);
        Ok(())
    }

    /// The underlying engine (read-only access for inspection)
    pub fn engine(&self) -> &InMemoryEngine {
        &self.engine
    }
}
