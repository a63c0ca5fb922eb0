//! Database Module
//!
//! Dispatches parsed queries to the storage layer and formats responses.
//!
//! Query errors are returned inline as part of the response text; they are
//! never fatal to the process.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::compute::{CommandId, ComputeLayer, Query};
use crate::storage::Storage;

/// Response prefix for successful queries
const OK: &str = "[ok]";

/// The query-facing database: parse, dispatch, format.
///
/// Each handled query gets a transaction id from an atomic counter; the id
/// attributes the resulting log records to their originating request and
/// plays no role in ordering.
pub struct Database {
    compute: Box<dyn ComputeLayer>,
    storage: Storage,
    next_tx_id: AtomicU64,
}

impl Database {
    pub fn new(compute: Box<dyn ComputeLayer>, storage: Storage) -> Self {
        Self {
            compute,
            storage,
            next_tx_id: AtomicU64::new(1),
        }
    }

    /// Handle one textual query and produce the response text
    pub fn handle_query(&self, query_str: &str) -> String {
        tracing::debug!(query = query_str, "handling query");

        let query = match self.compute.parse(query_str) {
            Ok(query) => query,
            Err(err) => return format!("[error] {err}"),
        };

        let tx_id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);

        match query.command_id() {
            CommandId::Set => self.handle_set(tx_id, &query),
            CommandId::Get => self.handle_get(tx_id, &query),
            CommandId::Del => self.handle_del(tx_id, &query),
            CommandId::Unknown => {
                // The parser rejects unknown commands; reaching this arm
                // means the compute layer misbehaved.
                tracing::error!(query = query_str, "compute layer produced an unknown command");
                "[error] internal error".to_string()
            }
        }
    }

    fn handle_set(&self, tx_id: u64, query: &Query) -> String {
        let args = query.arguments();
        match self.storage.set(tx_id, &args[0], &args[1]) {
            Ok(()) => OK.to_string(),
            Err(err) => format!("[error] {err}"),
        }
    }

    fn handle_get(&self, tx_id: u64, query: &Query) -> String {
        let args = query.arguments();
        match self.storage.get(tx_id, &args[0]) {
            Ok(value) => format!("{OK} {value}"),
            Err(err) => format!("[error] {err}"),
        }
    }

    fn handle_del(&self, tx_id: u64, query: &Query) -> String {
        let args = query.arguments();
        match self.storage.del(tx_id, &args[0]) {
            Ok(()) => OK.to_string(),
            Err(err) => format!("[error] {err}"),
        }
    }
}
