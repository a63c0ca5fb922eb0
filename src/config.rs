//! Configuration for Strata
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, StrataError};

/// Default number of write requests that trigger a size-based WAL flush
pub const DEFAULT_FLUSH_BATCH_SIZE: usize = 100;

/// Default upper bound on how long a pending write waits for a flush
pub const DEFAULT_FLUSH_BATCH_TIMEOUT: Duration = Duration::from_millis(10);

/// Default segment size bound (10 MB)
pub const DEFAULT_MAX_SEGMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Supported storage engine implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    /// Partitioned hash tables held entirely in memory
    InMemory,
}

/// Main configuration for a Strata instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files.
    /// Internal structure:
    ///   {data_dir}/
    ///     └── wal/             (numbered WAL segment files)
    pub data_dir: PathBuf,

    /// Storage engine implementation
    pub engine_type: EngineType,

    /// Number of independent engine partitions (key-space shards)
    pub partitions: usize,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    /// Number of buffered write requests that triggers an immediate flush
    pub flush_batch_size: usize,

    /// Flush whatever is pending after this long, even under low load
    pub flush_batch_timeout: Duration,

    /// Size bound after which the active segment is sealed (in bytes)
    pub max_segment_size: u64,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./strata_data"),
            engine_type: EngineType::InMemory,
            partitions: 1,
            flush_batch_size: DEFAULT_FLUSH_BATCH_SIZE,
            flush_batch_timeout: DEFAULT_FLUSH_BATCH_TIMEOUT,
            max_segment_size: DEFAULT_MAX_SEGMENT_SIZE,
            listen_addr: "127.0.0.1:6379".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory holding the WAL segment files (derived from `data_dir`)
    pub fn wal_dir(&self) -> PathBuf {
        self.data_dir.join("wal")
    }
}

/// Parse a human-readable size string ("512", "4KB", "10MB", "1GB") into bytes.
///
/// Suffixes are case-insensitive; a bare number is taken as bytes.
pub fn parse_size(input: &str) -> Result<u64> {
    let raw = input.trim().to_ascii_uppercase();
    let (digits, multiplier) = if let Some(prefix) = raw.strip_suffix("GB") {
        (prefix, 1024 * 1024 * 1024)
    } else if let Some(prefix) = raw.strip_suffix("MB") {
        (prefix, 1024 * 1024)
    } else if let Some(prefix) = raw.strip_suffix("KB") {
        (prefix, 1024)
    } else if let Some(prefix) = raw.strip_suffix('B') {
        (prefix, 1)
    } else {
        (raw.as_str(), 1)
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| StrataError::Config(format!("invalid size value: {input}")))?;

    value
        .checked_mul(multiplier)
        .ok_or_else(|| StrataError::Config(format!("size value overflows: {input}")))
}

/// Builder for Config
///
/// Raw string inputs (segment size, engine type) are validated in `build`,
/// so no partially valid configuration ever escapes.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
    max_segment_size: Option<String>,
    engine_type: Option<String>,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the engine type by name; only "in_memory" is supported
    pub fn engine_type(mut self, name: impl Into<String>) -> Self {
        self.engine_type = Some(name.into());
        self
    }

    /// Set the number of engine partitions
    pub fn partitions(mut self, count: usize) -> Self {
        self.config.partitions = count;
        self
    }

    /// Set the flush batch size (number of buffered write requests)
    pub fn flush_batch_size(mut self, count: usize) -> Self {
        self.config.flush_batch_size = count;
        self
    }

    /// Set the flush batch timeout
    pub fn flush_batch_timeout(mut self, timeout: Duration) -> Self {
        self.config.flush_batch_timeout = timeout;
        self
    }

    /// Set the max segment size from a human-readable string (e.g. "10MB")
    pub fn max_segment_size(mut self, size: impl Into<String>) -> Self {
        self.max_segment_size = Some(size.into());
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Validate and produce the final configuration
    pub fn build(self) -> Result<Config> {
        let mut config = self.config;

        if let Some(raw) = self.engine_type {
            config.engine_type = match raw.as_str() {
                "in_memory" => EngineType::InMemory,
                other => {
                    return Err(StrataError::Config(format!(
                        "unsupported engine type: {other}"
                    )))
                }
            };
        }

        if let Some(raw) = self.max_segment_size {
            config.max_segment_size = parse_size(&raw)?;
        }

        if config.flush_batch_size == 0 {
            return Err(StrataError::Config(
                "flush batch size must be non-zero".to_string(),
            ));
        }
        if config.partitions == 0 {
            return Err(StrataError::Config(
                "partitions number must be non-zero".to_string(),
            ));
        }
        if config.max_segment_size == 0 {
            return Err(StrataError::Config(
                "max segment size must be non-zero".to_string(),
            ));
        }

        Ok(config)
    }
}
