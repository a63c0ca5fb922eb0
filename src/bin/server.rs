//! Strata Server Binary
//!
//! Wires the WAL, engine, storage, and network layers together and serves.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use strata::network::Server;
use strata::wal::{FileSegment, FileSegmentsDirectory, LogsReader, LogsWriter, Wal};
use strata::{Config, Database, InMemoryEngine, Storage};
use strata::compute::Compute;

/// Strata Server
#[derive(Parser, Debug)]
#[command(name = "strata-server")]
#[command(about = "In-memory key-value store with a write-ahead log")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./strata_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(long, default_value = "1024")]
    max_connections: usize,

    /// Storage engine type
    #[arg(long, default_value = "in_memory")]
    engine_type: String,

    /// Number of engine partitions
    #[arg(short, long, default_value = "1")]
    partitions: usize,

    /// Number of buffered writes that triggers an immediate WAL flush
    #[arg(long, default_value = "100")]
    flush_batch_size: usize,

    /// WAL flush timeout in milliseconds
    #[arg(long, default_value = "10")]
    flush_timeout_ms: u64,

    /// Max WAL segment size (e.g. "10MB")
    #[arg(long, default_value = "10MB")]
    max_segment_size: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,strata=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Strata Server v{}", strata::VERSION);
    tracing::info!("data directory: {}", args.data_dir);
    tracing::info!("listen address: {}", args.listen);

    if let Err(e) = run(args) {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> strata::Result<()> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .engine_type(&args.engine_type)
        .partitions(args.partitions)
        .flush_batch_size(args.flush_batch_size)
        .flush_batch_timeout(Duration::from_millis(args.flush_timeout_ms))
        .max_segment_size(&args.max_segment_size)
        .build()?;

    // WAL: file-backed segment storage behind the capability traits
    let wal_dir = config.wal_dir();
    let segment = FileSegment::open(&wal_dir, config.max_segment_size)?;
    let writer = LogsWriter::new(Box::new(segment));
    let reader = LogsReader::new(Box::new(FileSegmentsDirectory::new(&wal_dir)));
    let wal = Arc::new(Wal::new(
        writer,
        reader,
        config.flush_batch_timeout,
        config.flush_batch_size,
    )?);

    // Engine + storage; recovery replays the log before anything is served
    let engine = InMemoryEngine::with_partitions(config.partitions)?;
    let storage = Storage::new(engine, Some(Arc::clone(&wal)))?;
    let database = Arc::new(Database::new(Box::new(Compute::new()), storage));

    tracing::info!("storage initialized, starting flush loop");

    // Background flush loop; the shutdown sender stops it after one final flush
    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded::<()>(1);
    let flush_loop = thread::spawn({
        let wal = Arc::clone(&wal);
        move || wal.run(shutdown_rx)
    });

    let server = Server::bind(config, database)?;
    let result = server.run();

    // Quiesce: final flush resolves any in-flight futures before exit
    let _ = shutdown_tx.send(());
    let _ = flush_loop.join();

    tracing::info!("server stopped");
    result
}
