//! TCP Server
//!
//! Accepts connections and dispatches each to its own handler thread.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::database::Database;
use crate::error::Result;

use super::Connection;

/// TCP server for Strata
pub struct Server {
    config: Config,
    database: Arc<Database>,
    listener: TcpListener,
    active_connections: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the listen address from the config.
    ///
    /// Binding happens here rather than in `run` so callers (and tests) can
    /// learn the actual local address before serving starts.
    pub fn bind(config: Config, database: Arc<Database>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        Ok(Self {
            config,
            database,
            listener,
            active_connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The address the server actually listens on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails (blocking)
    pub fn run(&self) -> Result<()> {
        tracing::info!(addr = %self.config.listen_addr, "server listening");

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            if self.active_connections.load(Ordering::Acquire) >= self.config.max_connections {
                tracing::warn!(
                    max = self.config.max_connections,
                    "connection limit reached, rejecting client"
                );
                drop(stream);
                continue;
            }

            self.active_connections.fetch_add(1, Ordering::AcqRel);

            let database = Arc::clone(&self.database);
            let active = Arc::clone(&self.active_connections);
            let (read_ms, write_ms) = (self.config.read_timeout_ms, self.config.write_timeout_ms);

            thread::spawn(move || {
                match Connection::new(stream, database) {
                    Ok(mut connection) => {
                        if let Err(e) = connection
                            .set_timeouts(read_ms, write_ms)
                            .and_then(|_| connection.handle())
                        {
                            tracing::warn!(
                                peer = connection.peer_addr(),
                                error = %e,
                                "connection terminated with error"
                            );
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to set up connection"),
                }
                active.fetch_sub(1, Ordering::AcqRel);
            });
        }

        Ok(())
    }
}
