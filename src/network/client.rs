//! TCP client
//!
//! Minimal blocking client speaking the framed text protocol; used by the
//! CLI binary and integration tests.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use crate::error::{Result, StrataError};

use super::frame::{read_frame, write_frame};

/// A connected client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| StrataError::Network(format!("failed to connect to {addr}: {e}")))?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one query and block for its response
    pub fn query(&mut self, query: &str) -> Result<String> {
        write_frame(&mut self.writer, query)?;
        read_frame(&mut self.reader)
    }
}
