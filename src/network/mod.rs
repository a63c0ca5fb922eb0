//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per accepted connection
//! - Queries routed through the Database
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │     UTF-8 query/response    │
//! └──────────┴─────────────────────────────┘
//! ```
//! Requests and responses use the same frame: a 4-byte big-endian length
//! prefix followed by UTF-8 text.

mod client;
mod connection;
mod frame;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use server::Server;
