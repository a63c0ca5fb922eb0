//! Command identifiers
//!
//! Static mapping between command names, numeric identifiers, and the exact
//! argument count each command requires.

use serde::{Deserialize, Serialize};

/// Command identifier, persisted inside WAL records.
///
/// Unknown names map to `Unknown` rather than an error; callers decide how to
/// treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommandId {
    Unknown = 0,
    Set = 1,
    Get = 2,
    Del = 3,
}

impl CommandId {
    /// Map a command name to its identifier
    pub fn from_name(name: &str) -> CommandId {
        match name {
            "SET" => CommandId::Set,
            "GET" => CommandId::Get,
            "DEL" => CommandId::Del,
            _ => CommandId::Unknown,
        }
    }

    /// The canonical command name
    pub fn name(&self) -> &'static str {
        match self {
            CommandId::Unknown => "UNKNOWN",
            CommandId::Set => "SET",
            CommandId::Get => "GET",
            CommandId::Del => "DEL",
        }
    }

    /// Exact number of arguments the command requires
    pub fn arguments_number(&self) -> usize {
        match self {
            CommandId::Set => 2,
            CommandId::Get | CommandId::Del => 1,
            CommandId::Unknown => 0,
        }
    }
}
