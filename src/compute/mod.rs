//! Compute Module
//!
//! Turns textual queries into typed commands before they are allowed to reach
//! the storage boundary.
//!
//! ## Responsibilities
//! - Fixed mapping from command name to command identifier
//! - Fixed expected argument count per command
//! - Whitespace tokenization and validation of query strings

mod command;
mod parser;

pub use command::CommandId;
pub use parser::{Compute, ComputeLayer, Query};
