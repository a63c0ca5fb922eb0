//! Query parser
//!
//! Whitespace-tokenizing parser from query strings to typed [`Query`] values.
//! Validation errors here are synchronous and never fatal to the process.

use crate::error::{Result, StrataError};

use super::CommandId;

/// A parsed, validated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    command_id: CommandId,
    arguments: Vec<String>,
}

impl Query {
    pub fn new(command_id: CommandId, arguments: Vec<String>) -> Self {
        Self {
            command_id,
            arguments,
        }
    }

    pub fn command_id(&self) -> CommandId {
        self.command_id
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// Narrow parsing capability consumed by the database layer; lets the
/// dispatcher be tested with a fake parser.
pub trait ComputeLayer: Send + Sync {
    fn parse(&self, query: &str) -> Result<Query>;
}

/// The production parser
#[derive(Debug, Default)]
pub struct Compute;

impl Compute {
    pub fn new() -> Self {
        Self
    }
}

impl ComputeLayer for Compute {
    fn parse(&self, query: &str) -> Result<Query> {
        let mut tokens = query.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| StrataError::InvalidQuery("empty query".to_string()))?;

        let command_id = CommandId::from_name(name);
        if command_id == CommandId::Unknown {
            return Err(StrataError::InvalidQuery(format!(
                "unknown command: {name}"
            )));
        }

        let arguments: Vec<String> = tokens.map(str::to_string).collect();
        let expected = command_id.arguments_number();
        if arguments.len() != expected {
            return Err(StrataError::InvalidQuery(format!(
                "{} expects {} argument(s), got {}",
                command_id.name(),
                expected,
                arguments.len()
            )));
        }

        Ok(Query::new(command_id, arguments))
    }
}
