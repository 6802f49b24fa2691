//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`NodeError`]
//! via `#[from]` (or an `into_domain` helper for adapter errors).

use crate::command::{ArgumentKind, CommandType};

/// Base error type shared by the domain, the engine and the adapters.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// A command argument failed local validation.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The configuration store could not read or write a parameter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a command argument is rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The argument variant does not match what the command expects.
    #[error("{command} expects {expected} argument, got {actual}")]
    ArgumentMismatch {
        command: CommandType,
        expected: ArgumentKind,
        actual: ArgumentKind,
    },

    /// A text argument does not fit the field's storage.
    #[error("{command} accepts at most {max} bytes, got {actual}")]
    TooLong {
        command: CommandType,
        max: usize,
        actual: usize,
    },

    /// A numeric argument is outside the range of the field.
    #[error("{command} value {value} is out of range (max {max})")]
    OutOfRange {
        command: CommandType,
        value: u32,
        max: u32,
    },

    /// A write-once field already holds a value.
    #[error("{command} is already set")]
    AlreadySet { command: CommandType },

    /// The command tag is not recognised.
    #[error("unknown command")]
    UnknownCommand,
}

/// Appending to a bounded response failed because it is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("response buffer is full")]
pub struct ResponseFull;
