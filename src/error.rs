//! Crate-wide error type for the helper functions

/// Errors raised by the standalone helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HutiError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
