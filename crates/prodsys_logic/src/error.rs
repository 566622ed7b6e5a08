//! Error types for the production-system engine.

use thiserror::Error;

/// A specialized `Result` type for knowledge-base and solver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while building a knowledge base or solving.
///
/// Failing to derive a target is not an error: solvers report it through
/// [`SolveResult::success`](crate::SolveResult::success).
#[derive(Error, Debug)]
pub enum Error {
    /// A fact with this name is already registered.
    #[error("Duplicate fact: {0}")]
    DuplicateFact(String),

    /// A rule was defined with an empty precondition or consequence set.
    #[error("Invalid rule definition: {0}")]
    InvalidRule(String),

    /// A line of the textual knowledge base could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The configured step bound was hit before the solver settled.
    #[error("Step limit exceeded: {limit}")]
    StepLimitExceeded { limit: usize },

    /// Replaying a plan hit a rule whose preconditions were not yet known.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// A configuration value could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a knowledge-base file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
