//! Error types for the prodsys command line.

use thiserror::Error;

/// A specialized `Result` type for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can stop a `prodsys` run.
#[derive(Error, Debug)]
pub enum Error {
    /// An error raised by the inference engine or the knowledge-base loader.
    #[error("Engine error: {0}")]
    Engine(#[from] prodsys_logic::Error),

    /// An error that occurred while producing JSON output.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The command-line selection could not be used.
    #[error("Usage error: {0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (Error::Usage("no target".into()), "Usage error: no target"),
            (
                Error::Engine(prodsys_logic::Error::DuplicateFact("A".into())),
                "Engine error: Duplicate fact: A",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_engine_error() {
        let error: Error = prodsys_logic::Error::StepLimitExceeded { limit: 3 }.into();
        assert!(matches!(error, Error::Engine(_)));
    }
}
