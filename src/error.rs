//! Error types for vaultmatch

use thiserror::Error;

/// vaultmatch error type
#[derive(Error, Debug)]
pub enum Error {
    /// A note record failed validation at ingestion
    #[error("Invalid note record: {0}")]
    InvalidRecord(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Note could not be resolved from a query
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Result type alias for vaultmatch operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRecord("path is empty".to_string());
        assert_eq!(err.to_string(), "Invalid note record: path is empty");

        let err = Error::NoteNotFound("Plan".to_string());
        assert_eq!(err.to_string(), "Note not found: Plan");
    }
}
