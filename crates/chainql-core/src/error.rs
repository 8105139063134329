//! Error types for chainql.
//!
//! The query surface is permissive: malformed query text never produces an
//! error. The variants below cover strict binding, input limits and the
//! facade's own concerns (serialization, configuration).

use thiserror::Error;

/// The main error type for chainql operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected by validation (limits, malformed arguments)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Strict binding: placeholders consumed and parameters supplied differ
    #[error(
        "Parameter count mismatch: query binds {expected} placeholder(s) but {supplied} parameter(s) were supplied"
    )]
    ParameterCount {
        /// Placeholders consumed by the WHERE clause
        expected: usize,
        /// Parameters supplied by the caller
        supplied: usize,
    },

    /// Strict binding: a WHERE condition matched none of the known forms
    #[error("Unrecognized condition: '{0}'")]
    UnrecognizedCondition(String),

    /// A sequence operation was attempted on a single-value working set
    #[error("{0} requires a record sequence, but the working set holds a single value (call reset first)")]
    NotASequence(&'static str),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration (limits, log setup)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for chainql operations.
pub type Result<T> = std::result::Result<T, Error>;
