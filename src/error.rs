//! Error types for the normalization engine
//!
//! All failures here are fatal for the conversion run: rule files are
//! configuration, so a malformed line aborts catalog construction, and a
//! malformed table aborts document processing because downstream structure
//! (column count, colgroup) depends on a consistent tree.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for the normalization engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule DSL line could not be parsed
    #[error("invalid rule line '{line}': {reason}")]
    RuleParse { line: String, reason: String },

    /// A style declaration could not be parsed as `name: value`
    #[error("invalid style declaration '{0}'")]
    StyleParse(String),

    /// A table violated the structural preconditions of canonicalization
    #[error("malformed table: {0}")]
    TableStructure(String),

    /// A traversal or mutation precondition was broken by a rule
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// IO error while reading the input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
