//! Error types for pgliteral.

use thiserror::Error;

/// The main error type for literal parsing and SQL fragment building.
#[derive(Debug, Error)]
pub enum LiteralError {
    /// The literal does not follow the PostgreSQL text grammar for its kind.
    #[error("Unsupported {kind} format: '{text}'")]
    UnsupportedFormat { kind: &'static str, text: String },

    /// The literal ended before the structure was closed.
    #[error("Unexpected end of input at position {position} while parsing {context}")]
    UnexpectedEndOfInput {
        position: usize,
        context: &'static str,
    },

    /// The value or type has no defined conversion.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// A scalar failed to parse or convert for its column kind.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration.
    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LiteralError {
    /// Create an unsupported-format error for the given literal kind.
    pub fn unsupported(kind: &'static str, text: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            kind,
            text: text.into(),
        }
    }

    /// Create an end-of-input error at the given byte position.
    pub fn eof(position: usize, context: &'static str) -> Self {
        Self::UnexpectedEndOfInput { position, context }
    }

    /// Create an invalid value error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }
}

/// Result type alias for pgliteral operations.
pub type LiteralResult<T> = Result<T, LiteralError>;
