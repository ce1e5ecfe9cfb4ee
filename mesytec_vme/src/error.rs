/*!
Error types for reading data words from text input.

Decoding itself cannot fail; only the text source has error cases.
*/

use thiserror::Error;

/// Result type used by the word source
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors raised while reading words from text input
#[derive(Error, Debug)]
pub enum SourceError {
    /// Token is not an unsigned integer literal
    #[error("invalid data word {token:?} on line {line}")]
    InvalidToken { token: String, line: usize },

    /// Token is a valid literal but does not fit in 32 bits
    #[error("data word {token:?} on line {line} does not fit in 32 bits")]
    OutOfRange { token: String, line: usize },

    /// I/O errors from the underlying reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Create a new invalid token error
    pub fn invalid_token(token: impl Into<String>, line: usize) -> Self {
        Self::InvalidToken { token: token.into(), line }
    }

    /// Create a new out of range error
    pub fn out_of_range(token: impl Into<String>, line: usize) -> Self {
        Self::OutOfRange { token: token.into(), line }
    }

    /// Line number of the offending token, if the error is about a token
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidToken { line, .. } | Self::OutOfRange { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
