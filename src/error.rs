//! Error types for parsing and project mutation.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A grammar mismatch raised while recognizing the pbxproj dialect.
///
/// Carries the 1-based source position, the grammar rule that failed and a
/// short snippet of the input at the point of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
    /// Name of the grammar rule that did not match.
    pub rule: &'static str,
    /// The input immediately at the failure point, truncated.
    pub snippet: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse error at {}:{}: expected {} near {:?}",
            self.line, self.column, self.rule, self.snippet
        )
    }
}

impl std::error::Error for ParseError {}

/// Errors surfaced by the load, edit and write operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The source text did not match the pbxproj grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An addition targeted a path that is already referenced.
    #[error("file already exists: {path}")]
    AlreadyExists { path: String },

    /// An edit targeted a missing target, group or file.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A value-tree accessor was invoked on the wrong variant.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Read or write failure at the parse/write boundary.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an `AlreadyExists` error for a file path.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Create a `NotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
