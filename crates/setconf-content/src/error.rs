//! Error types for setconf-content

/// Result type for setconf-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in setconf-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid assignment operator {token:?}: {reason}")]
    InvalidOperator { token: String, reason: String },

    #[error("Invalid syntax: {message}")]
    InvalidSyntax { message: String },

    #[error("No assignment operator found in {line:?}")]
    NoAssignmentFound { line: String },

    #[error("Failed to compile operator pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub fn invalid_operator(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOperator {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn no_assignment(line: &[u8]) -> Self {
        Self::NoAssignmentFound {
            line: String::from_utf8_lossy(line).into_owned(),
        }
    }
}
