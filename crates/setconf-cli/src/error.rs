//! Error types for setconf-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from setconf-content
    #[error(transparent)]
    Content(#[from] setconf_content::Error),

    /// Error from setconf-fs
    #[error(transparent)]
    Fs(#[from] setconf_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Arguments that do not describe an operation
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for unreadable or unwritable files, missing
    /// assignments, bad syntax files and usage errors, 1 for the rest.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Content(setconf_content::Error::Pattern(_)) | Self::Io(_) => 1,
            Self::Content(_) | Self::Fs(_) | Self::User { .. } => 2,
        }
    }
}
