use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or starting a capture session.
///
/// The error is `Clone` because process-wide settings are loaded once and the
/// cached result is handed to every session that asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Both a keep list and an evict list were supplied by the user.
    #[error(
        "keep and evict settings are mutually exclusive. Specify one or the other, not both."
    )]
    MutuallyExclusive,

    /// A configuration source could not be read or parsed.
    #[error("invalid logcap configuration in {origin}: {message}")]
    Config {
        /// Where the bad configuration came from (file path or variable name)
        origin: String,
        /// Human-readable description of the problem
        message: String,
    },

    /// A capture session is already active on this thread.
    #[error("a capture session is already active on this thread; nested sessions are unsupported")]
    SessionActive,
}

impl Error {
    /// Creates a configuration error for a file-based source.
    pub(crate) fn config_file(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Config {
            origin: path.into().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a configuration error for an environment variable.
    pub(crate) fn config_env(var: &str, message: impl ToString) -> Self {
        Error::Config {
            origin: format!("${var}"),
            message: message.to_string(),
        }
    }
}
