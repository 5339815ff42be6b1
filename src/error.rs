//! Error types for release-helper operations.

use thiserror::Error;

/// Domain errors raised by command dispatch and asset transfers. They are
/// carried inside `color_eyre::Report` and can be recovered with
/// `downcast_ref`.
#[derive(Error, Debug)]
pub enum ReleaseHelperError {
    // Usage errors
    #[error("No command selected!")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(
        "Wrong number of arguments for command: {command} (expected {expected}, got {actual})"
    )]
    WrongArgumentCount {
        command: String,
        expected: usize,
        actual: usize,
        usage: String,
    },

    #[error("Invalid release id: {0}")]
    InvalidReleaseId(String),

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Asset name is not a plain file name: {0:?}")]
    InvalidAssetName(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Transfer errors
    #[error("Too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: usize },

    #[error("Redirect from {url} is missing a Location header")]
    MissingRedirectLocation { url: String },

    #[error("Bad HTTP status code: {status} fetching {url}")]
    BadStatus { url: String, status: u16 },
}

impl ReleaseHelperError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a bad status error for a download url
    pub fn bad_status(url: impl Into<String>, status: u16) -> Self {
        Self::BadStatus {
            url: url.into(),
            status,
        }
    }
}
