//! Error types for the footage organizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the footage organizer.
///
/// Tool-level extraction failures (binary missing, timeout, malformed
/// output) are deliberately NOT here: they are represented by
/// [`crate::services::ToolFailure`] and always demoted to "no evidence"
/// at the call site. This enum covers failures that a command surfaces
/// to the operator.
#[derive(Error, Debug)]
pub enum Error {
    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Footage_raw directory not found under: {0}")]
    FootageRawMissing(String),

    #[error("Footage_metadata_sorted directory not found under: {0}")]
    SortedDirMissing(String),

    // Configuration errors
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid time delta '{0}': expected 16 characters [+|-]YYYYMMDD_HHMMSS")]
    InvalidTimeDelta(String),

    // Placeholder errors
    #[error("Invalid placeholder file {path}: {reason}")]
    InvalidPlaceholder { path: String, reason: String },

    // Transfer errors
    #[error("Size mismatch after copy: {src} ({src_size} bytes) -> {dest} ({dest_size} bytes)")]
    IntegrityMismatch {
        src: String,
        dest: String,
        src_size: u64,
        dest_size: u64,
    },

    #[error("{failed} of {total} transfers failed")]
    TransferIncomplete { failed: usize, total: usize },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // CSV errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
