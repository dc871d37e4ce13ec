//! Error types for the dedup workflow

use imapdedup_imap::ImapError;
use thiserror::Error;

/// Result type for workflow operations
pub type DedupResult<T> = Result<T, DedupError>;

/// Errors that end a run.
///
/// Each variant names the stage that failed; the wrapped `ImapError` carries
/// the server's or transport's own reason.
#[derive(Debug, Error)]
pub enum DedupError {
    /// Bad command-line invocation or target expression
    #[error("Usage error: {0}")]
    Usage(String),

    /// DNS, TCP, TLS or STARTTLS failure
    #[error("Connection error: {0}")]
    Connection(#[source] ImapError),

    /// Credentials rejected
    #[error("Authentication error: {0}")]
    Auth(#[source] ImapError),

    /// Folder missing or not accessible in the requested mode
    #[error("Folder error: {0}")]
    Folder(#[source] ImapError),

    /// Header collection failed; partial results are discarded
    #[error("Fetch error: {0}")]
    Fetch(#[source] ImapError),

    /// Flagging or expunge failed. Messages may be left flagged `\Deleted`
    /// without having been expunged.
    #[error("Deletion failed, some messages may remain flagged \\Deleted: {0}")]
    Mutation(#[source] ImapError),

    /// LOGOUT failed after an otherwise successful run
    #[error("Logout failed: {0}")]
    Teardown(#[source] ImapError),

    /// Reading from or writing to the terminal failed
    #[error("Terminal IO error: {0}")]
    Input(#[from] std::io::Error),

    /// Report serialization failed
    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DedupError {
    /// Whether this error comes from how the tool was invoked
    pub fn is_usage(&self) -> bool {
        matches!(self, DedupError::Usage(_))
    }
}
