//! Error types for IMAP operations

use thiserror::Error;

/// Result type for IMAP operations
pub type ImapResult<T> = Result<T, ImapError>;

/// Errors that can occur during IMAP operations
#[derive(Debug, Error)]
pub enum ImapError {
    /// Connection failed
    #[error("Failed to connect to IMAP server: {0}")]
    ConnectionFailed(String),

    /// TLS error
    #[error("TLS error: {0}")]
    TlsError(String),

    /// Server refused to upgrade the plaintext connection
    #[error("STARTTLS rejected: {0}")]
    StartTlsRejected(String),

    /// Authentication failed
    #[error("IMAP authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Folder not found or not accessible
    #[error("Cannot open folder {0}")]
    FolderNotFound(String),

    /// Server returned an error
    #[error("IMAP server error: {0}")]
    ServerError(String),

    /// Parse error
    #[error("Failed to parse IMAP response: {0}")]
    ParseError(String),

    /// Operation issued in the wrong session state
    #[error("Invalid session state: {0}")]
    InvalidState(&'static str),

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,
}
