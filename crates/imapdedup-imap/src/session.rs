//! Capabilities the dedup workflow needs from a mail server

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::{AccessMode, ImapResult, MessageRecord, SelectedFolder};

/// Transport security for the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// TLS from the first byte (IMAPS)
    #[default]
    Tls,
    /// Plaintext greeting, then upgrade with STARTTLS
    StartTls,
}

impl Security {
    /// Well-known port for this transport
    pub fn default_port(self) -> u16 {
        match self {
            Security::Tls => 993,
            Security::StartTls => 143,
        }
    }
}

/// Where to connect and how to secure the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
    pub security: Security,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16, security: Security) -> Self {
        Self {
            host: host.into(),
            port,
            security,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// An open, secured connection to a mail server.
///
/// Every operation is a single request/response exchange. Implementations
/// must make `logout` safe to call in any state, including after a failed
/// login.
#[async_trait]
pub trait MailSession: Send {
    /// Authenticate with LOGIN
    async fn login(&mut self, username: &str, password: &str) -> ImapResult<()>;

    /// Open a folder in the given mode
    async fn select(&mut self, folder: &str, mode: AccessMode) -> ImapResult<SelectedFolder>;

    /// Fetch the header block of every message in the selected folder,
    /// in server order, without setting `\Seen`
    async fn fetch_headers(&mut self) -> ImapResult<Vec<MessageRecord>>;

    /// Add `\Deleted` to every given UID in one command
    async fn flag_deleted(&mut self, uids: &[u32]) -> ImapResult<()>;

    /// Close the selected folder, expunging `\Deleted` messages
    async fn close(&mut self) -> ImapResult<()>;

    /// Send LOGOUT, waiting at most `wait` for the server to answer
    async fn logout(&mut self, wait: Duration) -> ImapResult<()>;
}

/// Opens sessions
#[async_trait]
pub trait Connector: Sync {
    type Session: MailSession;

    async fn connect(&self, server: &ServerAddress) -> ImapResult<Self::Session>;
}
