//! IMAP session boundary for imap-dedup
//!
//! Provides the `MailSession`/`Connector` capabilities the dedup workflow is
//! written against, and an async-imap backed implementation over TLS or
//! STARTTLS.

mod client;
mod error;
mod folder;
mod message;
mod session;

pub use client::{ImapClient, ImapConnector, ImapTransport, HEADER_QUERY};
pub use error::{ImapError, ImapResult};
pub use folder::{AccessMode, SelectedFolder};
pub use message::{uid_set, MessageRecord};
pub use session::{Connector, MailSession, Security, ServerAddress};
