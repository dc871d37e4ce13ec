//! IMAP client implementation

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

use async_imap::imap_proto::{Response, Status};
use async_imap::{Client, Session};
use async_native_tls::{TlsConnector, TlsStream};
use async_std::future::timeout;
use async_std::io::{Read, Write};
use async_std::net::TcpStream;
use async_trait::async_trait;
use futures::TryStreamExt;
use tracing::{debug, info};

use crate::message::uid_set;
use crate::{
    AccessMode, Connector, ImapError, ImapResult, MailSession, MessageRecord, Security,
    SelectedFolder, ServerAddress,
};

/// Query used to collect header blocks without touching `\Seen`
pub const HEADER_QUERY: &str = "(UID BODY.PEEK[HEADER])";

/// Byte stream an IMAP conversation can run over
pub trait ImapTransport: Read + Write + Unpin + fmt::Debug + Send {}

impl<T: Read + Write + Unpin + fmt::Debug + Send> ImapTransport for T {}

enum Connection<T: ImapTransport> {
    /// Greeting read, not yet logged in
    Greeted(Client<T>),
    Authenticated(Session<T>),
}

/// IMAP client for one dedup run
pub struct ImapClient<T: ImapTransport = TlsStream<TcpStream>> {
    connection: Option<Connection<T>>,
    selected: Option<SelectedFolder>,
    server: ServerAddress,
}

impl ImapClient {
    /// Open a secured connection and read the server greeting
    pub async fn connect(server: &ServerAddress) -> ImapResult<Self> {
        info!("Connecting to {}", server);

        let tcp_stream = TcpStream::connect((server.host.as_str(), server.port))
            .await
            .map_err(|e| ImapError::ConnectionFailed(format!("{}: {}", server, e)))?;

        let tls_connector = TlsConnector::new();

        match server.security {
            Security::Tls => {
                let tls_stream = tls_connector
                    .connect(&server.host, tcp_stream)
                    .await
                    .map_err(|e| ImapError::TlsError(e.to_string()))?;
                debug!("TLS connection established");

                Self::from_stream(tls_stream, server).await
            }
            Security::StartTls => {
                let mut plain = Client::new(tcp_stream);
                read_greeting(&mut plain, server).await?;

                plain
                    .run_command_and_check_ok("STARTTLS", None)
                    .await
                    .map_err(|e| ImapError::StartTlsRejected(e.to_string()))?;

                let tls_stream = tls_connector
                    .connect(&server.host, plain.into_inner())
                    .await
                    .map_err(|e| ImapError::TlsError(e.to_string()))?;
                debug!("Connection upgraded with STARTTLS");

                // No second greeting after the upgrade
                Ok(Self::greeted(Client::new(tls_stream), server))
            }
        }
    }
}

impl<T: ImapTransport> ImapClient<T> {
    /// Start a conversation over an already secured stream
    pub async fn from_stream(stream: T, server: &ServerAddress) -> ImapResult<Self> {
        let mut client = Client::new(stream);
        read_greeting(&mut client, server).await?;
        Ok(Self::greeted(client, server))
    }

    fn greeted(client: Client<T>, server: &ServerAddress) -> Self {
        Self {
            connection: Some(Connection::Greeted(client)),
            selected: None,
            server: server.clone(),
        }
    }

    /// Get the session, returning an error if not logged in
    fn session_mut(&mut self) -> ImapResult<&mut Session<T>> {
        match self.connection.as_mut() {
            Some(Connection::Authenticated(session)) => Ok(session),
            Some(Connection::Greeted(_)) => Err(ImapError::InvalidState("not authenticated")),
            None => Err(ImapError::InvalidState("not connected")),
        }
    }
}

/// Read the untagged greeting; anything but OK or PREAUTH means no usable connection
async fn read_greeting<T: ImapTransport>(
    client: &mut Client<T>,
    server: &ServerAddress,
) -> ImapResult<()> {
    let response = match client.read_response().await {
        Some(Ok(response)) => response,
        Some(Err(e)) => {
            return Err(ImapError::ConnectionFailed(format!("{}: {}", server, e)));
        }
        None => {
            return Err(ImapError::ConnectionFailed(format!(
                "{}: connection closed before greeting",
                server
            )));
        }
    };

    match response.parsed() {
        Response::Data {
            status: Status::Ok | Status::PreAuth,
            ..
        } => {
            debug!("Greeting received from {}", server);
            Ok(())
        }
        Response::Data {
            status: Status::Bye,
            information,
            ..
        } => Err(ImapError::ConnectionFailed(format!(
            "{}: server said BYE: {}",
            server,
            information.as_deref().unwrap_or("no reason given")
        ))),
        other => Err(ImapError::ConnectionFailed(format!(
            "{}: unexpected greeting {:?}",
            server, other
        ))),
    }
}

/// Turn `(sequence number, UID, header)` FETCH data into one record per UID.
///
/// Responses without a header section are unsolicited flag updates or the
/// UID-only half of a split response; they are skipped. A header arriving
/// without a UID takes the UID another response gave the same sequence
/// number. The first header seen for a UID wins.
fn collect_records(
    responses: &[(u32, Option<u32>, Option<&[u8]>)],
) -> ImapResult<Vec<MessageRecord>> {
    let uids_by_seq: HashMap<u32, u32> = responses
        .iter()
        .filter_map(|&(message, uid, _)| uid.map(|uid| (message, uid)))
        .collect();

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(responses.len());
    for &(message, uid, header) in responses {
        let Some(header) = header else {
            debug!("Skipping FETCH response for message {} without a header", message);
            continue;
        };

        let uid = uid
            .or_else(|| uids_by_seq.get(&message).copied())
            .ok_or_else(|| {
                ImapError::ParseError(format!(
                    "Missing UID in FETCH response for message {}",
                    message
                ))
            })?;

        if !seen.insert(uid) {
            debug!("Ignoring repeated header for UID {}", uid);
            continue;
        }
        records.push(MessageRecord::new(uid, header));
    }

    Ok(records)
}

#[async_trait]
impl<T: ImapTransport> MailSession for ImapClient<T> {
    async fn login(&mut self, username: &str, password: &str) -> ImapResult<()> {
        let client = match self.connection.take() {
            Some(Connection::Greeted(client)) => client,
            other => {
                self.connection = other;
                return Err(ImapError::InvalidState("already authenticated or disconnected"));
            }
        };

        info!("Authenticating with LOGIN for {}", username);

        match client.login(username, password).await {
            Ok(session) => {
                self.connection = Some(Connection::Authenticated(session));
                info!("LOGIN authentication successful");
                Ok(())
            }
            Err((e, client)) => {
                // Keep the connection so LOGOUT can still be sent
                self.connection = Some(Connection::Greeted(client));
                Err(ImapError::AuthenticationFailed(e.to_string()))
            }
        }
    }

    async fn select(&mut self, folder: &str, mode: AccessMode) -> ImapResult<SelectedFolder> {
        let session = self.session_mut()?;

        let mailbox = match mode {
            AccessMode::ReadOnly => session.examine(folder).await,
            AccessMode::ReadWrite => session.select(folder).await,
        }
        .map_err(|e| ImapError::FolderNotFound(format!("{}: {}", folder, e)))?;

        let selected = SelectedFolder {
            name: folder.to_string(),
            access: mode,
            exists: mailbox.exists,
            uid_validity: mailbox.uid_validity,
        };

        debug!(
            "{} {} with {} messages (UIDVALIDITY {:?})",
            mode.command(),
            folder,
            selected.exists,
            selected.uid_validity
        );

        self.selected = Some(selected.clone());
        Ok(selected)
    }

    async fn fetch_headers(&mut self) -> ImapResult<Vec<MessageRecord>> {
        let exists = self
            .selected
            .as_ref()
            .map(|folder| folder.exists)
            .ok_or(ImapError::InvalidState("no folder selected"))?;

        // Some servers answer "1:*" on an empty folder with BAD
        if exists == 0 {
            debug!("Folder is empty, skipping FETCH");
            return Ok(Vec::new());
        }

        let session = self.session_mut()?;

        let fetches = session
            .uid_fetch("1:*", HEADER_QUERY)
            .await
            .map_err(|e| ImapError::ServerError(e.to_string()))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| ImapError::ParseError(e.to_string()))?;

        let responses: Vec<_> = fetches
            .iter()
            .map(|fetch| (fetch.message, fetch.uid, fetch.header()))
            .collect();
        let records = collect_records(&responses)?;

        debug!(
            "Fetched {} message headers from {} responses",
            records.len(),
            fetches.len()
        );
        Ok(records)
    }

    async fn flag_deleted(&mut self, uids: &[u32]) -> ImapResult<()> {
        if uids.is_empty() {
            return Ok(());
        }

        let set = uid_set(uids);
        let session = self.session_mut()?;

        debug!("UID STORE {} +FLAGS.SILENT (\\Deleted)", set);
        session
            .uid_store(&set, "+FLAGS.SILENT (\\Deleted)")
            .await
            .map_err(|e| ImapError::ServerError(e.to_string()))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| ImapError::ServerError(e.to_string()))?;

        Ok(())
    }

    async fn close(&mut self) -> ImapResult<()> {
        let session = self.session_mut()?;

        session
            .close()
            .await
            .map_err(|e| ImapError::ServerError(e.to_string()))?;

        self.selected = None;
        Ok(())
    }

    async fn logout(&mut self, wait: Duration) -> ImapResult<()> {
        self.selected = None;

        let result = match self.connection.take() {
            Some(Connection::Authenticated(mut session)) => {
                timeout(wait, session.logout()).await
            }
            Some(Connection::Greeted(mut client)) => {
                timeout(wait, client.run_command_and_check_ok("LOGOUT", None)).await
            }
            None => return Ok(()),
        };

        match result {
            Ok(Ok(())) => {
                debug!("Logged out of {}", self.server);
                Ok(())
            }
            Ok(Err(e)) => Err(ImapError::ServerError(e.to_string())),
            Err(_) => Err(ImapError::Timeout),
        }
    }
}

/// Connects `ImapClient`s over the network
#[derive(Debug, Clone, Copy, Default)]
pub struct ImapConnector;

#[async_trait]
impl Connector for ImapConnector {
    type Session = ImapClient;

    async fn connect(&self, server: &ServerAddress) -> ImapResult<ImapClient> {
        ImapClient::connect(server).await
    }
}
