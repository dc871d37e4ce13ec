//! In-memory server and terminal for workflow tests

use std::collections::{HashSet, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use imapdedup_imap::{
    AccessMode, Connector, ImapError, ImapResult, MailSession, MessageRecord, SelectedFolder,
    ServerAddress, HEADER_QUERY,
};

use crate::Console;

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Connect,
    Login,
    Select,
    Fetch,
    FlagDeleted,
    Close,
    Logout,
}

/// A recorded session call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String, String),
    Select(String, AccessMode),
    Fetch,
    FlagDeleted(Vec<u32>),
    Close,
    Logout,
}

struct MockMessage {
    uid: u32,
    header: Vec<u8>,
    seen: bool,
    deleted: bool,
}

struct MockState {
    folder: String,
    messages: Vec<MockMessage>,
    failing: HashSet<Op>,
    calls: Vec<Call>,
    access: Option<AccessMode>,
    fetch_query: &'static str,
}

/// Hands out sessions sharing one mailbox
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    /// A server with one folder holding `(uid, header)` messages in server order
    pub fn new(folder: &str, messages: &[(u32, &str)]) -> Self {
        let messages = messages
            .iter()
            .map(|&(uid, header)| MockMessage {
                uid,
                header: header.as_bytes().to_vec(),
                seen: false,
                deleted: false,
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(MockState {
                folder: folder.to_string(),
                messages,
                failing: HashSet::new(),
                calls: Vec::new(),
                access: None,
                fetch_query: HEADER_QUERY,
            })),
        }
    }

    pub fn failing(self, op: Op) -> Self {
        self.lock().failing.insert(op);
        self
    }

    /// Serve fetches as if the client had sent `query` instead of the real one
    pub fn with_fetch_query(self, query: &'static str) -> Self {
        self.lock().fetch_query = query;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn logout_count(&self) -> usize {
        self.lock().calls.iter().filter(|c| **c == Call::Logout).count()
    }

    /// Number of calls that could change the mailbox
    pub fn mutation_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::FlagDeleted(_) | Call::Close))
            .count()
    }

    pub fn remaining_uids(&self) -> Vec<u32> {
        self.lock().messages.iter().map(|m| m.uid).collect()
    }

    pub fn seen_uids(&self) -> Vec<u32> {
        self.lock()
            .messages
            .iter()
            .filter(|m| m.seen)
            .map(|m| m.uid)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Session = MockSession;

    async fn connect(&self, server: &ServerAddress) -> ImapResult<MockSession> {
        if self.lock().failing.contains(&Op::Connect) {
            return Err(ImapError::ConnectionFailed(format!("{}: refused", server)));
        }
        Ok(MockSession {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

impl MockSession {
    /// Record `call`, then fail it if `op` was configured to fail
    fn enter(&self, call: Call, op: Op) -> ImapResult<MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(ImapError::ServerError(format!("{:?} failed", op)));
        }
        Ok(state)
    }
}

#[async_trait]
impl MailSession for MockSession {
    async fn login(&mut self, username: &str, password: &str) -> ImapResult<()> {
        self.enter(Call::Login(username.into(), password.into()), Op::Login)
            .map_err(|e| ImapError::AuthenticationFailed(e.to_string()))?;
        Ok(())
    }

    async fn select(&mut self, folder: &str, mode: AccessMode) -> ImapResult<SelectedFolder> {
        let mut state = self
            .enter(Call::Select(folder.into(), mode), Op::Select)
            .map_err(|_| ImapError::FolderNotFound(folder.to_string()))?;
        if state.folder != folder {
            return Err(ImapError::FolderNotFound(folder.to_string()));
        }
        state.access = Some(mode);
        Ok(SelectedFolder::new(folder, mode, state.messages.len() as u32))
    }

    async fn fetch_headers(&mut self) -> ImapResult<Vec<MessageRecord>> {
        let mut state = self.enter(Call::Fetch, Op::Fetch)?;
        if state.access.is_none() {
            return Err(ImapError::InvalidState("no folder selected"));
        }
        // A non-peek BODY[...] fetch sets \Seen
        if !state.fetch_query.contains("BODY.PEEK[") {
            for message in state.messages.iter_mut() {
                message.seen = true;
            }
        }
        Ok(state
            .messages
            .iter()
            .map(|m| MessageRecord::new(m.uid, m.header.clone()))
            .collect())
    }

    async fn flag_deleted(&mut self, uids: &[u32]) -> ImapResult<()> {
        let mut state = self.enter(Call::FlagDeleted(uids.to_vec()), Op::FlagDeleted)?;
        if state.access != Some(AccessMode::ReadWrite) {
            return Err(ImapError::InvalidState("folder is read-only"));
        }
        for message in state.messages.iter_mut() {
            if uids.contains(&message.uid) {
                message.deleted = true;
            }
        }
        Ok(())
    }

    async fn close(&mut self) -> ImapResult<()> {
        let mut state = self.enter(Call::Close, Op::Close)?;
        if state.access == Some(AccessMode::ReadWrite) {
            state.messages.retain(|m| !m.deleted);
        }
        state.access = None;
        Ok(())
    }

    async fn logout(&mut self, _wait: Duration) -> ImapResult<()> {
        let mut state = self.enter(Call::Logout, Op::Logout)?;
        state.access = None;
        Ok(())
    }
}

/// Console fed from a fixed list of input lines
pub struct ScriptedConsole {
    interactive: bool,
    lines: VecDeque<String>,
    hidden: Option<String>,
    pub output: String,
    pub hidden_reads: usize,
}

impl ScriptedConsole {
    pub fn new(interactive: bool, lines: &[&str]) -> Self {
        Self {
            interactive,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            hidden: None,
            output: String::new(),
            hidden_reads: 0,
        }
    }

    /// Value returned by the next echo-free read
    pub fn with_hidden(mut self, value: &str) -> Self {
        self.hidden = Some(value.to_string());
        self
    }
}

impl Console for ScriptedConsole {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn read_hidden(&mut self) -> io::Result<String> {
        self.hidden_reads += 1;
        Ok(self.hidden.take().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn test_non_peek_fetch_marks_messages_seen() {
        let server = ServerAddress::new("imap.example.org", 993, Default::default());
        let connector = MockConnector::new("INBOX", &[(1, "a"), (2, "b")])
            .with_fetch_query("(UID BODY[HEADER])");
        let mut session = connector.connect(&server).await.unwrap();

        session.login("alice", "pw").await.unwrap();
        session.select("INBOX", AccessMode::ReadOnly).await.unwrap();
        session.fetch_headers().await.unwrap();

        assert_eq!(connector.seen_uids(), vec![1, 2]);
    }
}
