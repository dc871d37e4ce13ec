//! Folder access modes and selection state

use std::fmt;

/// How a folder is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// `EXAMINE`: nothing in the folder can change
    ReadOnly,
    /// `SELECT`: required before flags can be stored or messages expunged
    ReadWrite,
}

impl AccessMode {
    /// IMAP command used to open a folder in this mode
    pub fn command(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "EXAMINE",
            AccessMode::ReadWrite => "SELECT",
        }
    }

    pub fn is_writable(self) -> bool {
        self == AccessMode::ReadWrite
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::ReadOnly => f.write_str("read-only"),
            AccessMode::ReadWrite => f.write_str("read-write"),
        }
    }
}

/// A folder opened on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFolder {
    /// Folder name as given to SELECT/EXAMINE
    pub name: String,
    /// Mode the folder was opened in
    pub access: AccessMode,
    /// Number of messages reported by the server
    pub exists: u32,
    /// UIDVALIDITY value
    pub uid_validity: Option<u32>,
}

impl SelectedFolder {
    pub fn new(name: impl Into<String>, access: AccessMode, exists: u32) -> Self {
        Self {
            name: name.into(),
            access,
            exists,
            uid_validity: None,
        }
    }
}
