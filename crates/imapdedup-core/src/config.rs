//! Run configuration

use std::time::Duration;

use imapdedup_imap::{AccessMode, ServerAddress};

use crate::credentials::PartialCredentials;
use crate::target::Target;
use crate::ReportFormat;

/// Default time allowed for the server to answer LOGOUT
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(1);

/// Which variant of the tool to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Report duplicates only; the folder is opened read-only
    Inspect,
    /// Report, confirm, then delete duplicates
    #[default]
    Delete,
}

impl RunMode {
    /// Folder access this mode needs
    pub fn access_mode(self) -> AccessMode {
        match self {
            RunMode::Inspect => AccessMode::ReadOnly,
            RunMode::Delete => AccessMode::ReadWrite,
        }
    }
}

/// Everything a run needs, passed explicitly into `run`
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub server: ServerAddress,
    pub folder: String,
    pub credentials: PartialCredentials,
    pub mode: RunMode,
    pub report_format: ReportFormat,
    pub logout_timeout: Duration,
}

impl RunConfig {
    pub fn new(target: Target, mode: RunMode) -> Self {
        Self {
            server: target.server,
            folder: target.folder,
            credentials: target.credentials,
            mode,
            report_format: ReportFormat::Text,
            logout_timeout: DEFAULT_LOGOUT_TIMEOUT,
        }
    }

    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    pub fn with_logout_timeout(mut self, timeout: Duration) -> Self {
        self.logout_timeout = timeout;
        self
    }
}
