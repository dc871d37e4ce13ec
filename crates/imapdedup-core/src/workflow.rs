//! The connect → login → select → fetch → dedup → confirm → expunge workflow

use imapdedup_imap::{Connector, ImapError, MailSession};
use tracing::{debug, info, warn};

use crate::confirm::{confirm_deletion, Confirmation};
use crate::credentials::resolve_credentials;
use crate::{deduplicate, Console, DedupError, DedupResult, Report, RunConfig, RunMode};

/// How a run ended, short of a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Read-only scan finished
    Inspected(Report),
    /// Nothing to delete; no prompt was shown
    AbortedEmpty(Report),
    /// The user did not confirm; nothing was changed
    AbortedByUser(Report),
    /// Duplicates were flagged and expunged
    Deleted(Report),
}

impl Outcome {
    pub fn report(&self) -> &Report {
        match self {
            Outcome::Inspected(report)
            | Outcome::AbortedEmpty(report)
            | Outcome::AbortedByUser(report)
            | Outcome::Deleted(report) => report,
        }
    }

    /// Whether the run stopped without reaching its goal (not an error)
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::AbortedEmpty(_) | Outcome::AbortedByUser(_))
    }
}

/// Run one dedup pass against the folder named in `config`.
///
/// Once a connection exists it is logged out exactly once, whatever the
/// outcome. A logout failure becomes the run's error only if nothing failed
/// before it.
pub async fn run<N, C>(config: &RunConfig, connector: &N, console: &mut C) -> DedupResult<Outcome>
where
    N: Connector,
    C: Console,
{
    let mut session = connector
        .connect(&config.server)
        .await
        .map_err(DedupError::Connection)?;

    let result = drive(config, &mut session, console).await;
    let teardown = session.logout(config.logout_timeout).await;

    match (result, teardown) {
        (Ok(outcome), Ok(())) => Ok(outcome),
        (Ok(_), Err(e)) => Err(DedupError::Teardown(e)),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(logout_error)) => {
            warn!("Logout failed: {}", logout_error);
            Err(e)
        }
    }
}

async fn drive<S, C>(config: &RunConfig, session: &mut S, console: &mut C) -> DedupResult<Outcome>
where
    S: MailSession,
    C: Console,
{
    let credentials = resolve_credentials(&config.credentials, console)?;
    session
        .login(&credentials.username, &credentials.password)
        .await
        .map_err(DedupError::Auth)?;

    let folder = session
        .select(&config.folder, config.mode.access_mode())
        .await
        .map_err(DedupError::Folder)?;
    info!("Opened {} ({}), {} messages", folder.name, folder.access, folder.exists);

    let records = session.fetch_headers().await.map_err(DedupError::Fetch)?;
    let dedup = deduplicate(&records);
    debug!(
        "{} records, {} kept, {} duplicates",
        dedup.total,
        dedup.kept.len(),
        dedup.duplicates.len()
    );

    let report = Report::new(&config.folder, &dedup);
    report.write_to(console, config.report_format)?;

    if config.mode == RunMode::Inspect {
        return Ok(Outcome::Inspected(report));
    }

    if dedup.duplicates.is_empty() {
        console.write_line("No messages to delete")?;
        return Ok(Outcome::AbortedEmpty(report));
    }

    if confirm_deletion(console, dedup.duplicates.len(), &config.folder)? == Confirmation::Declined {
        console.write_line("Aborted")?;
        return Ok(Outcome::AbortedByUser(report));
    }

    if !folder.access.is_writable() {
        return Err(DedupError::Mutation(ImapError::InvalidState(
            "folder was not opened read-write",
        )));
    }

    info!("Flagging {} duplicates in {}", dedup.duplicates.len(), config.folder);
    session
        .flag_deleted(dedup.duplicates.as_slice())
        .await
        .map_err(DedupError::Mutation)?;
    session.close().await.map_err(DedupError::Mutation)?;

    console.write_line("Messages successfully deleted")?;
    Ok(Outcome::Deleted(report))
}
