//! Duplicate removal for IMAP folders
//!
//! Messages are compared by their raw header block. The first message of
//! every group, in server order, is kept; the rest are reported and, once
//! the user confirms, flagged `\Deleted` and expunged.

mod config;
mod confirm;
mod console;
mod credentials;
mod dedup;
mod error;
mod report;
mod target;
mod workflow;

#[cfg(test)]
mod mock;

pub use config::{RunConfig, RunMode, DEFAULT_LOGOUT_TIMEOUT};
pub use confirm::{confirm_deletion, Confirmation};
pub use console::{trim_line_ending, Console};
pub use credentials::{resolve_credentials, Credentials, PartialCredentials};
pub use dedup::{deduplicate, DedupIndex, Deduplication, DuplicateSet};
pub use error::{DedupError, DedupResult};
pub use report::{Report, ReportFormat};
pub use target::Target;
pub use workflow::{run, Outcome};
