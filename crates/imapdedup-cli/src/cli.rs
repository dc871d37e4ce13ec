//! Command-line arguments

use std::time::Duration;

use clap::Parser;
use imapdedup_core::{DedupResult, ReportFormat, RunConfig, RunMode, Target};
use imapdedup_imap::Security;

/// Remove duplicate messages from an IMAP folder.
///
/// Messages whose header blocks are byte-for-byte identical are duplicates;
/// the first one in server order is kept.
#[derive(Parser, Debug)]
#[command(name = "imap-dedup", version)]
pub struct Cli {
    /// Folder to scan, as [user[:password]@]hostname[:port]/folder
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Use STARTTLS instead of SSL/TLS
    #[arg(long)]
    pub starttls: bool,

    /// Only report duplicates; the folder is opened read-only
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Seconds to wait for the server to acknowledge LOGOUT
    #[arg(long, value_name = "SECS", default_value_t = 1)]
    pub logout_timeout: u64,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn security(&self) -> Security {
        if self.starttls {
            Security::StartTls
        } else {
            Security::Tls
        }
    }

    /// Build the run configuration, validating the target
    pub fn run_config(&self) -> DedupResult<RunConfig> {
        let target = Target::parse(&self.target, self.security())?;
        let mode = if self.dry_run {
            RunMode::Inspect
        } else {
            RunMode::Delete
        };
        let format = if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        };

        Ok(RunConfig::new(target, mode)
            .with_report_format(format)
            .with_logout_timeout(Duration::from_secs(self.logout_timeout)))
    }

    /// Default tracing filter for the requested verbosity
    pub fn log_directives(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "warn,imap_dedup=info,imapdedup_core=info,imapdedup_imap=info",
            _ => "info,imap_dedup=debug,imapdedup_core=debug,imapdedup_imap=debug",
        }
    }
}
