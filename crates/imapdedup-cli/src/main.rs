//! imap-dedup - remove duplicate messages from an IMAP folder

mod cli;
mod console;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use imapdedup_core::{DedupResult, Outcome};
use imapdedup_imap::ImapConnector;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use console::StdConsole;

/// Deleted, or inspected without error
const EXIT_OK: u8 = 0;
/// Bad invocation
const EXIT_USAGE: u8 = 1;
/// Nothing to delete, or the user declined
const EXIT_ABORTED: u8 = 2;
/// Connection, protocol or terminal failure
const EXIT_FAILURE: u8 = 3;

fn exit_status(result: &DedupResult<Outcome>) -> u8 {
    match result {
        Ok(outcome) if outcome.is_aborted() => EXIT_ABORTED,
        Ok(_) => EXIT_OK,
        Err(e) if e.is_usage() => EXIT_USAGE,
        Err(_) => EXIT_FAILURE,
    }
}

fn init_logging(directives: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)))
        .init();
}

#[async_std::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.log_directives());

    let config = match cli.run_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n\n{}", e, Cli::command().render_usage());
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let mut console = StdConsole;
    let result = imapdedup_core::run(&config, &ImapConnector, &mut console).await;

    if let Err(e) = &result {
        error!("{}", e);
    }

    ExitCode::from(exit_status(&result))
}
