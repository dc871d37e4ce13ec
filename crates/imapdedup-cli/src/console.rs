//! stdin/stdout console

use std::io::{self, IsTerminal, Write};

use imapdedup_core::{trim_line_ending, Console};

/// Console on the process's standard streams
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_line_ending(&line).to_string()))
    }

    fn read_hidden(&mut self) -> io::Result<String> {
        rpassword::read_password()
    }
}
