//! Terminal capability used for prompts and reports

use std::io;

/// Line-oriented access to the user's terminal.
///
/// Abstracted so the workflow can be driven without a real terminal.
pub trait Console {
    /// Whether input comes from an interactive terminal (echo can be disabled)
    fn is_interactive(&self) -> bool;

    /// Write text as-is and flush it
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Read one line without its terminator; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Read one line with echo disabled
    fn read_hidden(&mut self) -> io::Result<String>;

    /// Write text followed by a newline
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }
}

/// Strip a trailing `\n` or `\r\n`
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
