//! Confirmation before anything is deleted

use crate::{Console, DedupResult};

/// The user's answer to the deletion prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Declined,
}

/// Ask whether `count` messages in `folder` may be deleted.
///
/// Only a bare `y` or `Y` proceeds. Anything else, including `yes`, an
/// empty line or end of input, declines.
pub fn confirm_deletion<C: Console>(
    console: &mut C,
    count: usize,
    folder: &str,
) -> DedupResult<Confirmation> {
    let plural = if count == 1 { "" } else { "s" };
    console.write(&format!(
        "This will delete {} message{} in {}. Do you wish to continue? (y/N) ",
        count, plural, folder
    ))?;

    let answer = console.read_line()?;
    Ok(match answer.as_deref() {
        Some("y") | Some("Y") => Confirmation::Proceed,
        _ => Confirmation::Declined,
    })
}
