//! Username/password resolution for LOGIN

use std::fmt;

use tracing::debug;

use crate::{Console, DedupResult};

/// Credentials as far as the target expression supplied them
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartialCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for PartialCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Complete LOGIN credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fill in whatever the target left out by prompting on `console`.
///
/// The password is read with echo disabled when the console is interactive
/// and as a plain line otherwise. End of input yields an empty value and
/// leaves the verdict to the server.
pub fn resolve_credentials<C: Console>(
    partial: &PartialCredentials,
    console: &mut C,
) -> DedupResult<Credentials> {
    let username = match partial.username.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            console.write("Username: ")?;
            console.read_line()?.unwrap_or_default()
        }
    };

    let password = match partial.password.as_deref() {
        Some(password) if !password.is_empty() => password.to_string(),
        _ => {
            console.write("Password: ")?;
            if console.is_interactive() {
                debug!("Reading password with echo disabled");
                let password = console.read_hidden()?;
                console.write("\n")?;
                password
            } else {
                debug!("Input is not a terminal, reading password as a plain line");
                console.read_line()?.unwrap_or_default()
            }
        }
    };

    Ok(Credentials { username, password })
}
