//! Parsing of `[user[:password]@]host[:port]/folder` targets

use imapdedup_imap::{Security, ServerAddress};
use url::{Host, Url};

use crate::credentials::PartialCredentials;
use crate::{DedupError, DedupResult};

/// Server, folder and any credentials embedded in a target expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub server: ServerAddress,
    pub folder: String,
    pub credentials: PartialCredentials,
}

impl Target {
    /// Parse a target, filling in the default port for `security`
    pub fn parse(input: &str, security: Security) -> DedupResult<Self> {
        if has_dot_segment(input) {
            return Err(DedupError::Usage(format!(
                "folder in {:?} has a '.' or '..' segment",
                input
            )));
        }

        let url = Url::parse(&format!("imap://{}", input))
            .map_err(|e| DedupError::Usage(format!("invalid target {:?}: {}", input, e)))?;

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(DedupError::Usage(format!("missing host in {:?}", input))),
        };
        let port = url.port().unwrap_or_else(|| security.default_port());

        // '?' and '#' are legal in folder names; put them back
        let mut raw_folder = url.path().trim_start_matches('/').to_string();
        if let Some(query) = url.query() {
            raw_folder.push('?');
            raw_folder.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            raw_folder.push('#');
            raw_folder.push_str(fragment);
        }
        let folder = decode(&raw_folder)?;
        if folder.is_empty() {
            return Err(DedupError::Usage(format!("missing folder in {:?}", input)));
        }

        let username = match url.username() {
            "" => None,
            name => Some(decode(name)?),
        };
        let password = url.password().map(decode).transpose()?;

        Ok(Self {
            server: ServerAddress::new(host, port, security),
            folder,
            credentials: PartialCredentials { username, password },
        })
    }
}

/// URL parsing collapses `.` and `..` segments, which would open a different folder
fn has_dot_segment(input: &str) -> bool {
    let Some(start) = input.find(['/', '?', '#']) else {
        return false;
    };
    let path = input[start..].split(['?', '#']).next().unwrap_or_default();

    path.split('/').any(|segment| {
        let decoded = urlencoding::decode(segment).map(|s| s.into_owned()).unwrap_or_default();
        decoded == "." || decoded == ".."
    })
}

fn decode(component: &str) -> DedupResult<String> {
    urlencoding::decode(component)
        .map(|s| s.into_owned())
        .map_err(|e| DedupError::Usage(format!("invalid percent-encoding in {:?}: {}", component, e)))
}
