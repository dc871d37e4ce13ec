//! IMAP message types

/// One message of the selected folder, identified by UID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Server-assigned UID (stable across expunges within one UIDVALIDITY)
    pub uid: u32,
    /// Raw header block as returned by `BODY.PEEK[HEADER]`
    pub header: Vec<u8>,
}

impl MessageRecord {
    pub fn new(uid: u32, header: impl Into<Vec<u8>>) -> Self {
        Self {
            uid,
            header: header.into(),
        }
    }
}

/// Encode UIDs as an IMAP sequence set, collapsing consecutive runs.
///
/// The input does not need to be sorted; duplicates are dropped.
/// `[7, 1, 2, 3, 9, 10]` becomes `"1:3,7,9:10"`.
pub fn uid_set(uids: &[u32]) -> String {
    let mut sorted = uids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts: Vec<String> = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let (mut start, mut end) = (first, first);
    for uid in iter {
        if uid == end + 1 {
            end = uid;
            continue;
        }
        parts.push(format_range(start, end));
        start = uid;
        end = uid;
    }
    parts.push(format_range(start, end));

    parts.join(",")
}

fn format_range(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}:{}", start, end)
    }
}
