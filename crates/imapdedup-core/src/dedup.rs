//! Duplicate detection over fetched header blocks

use std::collections::HashMap;

use imapdedup_imap::MessageRecord;

/// First-seen UID for every distinct header block
#[derive(Debug, Default)]
pub struct DedupIndex<'a> {
    first_seen: HashMap<&'a [u8], u32>,
}

impl<'a> DedupIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `uid` under `header`. Returns the UID already holding that
    /// header, if any; in that case the index is left unchanged.
    pub fn insert(&mut self, header: &'a [u8], uid: u32) -> Option<u32> {
        match self.first_seen.get(header) {
            Some(&kept) => Some(kept),
            None => {
                self.first_seen.insert(header, uid);
                None
            }
        }
    }

    /// Number of distinct header blocks seen
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

/// UIDs slated for deletion, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSet(Vec<u32>);

impl DuplicateSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &u32> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    fn push(&mut self, uid: u32) {
        self.0.push(uid);
    }
}

/// Result of a dedup pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplication {
    /// Number of records examined
    pub total: usize,
    /// First occurrence of every distinct header, in server order
    pub kept: Vec<u32>,
    /// Every later occurrence, in server order
    pub duplicates: DuplicateSet,
}

/// Split `records` into kept and duplicate UIDs.
///
/// Headers are compared byte for byte. The record appearing first in
/// `records` wins, whatever its UID.
pub fn deduplicate(records: &[MessageRecord]) -> Deduplication {
    let mut index = DedupIndex::new();
    let mut result = Deduplication {
        total: records.len(),
        ..Deduplication::default()
    };

    for record in records {
        match index.insert(&record.header, record.uid) {
            None => result.kept.push(record.uid),
            Some(_) => result.duplicates.push(record.uid),
        }
    }

    result
}
