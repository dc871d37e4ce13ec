//! Counts printed after the header scan

use serde::Serialize;

use crate::{Console, DedupResult, Deduplication};

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Summary of one folder scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub folder: String,
    pub total: usize,
    pub kept: usize,
    /// UIDs of the duplicates, in server order
    pub duplicates: Vec<u32>,
}

impl Report {
    pub fn new(folder: impl Into<String>, dedup: &Deduplication) -> Self {
        Self {
            folder: folder.into(),
            total: dedup.total,
            kept: dedup.kept.len(),
            duplicates: dedup.duplicates.as_slice().to_vec(),
        }
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Print the report in `format`
    pub fn write_to<C: Console>(&self, console: &mut C, format: ReportFormat) -> DedupResult<()> {
        match format {
            ReportFormat::Text => {
                console.write_line(&format!("Number of emails: {}", self.total))?;
                console.write_line(&format!("Emails kept: {}", self.kept))?;
                console.write_line(&format!("Emails to delete: {}", self.duplicate_count()))?;
            }
            ReportFormat::Json => {
                console.write_line(&serde_json::to_string(self)?)?;
            }
        }
        Ok(())
    }
}
