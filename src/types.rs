use chrono::{DateTime, Local};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub accessed: DateTime<Local>,
}

/// Running totals filled by the stats pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupStats {
    pub deleted_files_count: u64,
    pub total_saved_space: u64,
}

impl CleanupStats {
    pub fn add(&mut self, entry: &FileEntry) {
        self.deleted_files_count += 1;
        self.total_saved_space += entry.size;
    }
}

/// What the cleaner actually removed during a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanOutcome {
    pub removed: u64,
    pub removed_bytes: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub size_before: u64,
    pub stats: CleanupStats,
    pub size_after: u64,
    pub outcome: CleanOutcome,
}
