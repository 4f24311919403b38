use crate::error::CleanupError;
use crate::report::{Event, Reporter};
use crate::types::{CleanupStats, FileEntry};
use chrono::{DateTime, Local};
use log::debug;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::{DirEntry, WalkDir};

type WalkItem = Result<FileEntry, CleanupError>;

/// Depth-first walk over every file below `root`.
///
/// Within a directory, files come before subdirectories, so a directory's
/// own files are handled before anything deeper. Each directory listing is
/// read in full before it is yielded, which makes it safe to delete the
/// yielded files while the walk is in progress. Links to files are yielded
/// with their target's size and access time; links to directories are not
/// followed, so every directory is visited once.
pub fn walk_files(root: &Path) -> impl Iterator<Item = WalkItem> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_map(|res| match res {
            Ok(entry) if entry.file_type().is_file() => Some(regular_file(&entry)),
            Ok(entry) if entry.file_type().is_symlink() => linked_file(entry.path()),
            Ok(_) => None,
            Err(e) => Some(Err(CleanupError::from_walk(e))),
        })
}

fn regular_file(entry: &DirEntry) -> WalkItem {
    let metadata = entry.metadata().map_err(CleanupError::from_walk)?;
    file_entry(entry.path(), &metadata)
}

fn linked_file(path: &Path) -> Option<WalkItem> {
    match fs::metadata(path) {
        Ok(m) if m.is_file() => Some(file_entry(path, &m)),
        Ok(_) => None,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("skipping dangling link {}", path.display());
            None
        }
        Err(e) => Some(Err(CleanupError::from_io(path, e))),
    }
}

fn file_entry(path: &Path, metadata: &Metadata) -> WalkItem {
    let accessed = metadata
        .accessed()
        .map_err(|e| CleanupError::from_io(path, e))?;
    let accessed = to_local(accessed).ok_or_else(|| {
        CleanupError::from_io(path, io::Error::other("access time out of range"))
    })?;

    Ok(FileEntry {
        path: path.to_path_buf(),
        size: metadata.len(),
        accessed,
    })
}

/// `None` when the filesystem stored a time chrono cannot represent.
#[must_use]
pub fn to_local(time: SystemTime) -> Option<DateTime<Local>> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(d) => (i64::try_from(d.as_secs()).ok()?, d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            let secs = i64::try_from(d.as_secs()).ok()?;
            match d.subsec_nanos() {
                0 => (-secs, 0),
                n => (-secs - 1, 1_000_000_000 - n),
            }
        }
    };
    DateTime::from_timestamp(secs, nanos).map(|t| t.with_timezone(&Local))
}

/// Total size of all files under `root`. Unreadable entries are reported
/// and count as zero.
pub fn compute_size(root: &Path, reporter: &mut dyn Reporter) -> u64 {
    let total = sum_sizes(walk_files(root), reporter);
    debug!("size of {}: {} bytes", root.display(), total);
    total
}

pub fn sum_sizes(items: impl Iterator<Item = WalkItem>, reporter: &mut dyn Reporter) -> u64 {
    items.fold(0u64, |acc, item| match item {
        Ok(entry) => acc + entry.size,
        Err(e) => {
            reporter.report(Event::Failed(&e));
            acc
        }
    })
}

#[must_use = "stats are the only result of the pass"]
pub fn compute_stats(root: &Path, reporter: &mut dyn Reporter) -> CleanupStats {
    let mut stats = CleanupStats::default();
    accumulate_stats(root, &mut stats, reporter);
    stats
}

/// Adds every file currently under `root` to `stats`.
pub fn accumulate_stats(root: &Path, stats: &mut CleanupStats, reporter: &mut dyn Reporter) {
    tally(walk_files(root), stats, reporter);
}

pub fn tally(
    items: impl Iterator<Item = WalkItem>,
    stats: &mut CleanupStats,
    reporter: &mut dyn Reporter,
) {
    for item in items {
        match item {
            Ok(entry) => stats.add(&entry),
            Err(e) => reporter.report(Event::Failed(&e)),
        }
    }
}
