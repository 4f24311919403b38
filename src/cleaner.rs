use crate::error::CleanupError;
use crate::report::{Event, Reporter};
use crate::scanner::walk_files;
use crate::types::{CleanOutcome, FileEntry};
use chrono::{DateTime, Local, TimeDelta};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Files not accessed for longer than this many minutes are removed.
pub const IDLE_MINUTES: i64 = 30;

#[must_use]
pub fn is_idle(entry: &FileEntry, now: DateTime<Local>) -> bool {
    now.signed_duration_since(entry.accessed) > TimeDelta::minutes(IDLE_MINUTES)
}

/// Deletes every idle file under `root`. `now` is taken once by the caller
/// so the whole tree is judged against the same instant.
pub fn clean(root: &Path, now: DateTime<Local>, reporter: &mut dyn Reporter) -> CleanOutcome {
    let mut outcome = CleanOutcome::default();

    for item in walk_files(root) {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                reporter.report(Event::Failed(&e));
                outcome.failed += 1;
                continue;
            }
        };

        if !is_idle(&entry, now) {
            debug!("keeping {} (accessed {})", entry.path.display(), entry.accessed);
            continue;
        }

        match fs::remove_file(&entry.path) {
            Ok(()) => {
                reporter.report(Event::Deleted(&entry.path));
                outcome.removed += 1;
                outcome.removed_bytes += entry.size;
            }
            Err(e) => {
                let err = CleanupError::from_io(&entry.path, e);
                reporter.report(Event::Failed(&err));
                outcome.failed += 1;
            }
        }
    }

    info!(
        "removed {} files ({} bytes) under {}, {} failures",
        outcome.removed,
        outcome.removed_bytes,
        root.display(),
        outcome.failed
    );
    outcome
}
