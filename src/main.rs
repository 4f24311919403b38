mod cleaner;
mod error;
mod format;
mod report;
mod scanner;
mod types;

use chrono::{DateTime, Local};
use clap::Parser;
use error::CleanupError;
use log::info;
use report::{ConsoleReporter, Event, Reporter};
use std::path::{Path, PathBuf};
use types::RunSummary;

#[derive(Parser, Debug)]
#[command(version, about = "Delete files not accessed for 30 minutes and report the space", long_about = None)]
struct Args {
    /// Directory to clean
    directory: Option<PathBuf>,

    /// Log every keep/delete decision to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(directory) = args.directory else {
        println!("Please specify the path to the target directory.");
        return;
    };

    let mut reporter = ConsoleReporter;
    match run(&directory, Local::now(), &mut reporter) {
        Ok(summary) => info!(
            "{} -> {} bytes; removed {} files ({} bytes), {} files left",
            summary.size_before,
            summary.size_after,
            summary.outcome.removed,
            summary.outcome.removed_bytes,
            summary.stats.deleted_files_count
        ),
        Err(e) => reporter.report(Event::Failed(&e)),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Measure, clean, collect stats, measure again.
///
/// The stats pass runs after cleanup, so the "Deleted files" and "Freed
/// space" lines describe the files that survived. The real deletion tally is
/// in `RunSummary::outcome`.
fn run(
    target: &Path,
    now: DateTime<Local>,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary, CleanupError> {
    check_target(target)?;
    let target = std::path::absolute(target).map_err(|e| CleanupError::from_io(target, e))?;
    let target = target.as_path();
    info!("cleaning {} (now = {})", target.display(), now);

    let size_before = scanner::compute_size(target, reporter);
    reporter.report(Event::SizeBefore(size_before));

    let outcome = cleaner::clean(target, now, reporter);

    let stats = scanner::compute_stats(target, reporter);
    reporter.report(Event::Stats(&stats));

    let size_after = scanner::compute_size(target, reporter);
    reporter.report(Event::SizeAfter(size_after));

    Ok(RunSummary {
        size_before,
        stats,
        size_after,
        outcome,
    })
}

fn check_target(target: &Path) -> Result<(), CleanupError> {
    match target.metadata() {
        Ok(m) if m.is_dir() => Ok(()),
        Ok(_) => Err(CleanupError::TargetNotFound(target.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CleanupError::TargetNotFound(target.to_path_buf()))
        }
        Err(e) => Err(CleanupError::from_io(target, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::RecordingReporter;
    use std::fs::{self, File, FileTimes};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_aged(path: &Path, len: usize, idle_for: Duration) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![b'x'; len]).unwrap();
        let then = SystemTime::now() - idle_for;
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_times(FileTimes::new().set_accessed(then).set_modified(then))
            .unwrap();
    }

    #[test]
    fn test_two_idle_one_fresh() {
        let tmp = TempDir::new().unwrap();
        let old_a = tmp.path().join("old_a.dat");
        let old_b = tmp.path().join("logs/old_b.dat");
        let fresh = tmp.path().join("fresh.dat");
        write_aged(&old_a, 2000, Duration::from_secs(2 * 3600));
        write_aged(&old_b, 3000, Duration::from_secs(45 * 60));
        write_aged(&fresh, 1500, Duration::from_secs(5 * 60));

        let mut rec = RecordingReporter::default();
        let summary = run(tmp.path(), Local::now(), &mut rec).unwrap();

        assert_eq!(summary.size_before, 6500);
        assert_eq!(summary.outcome.removed, 2);
        // Stats describe what is left, not what was removed
        assert_eq!(summary.stats.deleted_files_count, 1);
        assert_eq!(summary.stats.total_saved_space, 1500);
        assert_eq!(summary.size_after, 1500);

        assert_eq!(
            rec.lines,
            vec![
                "Directory size before cleanup: 6.35 KB".to_string(),
                format!("Deleted file: {}", old_a.display()),
                format!("Deleted file: {}", old_b.display()),
                "Deleted files: 1".to_string(),
                "Freed space: 1.46 KB".to_string(),
                "Directory size after cleanup: 1.46 KB".to_string(),
            ]
        );
    }

    #[test]
    fn test_nothing_idle() {
        let tmp = TempDir::new().unwrap();
        write_aged(&tmp.path().join("a"), 10, Duration::from_secs(60));
        write_aged(&tmp.path().join("b/c"), 20, Duration::from_secs(60));

        let mut rec = RecordingReporter::default();
        let summary = run(tmp.path(), Local::now(), &mut rec).unwrap();

        assert_eq!(summary.outcome.removed, 0);
        assert_eq!(summary.size_before, summary.size_after);
        assert!(rec.deleted().is_empty());
        assert_eq!(rec.lines.len(), 4);
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let mut rec = RecordingReporter::default();
        run(tmp.path(), Local::now(), &mut rec).unwrap();

        assert_eq!(
            rec.lines,
            vec![
                "Directory size before cleanup: 0 Bytes",
                "Deleted files: 0",
                "Freed space: 0 Bytes",
                "Directory size after cleanup: 0 Bytes",
            ]
        );
    }

    #[test]
    fn test_missing_target_halts() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let mut rec = RecordingReporter::default();

        let err = run(&missing, Local::now(), &mut rec).unwrap_err();
        assert!(matches!(err, CleanupError::TargetNotFound(_)));
        assert!(rec.lines.is_empty());
    }

    #[test]
    fn test_file_target_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, b"hi").unwrap();

        let mut rec = RecordingReporter::default();
        let err = run(&file, Local::now(), &mut rec).unwrap_err();
        assert_eq!(err.to_string(), format!("Directory '{}' does not exist.", file.display()));
        assert!(file.exists());
    }

    #[test]
    fn test_args_directory_is_optional() {
        let args = Args::try_parse_from(["idle_sweep"]).unwrap();
        assert!(args.directory.is_none());

        let args = Args::try_parse_from(["idle_sweep", "-v", "/tmp"]).unwrap();
        assert_eq!(args.directory, Some(PathBuf::from("/tmp")));
        assert!(args.verbose);
    }

    #[test]
    fn test_relative_target_reports_absolute_paths() {
        // Relative to the test's working directory
        let tmp = TempDir::new_in(".").unwrap();
        let relative = Path::new(".").join(tmp.path().file_name().unwrap());
        write_aged(&relative.join("old.dat"), 3, Duration::from_secs(3600));

        let mut rec = RecordingReporter::default();
        let summary = run(&relative, Local::now(), &mut rec).unwrap();
        assert_eq!(summary.outcome.removed, 1);

        let root = std::path::absolute(&relative).unwrap();
        let deleted = rec.deleted();
        assert_eq!(deleted.len(), 1);
        assert!(Path::new(deleted[0]).is_absolute());
        assert!(deleted[0].starts_with(&*root.to_string_lossy()));
        assert_eq!(deleted[0], root.join("old.dat").display().to_string());
    }
}
