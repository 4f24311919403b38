use crate::error::CleanupError;
use crate::format::format_bytes;
use crate::types::CleanupStats;
use colored::Colorize;
use std::path::Path;

#[derive(Debug)]
pub enum Event<'a> {
    SizeBefore(u64),
    Deleted(&'a Path),
    Failed(&'a CleanupError),
    Stats(&'a CleanupStats),
    SizeAfter(u64),
}

impl Event<'_> {
    /// Plain report lines for this event, without styling.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Event::SizeBefore(bytes) => {
                vec![format!("Directory size before cleanup: {}", format_bytes(*bytes))]
            }
            Event::Deleted(path) => vec![format!("Deleted file: {}", path.display())],
            Event::Failed(err) => vec![err.to_string()],
            Event::Stats(stats) => vec![
                format!("Deleted files: {}", stats.deleted_files_count),
                format!("Freed space: {}", format_bytes(stats.total_saved_space)),
            ],
            Event::SizeAfter(bytes) => {
                vec![format!("Directory size after cleanup: {}", format_bytes(*bytes))]
            }
        }
    }
}

/// Sink for everything the pipeline wants the user to see.
pub trait Reporter {
    fn report(&mut self, event: Event<'_>);
}

/// Writes every event to stdout, errors included.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: Event<'_>) {
        for line in event.lines() {
            match event {
                Event::SizeBefore(_) | Event::SizeAfter(_) => println!("{}", line.cyan()),
                Event::Deleted(_) => println!("{}", line.yellow()),
                Event::Failed(_) => println!("{}", line.red()),
                Event::Stats(_) => println!("{}", line.green()),
            }
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn errors(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.starts_with("Access error:") || l.starts_with("An error occurred:"))
            .count()
    }

    pub fn deleted(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.strip_prefix("Deleted file: "))
            .collect()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn report(&mut self, event: Event<'_>) {
        self.lines.extend(event.lines());
    }
}
