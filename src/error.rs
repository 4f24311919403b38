use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Directory '{}' does not exist.", .0.display())]
    TargetNotFound(PathBuf),

    #[error("Access error: {}: {source}", path.display())]
    AccessDenied { path: PathBuf, source: io::Error },

    #[error("An error occurred: {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl CleanupError {
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => CleanupError::AccessDenied { path, source },
            _ => CleanupError::Io { path, source },
        }
    }

    pub fn from_walk(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let source = match err.into_io_error() {
            Some(e) => e,
            // Only reachable when links are followed
            None => io::Error::other("filesystem loop detected"),
        };
        Self::from_io(&path, source)
    }
}
