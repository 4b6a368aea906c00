use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while walking, stating or hashing files.
///
/// Everything except [`ScanError::InvalidPattern`] is non-fatal: the engine
/// records the error, skips the affected entry (or subtree) and keeps going.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// A directory could not be listed. Its subtree contributes no files.
    #[error("cannot open directory {}: {source}", .path.display())]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Metadata for a directory entry could not be read.
    #[error("cannot stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be opened or fully read while hashing.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory sits at the traversal depth bound and was not descended.
    #[error("depth limit {depth} reached at {}, not descending", .path.display())]
    DepthLimit { path: PathBuf, depth: usize },

    /// An exclusion glob failed to compile.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl ScanError {
    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DirectoryOpen { path, .. }
            | Self::Stat { path, .. }
            | Self::Read { path, .. }
            | Self::DepthLimit { path, .. } => Some(path),
            Self::InvalidPattern { .. } => None,
        }
    }

    /// True when the underlying cause is an entry that disappeared mid-walk.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::DirectoryOpen { source, .. }
            | Self::Stat { source, .. }
            | Self::Read { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
