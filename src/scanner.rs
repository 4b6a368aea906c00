use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::{Glob, GlobSet, GlobSetBuilder};
use jwalk::{DirEntry, WalkDir};

use crate::error::ScanError;
use crate::hasher::Digest;

/// Default bound on directory nesting below the traversal root.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// A file found during scanning
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Base name of the entry
    pub name: OsString,
    /// Path to the file, prefixed with the traversal root
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    /// Content digest, only filled in when content hashing is enabled
    pub digest: Option<Digest>,
}

/// Traversal options
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Directories at this depth are reported and not descended into
    pub max_depth: usize,
    /// Glob patterns matched against entry base names; matches are pruned
    pub exclude: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            exclude: Vec::new(),
        }
    }
}

/// Recursive directory walker. Symlinks are never followed or reported.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    max_depth: usize,
    excludes: GlobSet,
}

impl Walker {
    pub fn new(root: &Path, options: &WalkOptions) -> Result<Self, ScanError> {
        Ok(Self {
            root: root.to_path_buf(),
            max_depth: options.max_depth.max(1),
            excludes: build_excludes(&options.exclude)?,
        })
    }

    /// Start walking. The returned iterator is lazy and single-use.
    pub fn walk(&self) -> Walk {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Walk::failed(ScanError::DirectoryOpen {
                    path: self.root.clone(),
                    source: io::Error::from(io::ErrorKind::NotADirectory),
                });
            }
            Err(source) => {
                return Walk::failed(ScanError::DirectoryOpen {
                    path: self.root.clone(),
                    source,
                });
            }
        }

        let excludes = self.excludes.clone();
        let entries = WalkDir::new(&self.root)
            .skip_hidden(false)
            .follow_links(false) // Symlinks are skipped, never followed
            .sort(true)
            .max_depth(self.max_depth)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                if excludes.is_empty() {
                    return;
                }
                children.retain(|child| match child {
                    Ok(entry) if excludes.is_match(entry.file_name()) => {
                        log::trace!("Excluded: {}", entry.path().display());
                        false
                    }
                    _ => true,
                });
            })
            .into_iter();

        Walk {
            root: self.root.clone(),
            max_depth: self.max_depth,
            pending: None,
            entries: Some(Box::new(entries)),
        }
    }
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

type Entries = Box<dyn Iterator<Item = Result<DirEntry<((), ())>, jwalk::Error>>>;

/// Lazy sequence of file records produced by [`Walker::walk`].
///
/// Errors are yielded inline and never end the walk early; a directory that
/// cannot be listed simply contributes nothing.
pub struct Walk {
    root: PathBuf,
    max_depth: usize,
    pending: Option<ScanError>,
    entries: Option<Entries>,
}

impl Walk {
    fn failed(error: ScanError) -> Self {
        Self {
            root: PathBuf::new(),
            max_depth: 0,
            pending: Some(error),
            entries: None,
        }
    }
}

/// Map a jwalk failure to `DirectoryOpen`, keeping the io error kind so
/// vanished directories are still recognised as not found.
fn directory_error(root: &Path, error: jwalk::Error) -> ScanError {
    let path = error.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    let message = error.to_string();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    ScanError::DirectoryOpen { path, source }
}

impl Iterator for Walk {
    type Item = Result<FileRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        loop {
            let mut entry = match self.entries.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(error) => return Some(Err(directory_error(&self.root, error))),
            };

            // Listing failures are attached to the directory's own entry. A
            // symlinked root is read through, so check before skipping links.
            if let Some(error) = entry.read_children_error.take() {
                return Some(Err(directory_error(&self.root, error)));
            }

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                log::trace!("Skipping symlink: {}", entry.path().display());
                continue;
            }
            if file_type.is_dir() {
                if entry.depth > 0 && entry.depth >= self.max_depth {
                    return Some(Err(ScanError::DepthLimit {
                        path: entry.path(),
                        depth: entry.depth,
                    }));
                }
                continue;
            }

            if let Some(record) = file_record(&entry) {
                return Some(record);
            }
        }
    }
}

/// Stat a non-directory entry into a record. `None` if it turned into a
/// symlink since it was listed.
fn file_record(entry: &DirEntry<((), ())>) -> Option<Result<FileRecord, ScanError>> {
    let path = entry.path();

    let metadata = match fs::symlink_metadata(&path) {
        Ok(metadata) => metadata,
        Err(source) => return Some(Err(ScanError::Stat { path, source })),
    };
    if metadata.file_type().is_symlink() {
        return None;
    }

    let modified = match metadata.modified() {
        Ok(modified) => modified,
        Err(source) => return Some(Err(ScanError::Stat { path, source })),
    };

    Some(Ok(FileRecord {
        name: entry.file_name().to_os_string(),
        path,
        size: metadata.len(),
        modified,
        digest: None,
    }))
}
