use std::path::Path;

use crate::error::ScanError;
use crate::fingerprint::{Fingerprint, FingerprintConfig};
use crate::grouping::GroupStore;
use crate::hasher;
use crate::progress;
use crate::scanner::{FileRecord, WalkOptions, Walker};

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub fingerprint: FingerprintConfig,
    pub walk: WalkOptions,
    pub progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            fingerprint: FingerprintConfig::default(),
            walk: WalkOptions::default(),
            progress: true,
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct ScanOutcome {
    pub store: GroupStore,
    /// Files discovered by the walk, grouped or not
    pub total_files: usize,
    /// Files left out of grouping because their content couldn't be hashed
    pub skipped_files: usize,
    /// Non-fatal errors, in the order they occurred
    pub errors: Vec<ScanError>,
}

/// Walk `root`, fingerprint every file and group them.
///
/// Only an invalid configuration fails the run. Unreadable directories,
/// entries that can't be stat'ed and files that can't be hashed are logged,
/// collected in [`ScanOutcome::errors`] and left out.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanOutcome, ScanError> {
    let walker = Walker::new(root, &options.walk)?;
    let mut errors = Vec::new();

    // Stage 1: walk the tree
    let spinner = progress::walk_spinner(options.progress);
    let mut records: Vec<FileRecord> = Vec::new();
    for item in walker.walk() {
        match item {
            Ok(record) => {
                spinner.inc(1);
                records.push(record);
            }
            Err(e) => {
                report(&e);
                errors.push(e);
            }
        }
    }
    spinner.finish_and_clear();

    let total_files = records.len();
    log::info!("Found {} files under {}", total_files, root.display());

    // Stage 2: content digests, when the key needs them
    if options.fingerprint.use_content_hash {
        let bar = progress::hash_bar(options.progress, total_files as u64);
        for e in hasher::hash_records(&mut records, &bar) {
            report(&e);
            errors.push(e);
        }
        bar.finish_and_clear();
    }

    // Stage 3: group by fingerprint
    let mut store = GroupStore::new();
    let mut skipped_files = 0;
    for record in records {
        match Fingerprint::build(&record, &options.fingerprint) {
            Some(fingerprint) => store.insert(fingerprint, record),
            None => {
                log::debug!("Not grouped (no digest): {}", record.path.display());
                skipped_files += 1;
            }
        }
    }

    if store.is_empty() {
        log::info!("Nothing to group under {}", root.display());
    } else {
        log::info!(
            "Grouped {} files into {} groups ({} skipped)",
            store.file_count(),
            store.len(),
            skipped_files
        );
    }

    Ok(ScanOutcome {
        store,
        total_files,
        skipped_files,
        errors,
    })
}

fn report(error: &ScanError) {
    // Entries vanishing from a live filesystem are expected
    match error.path() {
        Some(path) if error.is_not_found() => {
            log::debug!("Vanished during scan: {}", path.display())
        }
        _ => log::warn!("{}", error),
    }
}
