use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::ScanError;
use crate::scanner::FileRecord;

/// Chunk size for streaming file contents into the hasher (64KB)
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Fixed-length content digest (BLAKE3, 32 bytes)
pub type Digest = blake3::Hash;

/// Compute the Blake3 hash of an entire file, reading it in chunks.
///
/// Only regular files are opened, so FIFOs and device nodes can't block the
/// run. A read that fails partway is an error; no digest is produced from a
/// truncated read.
pub fn hash_file(path: &Path) -> Result<Digest, ScanError> {
    let read_error = |source: io::Error| ScanError::Read {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::symlink_metadata(path).map_err(read_error)?;
    if !metadata.is_file() {
        return Err(read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let mut file = File::open(path).map_err(read_error)?;
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut hasher = blake3::Hasher::new();

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Hash every record in parallel, storing the digest on the record.
///
/// Records that fail to hash keep `digest: None`; their errors are returned in
/// record order.
pub fn hash_records(records: &mut [FileRecord], progress: &ProgressBar) -> Vec<ScanError> {
    records
        .par_iter_mut()
        .filter_map(|record| {
            let result = hash_file(&record.path);
            progress.inc(1);
            match result {
                Ok(digest) => {
                    record.digest = Some(digest);
                    None
                }
                Err(e) => Some(e),
            }
        })
        .collect()
}
