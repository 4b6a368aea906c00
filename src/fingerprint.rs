use std::ffi::OsString;
use std::time::SystemTime;

use crate::hasher::Digest;
use crate::scanner::FileRecord;

/// Which file properties make up the grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerprintConfig {
    pub use_mod_time: bool,
    pub use_content_hash: bool,
}

/// Identity key two files must share to count as duplicates.
///
/// Compared structurally: names byte-for-byte, sizes and timestamps exactly,
/// digests over all 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Default mode, no file contents read
    NameSize { name: OsString, size: u64 },
    NameSizeTime {
        name: OsString,
        size: u64,
        modified: SystemTime,
    },
    /// Content only, so identical bytes match regardless of name
    Content(Digest),
    Full {
        name: OsString,
        size: u64,
        modified: SystemTime,
        digest: Digest,
    },
}

impl Fingerprint {
    /// Build the key for `record` under `config`.
    ///
    /// Returns `None` when content hashing is enabled but the record has no
    /// digest (it couldn't be read), so it can't be placed in any group.
    pub fn build(record: &FileRecord, config: &FingerprintConfig) -> Option<Self> {
        let name = record.name.clone();
        let size = record.size;
        let modified = record.modified;

        let fingerprint = match (config.use_mod_time, config.use_content_hash) {
            (false, false) => Self::NameSize { name, size },
            (true, false) => Self::NameSizeTime {
                name,
                size,
                modified,
            },
            (false, true) => Self::Content(record.digest?),
            (true, true) => Self::Full {
                name,
                size,
                modified,
                digest: record.digest?,
            },
        };

        Some(fingerprint)
    }
}
