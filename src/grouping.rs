use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::fingerprint::Fingerprint;
use crate::scanner::FileRecord;

/// Files sharing one fingerprint, in insertion order.
#[derive(Debug, Clone)]
pub struct Group {
    files: Vec<FileRecord>,
}

impl Group {
    /// First file inserted under this fingerprint, used for summaries.
    pub fn representative(&self) -> &FileRecord {
        // Groups are only created together with their first file
        &self.files[0]
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }
}

/// Mapping from fingerprint to the group of files that share it.
///
/// Groups live in a `Vec` in creation order; a hash index maps each
/// fingerprint to its slot so inserts don't scan existing groups. Single-member
/// groups are kept: filtering to duplicates is up to the caller.
#[derive(Debug, Default)]
pub struct GroupStore {
    index: HashMap<Fingerprint, usize>,
    groups: Vec<Group>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the group for `fingerprint`, creating it on first use.
    pub fn insert(&mut self, fingerprint: Fingerprint, record: FileRecord) {
        match self.index.entry(fingerprint) {
            Entry::Occupied(slot) => self.groups[*slot.get()].files.push(record),
            Entry::Vacant(slot) => {
                slot.insert(self.groups.len());
                self.groups.push(Group {
                    files: vec![record],
                });
            }
        }
    }

    /// Every group, in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Number of distinct fingerprints seen.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of files across all groups.
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}
