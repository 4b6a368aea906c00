use std::path::Path;

use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;

use crate::engine::ScanOutcome;
use crate::grouping::Group;
use crate::util::{format_bytes, format_number, relative_to_root};

/// Statistics about duplicate files found
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateStats {
    /// Total number of files scanned
    pub total_files: usize,
    /// Number of groups with more than one file
    pub duplicate_groups: usize,
    /// Total number of files that are duplicates
    pub duplicate_files: usize,
    /// Total wasted space in bytes (could be reclaimed)
    pub wasted_bytes: u64,
    /// Files left out because they couldn't be hashed
    pub skipped_files: usize,
    /// Non-fatal errors hit during the scan
    pub errors: usize,
}

/// A group of duplicate files for output
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Name of the group's first file
    pub name: String,
    /// Size of the group's first file
    pub size: u64,
    /// Modification time of the group's first file
    pub modified: DateTime<Local>,
    /// Hex content digest, empty when content hashing is off
    pub digest: String,
    /// Paths to all duplicate files, relative to the scan root. Names that
    /// aren't valid UTF-8 are rendered lossily
    pub files: Vec<String>,
}

impl DuplicateGroup {
    fn from_group(group: &Group, root: &Path) -> Self {
        let first = group.representative();
        Self {
            name: first.name.to_string_lossy().into_owned(),
            size: first.size,
            modified: DateTime::<Local>::from(first.modified),
            digest: first
                .digest
                .map(|d| d.to_hex().to_string())
                .unwrap_or_default(),
            files: group
                .files()
                .iter()
                .map(|f| {
                    relative_to_root(&f.path, root)
                        .to_string_lossy()
                        .into_owned()
                })
                .collect(),
        }
    }
}

/// Complete report of duplicate findings
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub stats: DuplicateStats,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateReport {
    /// Build a report from the groups of a finished scan, keeping only groups
    /// with more than one file
    pub fn from_outcome(outcome: &ScanOutcome, root: &Path) -> Self {
        let mut groups = Vec::new();
        let mut wasted_bytes: u64 = 0;
        let mut duplicate_files: usize = 0;

        for group in outcome.store.groups().filter(|g| g.has_duplicates()) {
            let entry = DuplicateGroup::from_group(group, root);

            duplicate_files += entry.files.len();
            // Wasted space = size * (count - 1), since we keep one copy
            wasted_bytes += entry.size * (entry.files.len() - 1) as u64;

            groups.push(entry);
        }

        let stats = DuplicateStats {
            total_files: outcome.total_files,
            duplicate_groups: groups.len(),
            duplicate_files,
            wasted_bytes,
            skipped_files: outcome.skipped_files,
            errors: outcome.errors.len(),
        };

        Self { stats, groups }
    }

    /// Output as human-readable text: each group as a header line, its member
    /// paths, and a blank line; then a colored summary
    pub fn print_human(&self) {
        print!("{}", self.render_groups());

        println!("{}", "Duplicate Report".bold().underline());
        println!(
            "  Scanned: {} files",
            format_number(self.stats.total_files).cyan()
        );
        println!(
            "  Duplicate groups: {}",
            format_number(self.stats.duplicate_groups).cyan()
        );
        println!(
            "  Duplicate files: {}",
            format_number(self.stats.duplicate_files).cyan()
        );
        println!(
            "  Wasted space: {}",
            format_bytes(self.stats.wasted_bytes).yellow()
        );
        if self.stats.skipped_files > 0 || self.stats.errors > 0 {
            println!(
                "  Skipped: {} files ({} errors)",
                format_number(self.stats.skipped_files).red(),
                format_number(self.stats.errors).red()
            );
        }

        if self.groups.is_empty() {
            println!("\n{}", "No duplicates found.".green());
        }
    }

    fn render_groups(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            out.push_str(&format!(
                "{} {} {}",
                group.modified.format("%Y-%m-%d %H:%M:%S"),
                group.size,
                group.name
            ));
            if !group.digest.is_empty() {
                out.push(' ');
                out.push_str(&group.digest);
            }
            out.push('\n');

            for path in &group.files {
                out.push_str(&format!("  {}\n", path));
            }
            out.push('\n');
        }
        out
    }

    /// Output as JSON
    pub fn print_json(&self) -> serde_json::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        println!("{}", json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;
    use crate::grouping::GroupStore;
    use crate::scanner::FileRecord;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn record(path: &str, size: u64, content: Option<&[u8]>) -> FileRecord {
        let path = PathBuf::from(path);
        FileRecord {
            name: path.file_name().unwrap().to_os_string(),
            path,
            size,
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            digest: content.map(blake3::hash),
        }
    }

    fn outcome(records: Vec<FileRecord>) -> ScanOutcome {
        let mut store = GroupStore::new();
        let total_files = records.len();
        for r in records {
            let fingerprint = Fingerprint::NameSize {
                name: r.name.clone(),
                size: r.size,
            };
            store.insert(fingerprint, r);
        }
        ScanOutcome {
            store,
            total_files,
            skipped_files: 0,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_empty_report() {
        let report = DuplicateReport::from_outcome(&outcome(vec![]), Path::new("/root"));

        assert_eq!(report.stats.total_files, 0);
        assert_eq!(report.stats.duplicate_files, 0);
        assert_eq!(report.stats.wasted_bytes, 0);
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_single_member_groups_filtered() {
        let report = DuplicateReport::from_outcome(
            &outcome(vec![
                record("/root/a/x.txt", 5, None),
                record("/root/b/x.txt", 5, None),
                record("/root/solo.txt", 9, None),
            ]),
            Path::new("/root"),
        );

        assert_eq!(report.stats.total_files, 3);
        assert_eq!(report.stats.duplicate_groups, 1);
        assert_eq!(report.stats.duplicate_files, 2);
        assert_eq!(report.stats.wasted_bytes, 5);
        assert_eq!(report.groups[0].files, ["a/x.txt", "b/x.txt"]);
        assert_eq!(report.groups[0].name, "x.txt");
        assert!(report.groups[0].digest.is_empty());
    }

    #[test]
    fn test_digest_rendered_as_hex() {
        let report = DuplicateReport::from_outcome(
            &outcome(vec![
                record("/root/a/x.txt", 5, Some(b"hello")),
                record("/root/b/x.txt", 5, Some(b"hello")),
            ]),
            Path::new("/root"),
        );

        assert_eq!(
            report.groups[0].digest,
            blake3::hash(b"hello").to_hex().to_string()
        );
    }

    #[test]
    fn test_render_groups_layout() {
        let report = DuplicateReport::from_outcome(
            &outcome(vec![
                record("/root/a/x.txt", 5, None),
                record("/root/b/x.txt", 5, None),
            ]),
            Path::new("/root"),
        );

        let text = report.render_groups();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(" 5 x.txt"));
        assert_eq!(lines[1], "  a/x.txt");
        assert_eq!(lines[2], "  b/x.txt");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_report_json_serialization() {
        let report = DuplicateReport::from_outcome(
            &outcome(vec![
                record("/root/a.txt", 1024, None),
                record("/root/sub/a.txt", 1024, None),
            ]),
            Path::new("/root"),
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"total_files\":2"));
        assert!(json.contains("\"wasted_bytes\":1024"));
        assert!(json.contains("\"digest\":\"\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_serialize_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"bad\xff.txt");
        let records = ["/root/a", "/root/b"]
            .iter()
            .map(|dir| {
                let path = Path::new(dir).join(name);
                FileRecord {
                    name: name.to_os_string(),
                    path,
                    size: 3,
                    modified: SystemTime::UNIX_EPOCH,
                    digest: None,
                }
            })
            .collect();

        let report = DuplicateReport::from_outcome(&outcome(records), Path::new("/root"));

        assert_eq!(report.groups[0].files, ["a/bad\u{FFFD}.txt", "b/bad\u{FFFD}.txt"]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("a/bad\u{FFFD}.txt"));
    }
}
