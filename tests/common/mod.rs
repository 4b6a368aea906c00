#![allow(dead_code)]

use assert_cmd::cargo;
use std::fs;
use std::path::Path;

pub fn dupscan() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("dupscan"));
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn create_file(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn set_mtime(dir: &Path, name: &str, secs: i64) {
    let time = filetime::FileTime::from_unix_time(secs, 0);
    filetime::set_file_mtime(dir.join(name), time).unwrap();
}

/// Run with `--format json` plus `args`, returning the parsed report
pub fn scan_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = dupscan()
        .arg(dir)
        .args(args)
        .arg("--format")
        .arg("json")
        .arg("--no-progress")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("Invalid JSON output")
}

/// Sorted member paths of every reported group
pub fn group_files(json: &serde_json::Value) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = json["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| {
            let mut files: Vec<String> = g["files"]
                .as_array()
                .unwrap()
                .iter()
                .map(|f| f.as_str().unwrap().to_string())
                .collect();
            files.sort();
            files
        })
        .collect();
    groups.sort();
    groups
}
