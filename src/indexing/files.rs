//! File collection utilities
//!
//! This module provides functions for recursively collecting files from a
//! root, with filtering by a caller-supplied predicate.

use std::fs;
use std::path::{Path, PathBuf};

/// Collect all files under `root` accepted by `accept`.
///
/// A root that is itself a file is returned as-is when accepted. Unreadable
/// directories are skipped silently. The result is sorted by path.
pub fn collect_files<F>(root: &Path, accept: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();
    if root.is_file() {
        if accept(root) {
            files.push(root.to_path_buf());
        }
        return files;
    }
    collect_files_recursive(root, &accept, &mut files);
    files.sort();
    files
}

fn collect_files_recursive<F>(dir: &Path, accept: &F, files: &mut Vec<PathBuf>)
where
    F: Fn(&Path) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if should_skip_path(&path) {
            continue;
        }

        if path.is_dir() {
            collect_files_recursive(&path, accept, files);
        } else if path.is_file() && accept(&path) {
            files.push(path);
        }
    }
}

/// Check if a path should be skipped during file collection.
///
/// Only hidden files and directories (starting with '.') are skipped:
/// generated sources commonly live under `target/` or `build/`.
pub fn should_skip_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
