//! Index of classes available on the compile classpath
//!
//! Binary dependency roots are only consulted for name resolution: a star
//! import or a default import is confirmed when the class it would resolve to
//! exists in some classpath entry. Class bodies are never read.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::diagnostics::{Diagnostic, MessageCollector};
use crate::error::{ExtractorError, Result};
use crate::indexing::collect_files;
use crate::resolve::FqName;

const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip"];

/// Fully-qualified names of the classes found in classpath entries
#[derive(Debug, Default, Clone)]
pub struct ClassPathIndex {
    classes: HashSet<FqName>,
}

impl ClassPathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every entry. Entries that are missing or unreadable are
    /// reported as warnings and skipped.
    pub fn build(entries: &[PathBuf], collector: &mut dyn MessageCollector) -> Self {
        let mut index = Self::new();
        for entry in entries {
            match index.index_entry(entry) {
                Ok(count) => debug!(entry = %entry.display(), classes = count, "indexed classpath entry"),
                Err(e) => {
                    warn!(entry = %entry.display(), error = %e, "skipping classpath entry");
                    collector.report(Diagnostic::warning(format!(
                        "Classpath entry points to a non-existent location or unreadable archive: {}",
                        entry.display()
                    )));
                }
            }
        }
        index
    }

    /// Index a single archive or class directory, returning the number of
    /// classes found
    pub fn index_entry(&mut self, path: &Path) -> Result<usize> {
        if path.is_dir() {
            return Ok(self.index_directory(path));
        }
        if !path.is_file() {
            return Err(ExtractorError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let is_archive = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ARCHIVE_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
            .unwrap_or(false);
        if !is_archive {
            return Ok(0);
        }
        self.index_archive(path)
    }

    fn index_archive(&mut self, path: &Path) -> Result<usize> {
        let classpath_error = |message: String| ExtractorError::ClassPath {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path)?;
        let archive = ZipArchive::new(file).map_err(|e| classpath_error(e.to_string()))?;

        let mut count = 0;
        for name in archive.file_names() {
            if let Some(class) = class_name_from_entry(name) {
                self.insert(class);
                count += 1;
            }
        }
        Ok(count)
    }

    fn index_directory(&mut self, root: &Path) -> usize {
        let files = collect_files(root, |p| {
            p.extension().and_then(|e| e.to_str()) == Some("class")
        });

        let mut count = 0;
        for file in files {
            let Ok(relative) = file.strip_prefix(root) else {
                continue;
            };
            let entry = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if let Some(class) = class_name_from_entry(&entry) {
                self.insert(class);
                count += 1;
            }
        }
        count
    }

    fn insert(&mut self, class: FqName) {
        self.classes.insert(class);
    }

    pub fn contains_class(&self, name: &FqName) -> bool {
        self.classes.contains(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// `org/example/Outer$Inner.class` -> `org.example.Outer.Inner`.
///
/// Metadata entries and anonymous or local classes (`Outer$1`) yield `None`.
pub fn class_name_from_entry(entry: &str) -> Option<FqName> {
    let stem = entry.strip_suffix(".class")?;
    if stem.starts_with("META-INF/") {
        return None;
    }
    let file_name = stem.rsplit('/').next().unwrap_or(stem);
    if file_name == "module-info" || file_name == "package-info" {
        return None;
    }

    let nested: Vec<&str> = file_name.split('$').collect();
    if nested
        .iter()
        .any(|part| part.is_empty() || part.starts_with(|c: char| c.is_ascii_digit()))
    {
        return None;
    }

    let package = stem[..stem.len() - file_name.len()].trim_end_matches('/');
    let package = FqName::new(package.replace('/', "."));
    Some(package.descendant(nested))
}
