//! Analysis environment for one extraction call
//!
//! The environment owns everything a single analysis needs: the configured
//! content roots and the parsed source files. It is created per call and
//! dropped when the call returns; nothing is cached between calls.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::classpath::ClassPathIndex;
use crate::config::AnalysisConfig;
use crate::diagnostics::{Diagnostic, MessageCollector};
use crate::error::Result;
use crate::indexing::collect_files;
use crate::lang::KotlinLanguage;
use crate::psi::{build_file, KtFile};
use crate::resolve::{BindingContext, TopDownAnalyzer};

const UTF8_BOM: &str = "\u{feff}";

/// A root registered with the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRoot {
    /// Archive or class directory providing binary dependencies
    JvmClasspathRoot(PathBuf),
    /// Directory (or single file) of Kotlin sources
    KotlinSourceRoot(PathBuf),
}

pub struct KotlinCoreEnvironment {
    config: AnalysisConfig,
    content_roots: Vec<ContentRoot>,
    source_files: Vec<KtFile>,
}

impl KotlinCoreEnvironment {
    /// Parse every Kotlin file of the source roots.
    ///
    /// Unreadable files are reported and skipped. Only a parser that cannot
    /// be set up at all fails the call.
    pub fn create_for_production(
        config: AnalysisConfig,
        content_roots: Vec<ContentRoot>,
        collector: &mut dyn MessageCollector,
    ) -> Result<Self> {
        let mut parser = KotlinLanguage::parser()?;
        let mut source_files = Vec::new();

        for root in &content_roots {
            let ContentRoot::KotlinSourceRoot(root) = root else {
                continue;
            };
            if !root.exists() {
                debug!(root = %root.display(), "skipping missing source root");
                collector.report(Diagnostic::info(format!(
                    "Source root does not exist and is skipped: {}",
                    root.display()
                )));
                continue;
            }
            let paths = collect_files(root, KotlinLanguage::is_source_file);
            debug!(root = %root.display(), files = paths.len(), "collected source files");

            for path in paths {
                let source = match read_source(&path) {
                    Ok(source) => source,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable source file");
                        collector.report(Diagnostic::error(format!(
                            "Source file or directory not found or unreadable: {}",
                            path.display()
                        )));
                        continue;
                    }
                };
                let Some(tree) = parser.parse(&source, None) else {
                    collector.report(
                        Diagnostic::error("Failed to parse file").at(&path, 1, 1),
                    );
                    continue;
                };
                source_files.push(build_file(&path, &source, &tree));
            }
        }

        debug!(
            module = %config.module_name,
            roots = content_roots.len(),
            files = source_files.len(),
            "created analysis environment"
        );

        Ok(Self {
            config,
            content_roots,
            source_files,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn module_name(&self) -> &str {
        &self.config.module_name
    }

    pub fn source_files(&self) -> &[KtFile] {
        &self.source_files
    }

    pub fn content_roots(&self) -> &[ContentRoot] {
        &self.content_roots
    }

    pub fn classpath_roots(&self) -> impl Iterator<Item = &Path> {
        self.content_roots.iter().filter_map(|root| match root {
            ContentRoot::JvmClasspathRoot(path) => Some(path.as_path()),
            ContentRoot::KotlinSourceRoot(_) => None,
        })
    }

    /// Index the classpath and resolve all declarations of the module
    pub fn analyze(&self, collector: &mut dyn MessageCollector) -> BindingContext {
        let entries: Vec<PathBuf> = self.classpath_roots().map(Path::to_path_buf).collect();
        let classpath = ClassPathIndex::build(&entries, collector);
        debug!(entries = entries.len(), classes = classpath.len(), "indexed classpath");

        TopDownAnalyzer::new(&self.config, &classpath)
            .analyze_declarations(&self.source_files, collector)
    }
}

impl Drop for KotlinCoreEnvironment {
    fn drop(&mut self) {
        debug!(module = %self.config.module_name, "disposing analysis environment");
    }
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text.as_ref()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingMessageCollector;
    use crate::resolve::FqName;

    #[test]
    fn test_parses_source_roots_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::create_dir_all(first.path().join("b")).unwrap();
        fs::write(first.path().join("b/B.kt"), "package b\nclass B\n").unwrap();
        fs::write(first.path().join("A.kt"), "package a\nclass A\n").unwrap();
        fs::write(first.path().join("notes.txt"), "not kotlin").unwrap();
        fs::write(second.path().join("C.kt"), "package c\nclass C\n").unwrap();

        let mut collector = CollectingMessageCollector::new();
        let env = KotlinCoreEnvironment::create_for_production(
            AnalysisConfig::default(),
            vec![
                ContentRoot::KotlinSourceRoot(second.path().to_path_buf()),
                ContentRoot::KotlinSourceRoot(first.path().to_path_buf()),
            ],
            &mut collector,
        )
        .unwrap();

        let packages: Vec<&str> = env.source_files().iter().map(|f| f.package.as_str()).collect();
        assert_eq!(packages, vec!["c", "a", "b"]);
        assert_eq!(env.module_name(), "main");
    }

    #[test]
    fn test_bom_and_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = b"\xEF\xBB\xBFpackage bom\n// \xFF\nclass Bom\n".to_vec();
        bytes.push(b'\n');
        fs::write(dir.path().join("Bom.kt"), bytes).unwrap();

        let mut collector = CollectingMessageCollector::new();
        let env = KotlinCoreEnvironment::create_for_production(
            AnalysisConfig::default(),
            vec![ContentRoot::KotlinSourceRoot(dir.path().to_path_buf())],
            &mut collector,
        )
        .unwrap();

        assert_eq!(env.source_files()[0].package, "bom");
        let context = env.analyze(&mut collector);
        assert!(context.get(&FqName::from("bom.Bom")).is_some());
    }

    #[test]
    fn test_single_file_root_and_classpath_roots() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Single.kt");
        fs::write(&file, "class Single\n").unwrap();

        let mut collector = CollectingMessageCollector::new();
        let env = KotlinCoreEnvironment::create_for_production(
            AnalysisConfig::default(),
            vec![
                ContentRoot::JvmClasspathRoot(dir.path().join("missing.jar")),
                ContentRoot::KotlinSourceRoot(file),
            ],
            &mut collector,
        )
        .unwrap();

        assert_eq!(env.source_files().len(), 1);
        assert_eq!(env.classpath_roots().count(), 1);

        let context = env.analyze(&mut collector);
        assert!(context.get(&FqName::from("Single")).is_some());
        assert!(!collector.has_errors());
        assert_eq!(collector.diagnostics().len(), 1);
    }

    #[test]
    fn test_missing_source_root_is_info() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Kept.kt"), "class Kept\n").unwrap();

        let mut collector = CollectingMessageCollector::new();
        let env = KotlinCoreEnvironment::create_for_production(
            AnalysisConfig::default(),
            vec![
                ContentRoot::KotlinSourceRoot(dir.path().join("gone")),
                ContentRoot::KotlinSourceRoot(dir.path().to_path_buf()),
            ],
            &mut collector,
        )
        .unwrap();

        assert_eq!(env.source_files().len(), 1);
        assert!(!collector.has_errors());
        let diagnostic = &collector.diagnostics()[0];
        assert_eq!(diagnostic.severity, crate::diagnostics::Severity::Info);
        assert!(diagnostic.severity.is_verbose());
        assert!(diagnostic.message.ends_with("gone"));
    }
}
