//! Common test utilities and fixtures for mojo-extractor integration tests
//!
//! This module provides:
//! - `TestProject` builder for laying out Kotlin source roots on disk
//! - Helpers for running an extraction with collected diagnostics

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use mojo_extractor::{
    CollectingMessageCollector, KotlinMojoDescriptorExtractor, MojoDescriptor, Result,
};

/// Directory holding the checked-in fixture source roots
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// A temporary directory with Kotlin sources and classpath entries
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root, creating parent directories
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        self
    }

    /// Write a jar whose entries are the given class files
    pub fn with_jar(self, relative: &str, classes: &[&str]) -> Self {
        let path = self.dir.path().join(relative);
        let mut writer = ZipWriter::new(fs::File::create(&path).expect("create jar"));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for class in classes {
            writer.start_file(*class, options).expect("start entry");
            writer.write_all(b"\xCA\xFE\xBA\xBE").expect("write entry");
        }
        writer.finish().expect("finish jar");
        self
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// Run an extraction and keep its diagnostics
pub fn extract_with_diagnostics(
    classpath: &[PathBuf],
    source_roots: &[PathBuf],
) -> (Result<Vec<MojoDescriptor>>, CollectingMessageCollector) {
    let mut collector = CollectingMessageCollector::new();
    let result = KotlinMojoDescriptorExtractor::new().analyze_with_collector(
        classpath,
        source_roots,
        &mut collector,
    );
    (result, collector)
}
