//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use std::env;
use std::path::PathBuf;

use crate::request::{Artifact, MavenProject};

/// Maven plugin goal descriptor extractor for Kotlin sources
#[derive(Parser, Debug)]
#[command(name = "mojo-extractor")]
#[command(about = "Extracts Maven plugin goal descriptors from @Mojo-annotated Kotlin classes")]
#[command(version)]
pub struct Cli {
    /// Classpath entry (jar or class directory); may be a path-separator joined list
    #[arg(short = 'c', long = "classpath", value_name = "PATH", env = "MOJO_EXTRACTOR_CLASSPATH")]
    pub classpath: Vec<String>,

    /// Kotlin source root; missing roots are skipped
    #[arg(short = 's', long = "source-root", value_name = "DIR")]
    pub source_roots: Vec<String>,

    /// Analysis configuration file (TOML)
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json", value_enum)]
    pub format: OutputFormat,

    /// Print informational diagnostics and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON - standard JSON output
    #[default]
    Json,
    /// TOON (Token-Oriented Object Notation) - token-efficient format
    Toon,
}

impl Cli {
    /// Classpath entries with path-separator lists expanded
    pub fn classpath_entries(&self) -> Vec<PathBuf> {
        self.classpath
            .iter()
            .flat_map(|entry| env::split_paths(entry).collect::<Vec<_>>())
            .filter(|path| !path.as_os_str().is_empty())
            .collect()
    }

    /// The project the command line describes. Every classpath entry becomes
    /// a dependency artifact backed by that file.
    pub fn project(&self) -> MavenProject {
        let dependency_artifacts = self
            .classpath_entries()
            .into_iter()
            .map(|path| {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Artifact::new("cp", &format!("cp-{}", file_name), "1.0").with_file(path)
            })
            .collect();

        MavenProject {
            dependency_artifacts,
            compile_source_roots: self.source_roots.clone(),
        }
    }
}
