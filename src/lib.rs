//! Kotlin Mojo extractor: Maven plugin goal descriptors from Kotlin sources
//!
//! Kotlin sources are parsed with tree-sitter, resolved against the project's
//! classpath, and every class annotated with
//! `@org.apache.maven.plugins.annotations.Mojo` becomes a [`MojoDescriptor`]
//! whose parameters are the class's properties.
//!
//! # Example
//!
//! ```ignore
//! use mojo_extractor::{
//!     DefaultPluginToolsRequest, KotlinMojoDescriptorExtractor, MavenProject,
//!     MojoDescriptorExtractor,
//! };
//!
//! let project = MavenProject {
//!     dependency_artifacts: Vec::new(),
//!     compile_source_roots: vec!["src/main/kotlin".to_string()],
//! };
//! let request = DefaultPluginToolsRequest::new(project);
//! let descriptors = KotlinMojoDescriptorExtractor::new().execute(&request)?;
//! for mojo in &descriptors {
//!     println!("{} -> {}", mojo.goal, mojo.implementation);
//! }
//! ```

pub mod classpath;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod extractor;
pub mod indexing;
pub mod kdoc;
pub mod lang;
pub mod psi;
pub mod request;
pub mod resolve;
pub mod toon;

// Re-export commonly used types
pub use cli::{Cli, OutputFormat};
pub use config::AnalysisConfig;
pub use descriptor::{MojoDescriptor, Parameter};
pub use diagnostics::{
    CollectingMessageCollector, Diagnostic, MessageCollector, MessageRenderer,
    PrintingMessageCollector, Severity,
};
pub use environment::{ContentRoot, KotlinCoreEnvironment};
pub use error::{ExtractorError, Result};
pub use extractor::{
    extract_descriptors, KotlinMojoDescriptorExtractor, MojoDescriptorExtractor, MOJO_ANNOTATION,
};
pub use kdoc::process_doc;
pub use lang::KotlinLanguage;
pub use request::{Artifact, DefaultPluginToolsRequest, MavenProject, PluginToolsRequest};
pub use toon::encode_toon;
