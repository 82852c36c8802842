//! Error types for descriptor extraction
//!
//! Analysis problems in the Kotlin sources themselves (syntax errors, unresolved
//! references) are diagnostics, not errors. Only failures that make the whole
//! extraction meaningless end up here.

use std::process::ExitCode;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Errors that abort an extraction call
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A path handed to the CLI does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The Kotlin grammar could not be loaded into the parser
    #[error("Parse failure: {message}")]
    ParseFailure { message: String },

    /// A classpath archive could not be read
    #[error("Cannot read classpath entry {path}: {message}")]
    ClassPath { path: String, message: String },

    /// Invalid analysis configuration file
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A `@Mojo` annotation was resolved without its required `name` argument
    #[error("@Mojo annotation on {class} has no `name` argument")]
    MissingGoalName { class: String },

    /// Output encoding failed
    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

impl ExtractorError {
    /// Process exit code for the CLI
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(2),
            Self::Config { .. } => ExitCode::from(3),
            Self::MissingGoalName { .. } => ExitCode::from(4),
            Self::Io(_) | Self::ClassPath { .. } => ExitCode::from(5),
            Self::ParseFailure { .. } | Self::Serialization { .. } => ExitCode::from(1),
        }
    }
}
