//! Kotlin language identity and tree-sitter grammar loading

use std::path::Path;
use tree_sitter::{Language, Parser};

use crate::error::{ExtractorError, Result};

/// The analyzed source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KotlinLanguage;

impl KotlinLanguage {
    /// Language tag written into every descriptor
    pub const NAME: &'static str = "Kotlin";

    /// Extensions of analyzable source files. Scripts (`.kts`) are not part
    /// of a compilation unit and are left out.
    pub const EXTENSIONS: &'static [&'static str] = &["kt"];

    /// Check whether a path names a Kotlin source file
    pub fn is_source_file(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                Self::EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }

    /// Get the tree-sitter Language for parsing
    pub fn tree_sitter_language() -> Language {
        tree_sitter_kotlin_ng::LANGUAGE.into()
    }

    /// Create a parser configured for Kotlin
    pub fn parser() -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&Self::tree_sitter_language())
            .map_err(|e| ExtractorError::ParseFailure {
                message: format!("Failed to set language: {:?}", e),
            })?;
        Ok(parser)
    }
}
