//! Analysis configuration
//!
//! Every setting has a default, so an extraction works without any
//! configuration file. A TOML file can override individual keys:
//!
//! ```toml
//! jvm-target = "1.8"
//! language-version = "2.0"
//! module-name = "my-plugin"
//! report-perf = true
//! message-renderer = "plain"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::MessageRenderer;
use crate::error::{ExtractorError, Result};

/// Bytecode target the sources are analyzed for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JvmTarget {
    #[default]
    #[serde(rename = "1.6")]
    Jvm1_6,
    #[serde(rename = "1.8")]
    Jvm1_8,
    #[serde(rename = "11")]
    Jvm11,
    #[serde(rename = "17")]
    Jvm17,
    #[serde(rename = "21")]
    Jvm21,
}

impl JvmTarget {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Jvm1_6 => "1.6",
            Self::Jvm1_8 => "1.8",
            Self::Jvm11 => "11",
            Self::Jvm17 => "17",
            Self::Jvm21 => "21",
        }
    }
}

/// Kotlin language version the sources are analyzed with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageVersion {
    #[serde(rename = "1.9")]
    Kotlin1_9,
    #[serde(rename = "2.0")]
    Kotlin2_0,
    #[serde(rename = "2.1")]
    Kotlin2_1,
    #[default]
    #[serde(rename = "latest")]
    Latest,
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self {
            Self::Kotlin1_9 => "1.9",
            Self::Kotlin2_0 => "2.0",
            Self::Kotlin2_1 => "2.1",
            Self::Latest => "latest",
        };
        f.write_str(version)
    }
}

/// Settings for one analysis environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    pub jvm_target: JvmTarget,
    pub language_version: LanguageVersion,
    pub module_name: String,
    /// Allow sources to declare classes in the reserved `kotlin` package
    pub allow_kotlin_package: bool,
    /// Report analysis timing
    pub report_perf: bool,
    pub message_renderer: MessageRenderer,
    /// Print info/logging diagnostics too
    pub verbose: bool,
}

/// Module name used when none is configured
pub const DEFAULT_MODULE_NAME: &str = "main";

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            jvm_target: JvmTarget::default(),
            language_version: LanguageVersion::default(),
            module_name: DEFAULT_MODULE_NAME.to_string(),
            allow_kotlin_package: false,
            report_perf: false,
            message_renderer: MessageRenderer::default(),
            verbose: false,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExtractorError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ExtractorError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.jvm_target, JvmTarget::Jvm1_6);
        assert_eq!(config.language_version, LanguageVersion::Latest);
        assert_eq!(config.module_name, "main");
        assert!(!config.allow_kotlin_package);
        assert_eq!(config.message_renderer, MessageRenderer::WithoutPaths);
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_toml_str(
            r#"
jvm-target = "17"
report-perf = true
message-renderer = "plain"
"#,
        )
        .unwrap();
        assert_eq!(config.jvm_target, JvmTarget::Jvm17);
        assert!(config.report_perf);
        assert_eq!(config.message_renderer, MessageRenderer::Plain);
        assert_eq!(config.module_name, "main");
    }

    #[test]
    fn test_invalid_value() {
        let err = AnalysisConfig::from_toml_str("jvm-target = \"1.2\"").unwrap_err();
        assert!(matches!(err, ExtractorError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "module-name = \"plugin\"").unwrap();
        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.module_name, "plugin");
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalysisConfig::load(Path::new("/nonexistent/extractor.toml")).unwrap_err();
        assert!(matches!(err, ExtractorError::FileNotFound { .. }));
    }
}
