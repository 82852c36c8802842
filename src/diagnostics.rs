//! Analysis diagnostics and message collectors
//!
//! Problems found while building the semantic model never abort the
//! extraction. They are reported to a [`MessageCollector`], which by default
//! prints them to stderr.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Logging,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Logging => "logging",
        }
    }

    /// Verbose-only severities
    pub fn is_verbose(&self) -> bool {
        matches!(self, Self::Info | Self::Logging)
    }
}

/// Source position of a diagnostic (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// A single analysis message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            location: None,
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Logging,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, path: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        self.location = Some(Location {
            path: path.into(),
            line,
            column,
        });
        self
    }
}

/// How diagnostics are rendered to text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageRenderer {
    /// `path:line:column: severity: message`
    Plain,
    /// `line:column: severity: message`
    #[default]
    WithoutPaths,
}

impl MessageRenderer {
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let prefix = match (&diagnostic.location, self) {
            (Some(loc), Self::Plain) => {
                format!("{}:{}:{}: ", loc.path.display(), loc.line, loc.column)
            }
            (Some(loc), Self::WithoutPaths) => format!("{}:{}: ", loc.line, loc.column),
            (None, _) => String::new(),
        };
        format!(
            "{}{}: {}",
            prefix,
            diagnostic.severity.as_str(),
            diagnostic.message
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&MessageRenderer::Plain.render(self))
    }
}

/// Sink for analysis diagnostics
pub trait MessageCollector {
    fn report(&mut self, diagnostic: Diagnostic);

    fn has_errors(&self) -> bool;
}

/// Prints every diagnostic to a stream as it arrives
pub struct PrintingMessageCollector<W: Write> {
    stream: W,
    renderer: MessageRenderer,
    verbose: bool,
    has_errors: bool,
}

impl PrintingMessageCollector<io::Stderr> {
    pub fn stderr(renderer: MessageRenderer, verbose: bool) -> Self {
        Self::new(io::stderr(), renderer, verbose)
    }
}

impl<W: Write> PrintingMessageCollector<W> {
    pub fn new(stream: W, renderer: MessageRenderer, verbose: bool) -> Self {
        Self {
            stream,
            renderer,
            verbose,
            has_errors: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write> MessageCollector for PrintingMessageCollector<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Error {
            self.has_errors = true;
        }
        if diagnostic.severity.is_verbose() && !self.verbose {
            return;
        }
        // A broken diagnostics stream must not fail the analysis
        let _ = writeln!(self.stream, "{}", self.renderer.render(&diagnostic));
    }

    fn has_errors(&self) -> bool {
        self.has_errors
    }
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct CollectingMessageCollector {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingMessageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl MessageCollector for CollectingMessageCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}
