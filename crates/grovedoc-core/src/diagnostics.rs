//! Diagnostics collector for a documentation run.
//!
//! Skipped files and policy events are recorded here instead of being printed,
//! so a run has no hidden output side effects. The collector is passed
//! explicitly into every call that may report something; each entry is also
//! emitted as a `tracing` warning.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Category of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCategory {
    /// Structural parse failure; the file was skipped.
    Grammar,
    /// Lexical failure; the file was skipped.
    TokenStream,
    /// Package description markup failure; the description was left unchanged.
    Markup,
    /// A class replaced (or was refused in favor of) a class with the same
    /// qualified name.
    ClassCollision,
    /// A file name matched under more than one source root.
    AmbiguousSource,
}

impl DiagnosticCategory {
    /// Stable label used in logs and JSON output.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticCategory::Grammar => "grammar",
            DiagnosticCategory::TokenStream => "token-stream",
            DiagnosticCategory::Markup => "markup",
            DiagnosticCategory::ClassCollision => "class-collision",
            DiagnosticCategory::AmbiguousSource => "ambiguous-source",
        }
    }

    /// Whether a diagnostic of this category means the file was skipped.
    pub fn skips_file(&self) -> bool {
        matches!(
            self,
            DiagnosticCategory::Grammar
                | DiagnosticCategory::TokenStream
                | DiagnosticCategory::Markup
                | DiagnosticCategory::AmbiguousSource
        )
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Relative file name the diagnostic is about.
    pub file: String,
    pub category: DiagnosticCategory,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ignored {} ({}): {}", self.file, self.category, self.message)
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn report(
        &mut self,
        file: impl Into<String>,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            file: file.into(),
            category,
            message: message.into(),
        };
        warn!(
            file = %diagnostic.file,
            category = %diagnostic.category,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    /// All entries in report order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose category means the file was skipped.
    pub fn skipped_files(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.category.skips_file())
    }

    /// Entries of one category.
    pub fn of_category(&self, category: DiagnosticCategory) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.category == category)
    }

    /// Append all entries of another collector.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}
