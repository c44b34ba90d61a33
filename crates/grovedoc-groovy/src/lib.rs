//! Groovy front end for grovedoc.
//!
//! Groovy is the primary language: its trees are produced directly in the
//! normalized vocabulary, with no rewrite pass.

pub mod parser;

use grovedoc_core::adapter::{Language, LanguageAdapter};
use grovedoc_core::error::ParseResult;
use grovedoc_core::tree::{NodeKind, SyntaxNode};
use tracing::debug;

pub use parser::{parse, KEYWORDS};

/// File extensions that are unambiguously Groovy.
pub const EXTENSIONS: &[&str] = &["groovy", "gvy", "gy", "gsh"];

/// Front end for Groovy sources and scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroovyAdapter;

impl GroovyAdapter {
    pub fn new() -> Self {
        GroovyAdapter
    }
}

impl LanguageAdapter for GroovyAdapter {
    fn language(&self) -> Language {
        Language::Groovy
    }

    /// Groovy is the fallback: every name the other front ends and the
    /// description extractor do not claim.
    fn can_handle(&self, file_name: &str) -> bool {
        let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
        !(base.ends_with(".java") || base.ends_with(".sourcefile") || base == "package.html")
    }

    fn parse(&self, path: &str, source: &str) -> ParseResult<SyntaxNode<NodeKind>> {
        let tree = parser::parse(source)?;
        debug!(path, nodes = tree.count(), "parsed groovy source");
        Ok(tree)
    }
}
