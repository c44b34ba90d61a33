//! Java front end for grovedoc.
//!
//! Java sources are parsed into a native [`JavaKind`] tree and then brought
//! into the normalized vocabulary by two whole-tree passes, always in this
//! order:
//!
//! 1. [`remap`]: node type tags only, keyed on grammar token names.
//! 2. [`groovify`]: Java idioms rewritten into their Groovy equivalents.
//!
//! Either pass failing is reported as a grammar error for the file.

pub mod groovify;
pub mod kind;
pub mod parser;
pub mod remap;

use grovedoc_core::adapter::{Language, LanguageAdapter};
use grovedoc_core::error::ParseResult;
use grovedoc_core::tree::{NodeKind, SyntaxNode};
use tracing::debug;

pub use kind::JavaKind;
pub use remap::TokenNameTable;

/// Extensions handled by the Java front end. `.sourcefile` is an alias used
/// by test fixtures.
pub const EXTENSIONS: &[&str] = &["java", "sourcefile"];

/// Front end for Java sources.
#[derive(Debug, Clone)]
pub struct JavaAdapter {
    table: TokenNameTable,
}

impl JavaAdapter {
    pub fn new() -> Self {
        JavaAdapter {
            table: TokenNameTable::java(),
        }
    }

    /// Use a custom token-name table for the remap pass.
    pub fn with_table(table: TokenNameTable) -> Self {
        JavaAdapter { table }
    }
}

impl Default for JavaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn can_handle(&self, file_name: &str) -> bool {
        let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
        EXTENSIONS
            .iter()
            .any(|ext| base.strip_suffix(*ext).is_some_and(|stem| stem.ends_with('.')))
    }

    fn parse(&self, path: &str, source: &str) -> ParseResult<SyntaxNode<NodeKind>> {
        let native = parser::parse(source)?;
        let normalized = self.table.remap(native)?;
        let tree = groovify::groovify(normalized)?;
        debug!(path, nodes = tree.count(), "parsed java source");
        Ok(tree)
    }
}
