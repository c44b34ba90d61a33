//! Language adapter trait for the front ends.
//!
//! Each front end turns the text of one source file into a normalized
//! [`SyntaxNode<NodeKind>`] tree (see [`crate::tree`] for its shape). Adapters
//! are stateless and never touch the root document; the caller feeds the tree
//! to the [`ClassDocAssembler`](crate::assembler::ClassDocAssembler).
//!
//! # Errors
//!
//! Adapters report [`ParseError::Grammar`](crate::error::ParseError::Grammar)
//! for structural failures (including failures of any tree rewrite pass) and
//! [`ParseError::TokenStream`](crate::error::ParseError::TokenStream) for
//! lexical ones. Either way the file is skipped by the caller.

use std::fmt;

use serde::Serialize;

use crate::error::ParseResult;
use crate::tree::{NodeKind, SyntaxNode};

/// Source languages with a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// The primary language; its tree vocabulary is the normalized one.
    Groovy,
    /// The secondary language; its trees are rewritten into the primary
    /// vocabulary.
    Java,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Groovy => "groovy",
            Language::Java => "java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A language front end.
pub trait LanguageAdapter {
    /// The language this adapter parses.
    fn language(&self) -> Language;

    /// Whether this adapter is the natural choice for `file_name`, judged by
    /// name only.
    fn can_handle(&self, file_name: &str) -> bool;

    /// Parse one file into a normalized tree.
    ///
    /// `path` is only used for logging.
    fn parse(&self, path: &str, source: &str) -> ParseResult<SyntaxNode<NodeKind>>;
}
