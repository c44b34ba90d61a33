//! File-name based dispatch.
//!
//! Each input file takes exactly one path, chosen from its name alone:
//!
//! | Name                 | Path                   |
//! |----------------------|------------------------|
//! | `*.java`             | Java front end         |
//! | `*.sourcefile`       | Java front end         |
//! | `package.html`       | description extractor  |
//! | anything else        | Groovy front end       |
//!
//! The rules are checked in that order, on the last path component.

use grovedoc_core::adapter::{Language, LanguageAdapter};
use grovedoc_core::error::ParseResult;
use grovedoc_core::tree::{NodeKind, SyntaxNode};
use grovedoc_groovy::GroovyAdapter;
use grovedoc_java::JavaAdapter;

/// Reserved name of a package description file.
pub const PACKAGE_DESCRIPTION_FILE: &str = "package.html";

/// Where a file goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Source code for one of the front ends.
    Source(Language),
    /// A package description file.
    Description,
}

impl SourceKind {
    pub fn classify(file_name: &str) -> Self {
        let base = base_name(file_name);
        if base.ends_with(".java") || base.ends_with(".sourcefile") {
            SourceKind::Source(Language::Java)
        } else if base == PACKAGE_DESCRIPTION_FILE {
            SourceKind::Description
        } else {
            SourceKind::Source(Language::Groovy)
        }
    }
}

/// Last component of a relative name, with either separator.
pub fn base_name(file_name: &str) -> &str {
    file_name.rsplit(['/', '\\']).next().unwrap_or(file_name)
}

/// Both front ends, selected by language.
#[derive(Debug, Clone, Default)]
pub struct FrontEnds {
    groovy: GroovyAdapter,
    java: JavaAdapter,
}

impl FrontEnds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adapter(&self, language: Language) -> &dyn LanguageAdapter {
        match language {
            Language::Groovy => &self.groovy,
            Language::Java => &self.java,
        }
    }

    /// Parse `source` with the front end for `language`.
    pub fn parse(
        &self,
        language: Language,
        file_name: &str,
        source: &str,
    ) -> ParseResult<SyntaxNode<NodeKind>> {
        self.adapter(language).parse(file_name, source)
    }
}
