//! Structural remap: Java node types -> normalized node types.
//!
//! The remap is keyed on grammar token names. A Java token name maps to the
//! primary node type with the same name, unless an alias says otherwise. Only
//! the type tags change; the tree keeps its shape.

use std::collections::BTreeMap;

use grovedoc_core::error::{ParseError, ParseResult};
use grovedoc_core::tree::{NodeKind, NodeType, SyntaxNode};

use crate::kind::JavaKind;

/// Java token names whose primary counterpart is spelled differently.
const ALIASES: &[(&str, &str)] = &[("CTOR_DEF", "CTOR_IDENT")];

/// Token-name lookup table from one grammar's vocabulary to the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNameTable {
    entries: BTreeMap<&'static str, NodeKind>,
    missing: Vec<&'static str>,
}

impl TokenNameTable {
    /// Build a table for the exported token names of a grammar.
    ///
    /// Names with no primary counterpart are remembered so that the remap can
    /// fail with a precise message if such a node ever shows up.
    pub fn new(
        token_names: impl IntoIterator<Item = &'static str>,
        aliases: &[(&str, &str)],
    ) -> Self {
        let mut entries = BTreeMap::new();
        let mut missing = Vec::new();
        for name in token_names {
            let target = aliases
                .iter()
                .find(|(from, _)| *from == name)
                .map_or(name, |(_, to)| *to);
            match NodeKind::from_token_name(target) {
                Some(kind) => {
                    entries.insert(name, kind);
                }
                None => missing.push(name),
            }
        }
        TokenNameTable { entries, missing }
    }

    /// The table for the Java grammar.
    pub fn java() -> Self {
        TokenNameTable::new(JavaKind::token_names(), ALIASES)
    }

    pub fn lookup(&self, token_name: &str) -> Option<NodeKind> {
        self.entries.get(token_name).copied()
    }

    /// Token names the table cannot map.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// Rewrite every tag of `tree`. An unmapped tag is a grammar error.
    pub fn remap<K: NodeType>(&self, tree: SyntaxNode<K>) -> ParseResult<SyntaxNode<NodeKind>> {
        let root_pos = tree.pos;
        tree.try_map_kinds(&mut |kind: K| {
            self.lookup(kind.token_name()).ok_or_else(|| {
                ParseError::grammar(
                    root_pos,
                    format!("no normalized node type for {}", kind.token_name()),
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovedoc_core::tree::Position;

    fn node(kind: JavaKind, text: &str) -> SyntaxNode<JavaKind> {
        SyntaxNode::new(kind, text, Position::new(1, 1))
    }

    #[test]
    fn java_table_is_complete() {
        let table = TokenNameTable::java();
        assert!(table.missing().is_empty(), "unmapped: {:?}", table.missing());
        assert_eq!(table.lookup("CLASS_DEF"), Some(NodeKind::ClassDef));
        assert_eq!(table.lookup("CTOR_DEF"), Some(NodeKind::CtorIdent));
        assert_eq!(table.lookup("LITERAL_throws"), Some(NodeKind::Throws));
    }

    #[test]
    fn remap_preserves_shape_and_payload() {
        let tree = node(JavaKind::CompilationUnit, "").with_child(
            node(JavaKind::ClassDef, "Foo")
                .with_doc(Some("/** Foo. */".to_string()))
                .with_child(node(JavaKind::ObjBlock, "").with_child(node(JavaKind::CtorDef, "Foo"))),
        );
        let count = tree.count();
        let remapped = TokenNameTable::java().remap(tree).unwrap();
        assert_eq!(remapped.count(), count);
        let class = &remapped.children[0];
        assert_eq!(class.kind, NodeKind::ClassDef);
        assert_eq!(class.doc.as_deref(), Some("/** Foo. */"));
        assert_eq!(class.children[0].children[0].kind, NodeKind::CtorIdent);
    }

    #[test]
    fn unmapped_token_name_is_grammar_error() {
        let table = TokenNameTable::new(["CLASS_DEF"], &[]);
        let tree = node(JavaKind::CompilationUnit, "");
        let err = table.remap(tree).unwrap_err();
        assert!(matches!(err, ParseError::Grammar { .. }));
        assert!(err.to_string().contains("COMPILATION_UNIT"));
    }

    #[test]
    fn names_without_counterpart_are_reported() {
        let table = TokenNameTable::new(["CLASS_DEF", "LAMBDA"], &[]);
        assert_eq!(table.missing(), &["LAMBDA"]);
    }
}
