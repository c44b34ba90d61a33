//! Normalized syntax tree shared by both language front ends.
//!
//! Every front end produces a [`SyntaxNode`] tree. The tree is generic over its
//! node type tag so that a front end can first build a tree in its own native
//! vocabulary and then rewrite the tags into the primary vocabulary
//! ([`NodeKind`]) with a pure, shape-preserving pass
//! ([`SyntaxNode::try_map_kinds`]).
//!
//! # Normalized Shape
//!
//! The document assembler relies on the following shape. Optional children are
//! in brackets; `text` is shown in parentheses.
//!
//! ```text
//! CompilationUnit
//!   PackageDef ("a.b")
//!   Import ("a.b.C" | "a.b.*")          StaticImport ("a.b.C.member")
//!   ClassDef | InterfaceDef | EnumDef | TraitDef | AnnotationDef (name, doc)
//!     Modifiers
//!       Modifier ("public") ... Annotation ("Deprecated") [Expr (arguments)]
//!     [TypeParameters]  TypeParameter ("T extends Comparable<T>") ...
//!     [ExtendsClause]   Type ...
//!     [ImplementsClause] Type ...
//!     ObjBlock
//!       VariableDef (name, doc): Modifiers, Type, [Expr (initializer)]
//!       MethodDef (name, doc): Modifiers, [TypeParameters], Type, Parameters, [Throws], [Slist]
//!       CtorIdent (name, doc): Modifiers, [TypeParameters], Parameters, [Throws], [Slist]
//!       AnnotationFieldDef (name, doc): Modifiers, Type, [Expr (default)]
//!       EnumConstantDef (name, doc): [Annotation...], [Expr (arguments)], [ObjBlock]
//!       StaticInit | InstanceInit: Slist
//!       nested type definitions
//!   MethodDef                           (script methods, primary language only)
//!   Statement ("raw statement text")    (script statements, primary language only)
//!
//! Parameters
//!   ParameterDef (name): Modifiers, Type, [Expr (default)]
//!   VariableParameterDef (name): Modifiers, Type
//! ```
//!
//! A dynamically typed declaration carries `Type ("def")`.

use std::fmt;

use serde::Serialize;

// ============================================================================
// Positions
// ============================================================================

/// A 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters).
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// Node Types
// ============================================================================

/// A node type tag that carries a stable grammar token name.
///
/// Token names are what a grammar exports across its boundary; tree rewrites
/// between vocabularies are keyed on them rather than on enum discriminants.
pub trait NodeType: Copy + Eq + fmt::Debug {
    /// The grammar token name of this node type (e.g. `CLASS_DEF`).
    fn token_name(&self) -> &'static str;
}

/// Node types of the primary (Groovy) vocabulary.
///
/// This is the normalized vocabulary consumed by the document assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    PackageDef,
    Import,
    StaticImport,
    ClassDef,
    InterfaceDef,
    EnumDef,
    TraitDef,
    AnnotationDef,
    Modifiers,
    Modifier,
    Annotation,
    TypeParameters,
    TypeParameter,
    ExtendsClause,
    ImplementsClause,
    ObjBlock,
    VariableDef,
    MethodDef,
    CtorIdent,
    AnnotationFieldDef,
    EnumConstantDef,
    Parameters,
    ParameterDef,
    VariableParameterDef,
    Type,
    ArrayDeclarator,
    Throws,
    Slist,
    StaticInit,
    InstanceInit,
    Expr,
    Statement,
}

impl NodeKind {
    /// Every primary node type, in declaration order.
    pub const ALL: &'static [NodeKind] = &[
        NodeKind::CompilationUnit,
        NodeKind::PackageDef,
        NodeKind::Import,
        NodeKind::StaticImport,
        NodeKind::ClassDef,
        NodeKind::InterfaceDef,
        NodeKind::EnumDef,
        NodeKind::TraitDef,
        NodeKind::AnnotationDef,
        NodeKind::Modifiers,
        NodeKind::Modifier,
        NodeKind::Annotation,
        NodeKind::TypeParameters,
        NodeKind::TypeParameter,
        NodeKind::ExtendsClause,
        NodeKind::ImplementsClause,
        NodeKind::ObjBlock,
        NodeKind::VariableDef,
        NodeKind::MethodDef,
        NodeKind::CtorIdent,
        NodeKind::AnnotationFieldDef,
        NodeKind::EnumConstantDef,
        NodeKind::Parameters,
        NodeKind::ParameterDef,
        NodeKind::VariableParameterDef,
        NodeKind::Type,
        NodeKind::ArrayDeclarator,
        NodeKind::Throws,
        NodeKind::Slist,
        NodeKind::StaticInit,
        NodeKind::InstanceInit,
        NodeKind::Expr,
        NodeKind::Statement,
    ];

    /// Look up a primary node type by its grammar token name.
    pub fn from_token_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.token_name() == name)
    }

    /// Whether this node type declares a class-like type.
    pub fn is_type_def(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassDef
                | NodeKind::InterfaceDef
                | NodeKind::EnumDef
                | NodeKind::TraitDef
                | NodeKind::AnnotationDef
        )
    }
}

impl NodeType for NodeKind {
    fn token_name(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "COMPILATION_UNIT",
            NodeKind::PackageDef => "PACKAGE_DEF",
            NodeKind::Import => "IMPORT",
            NodeKind::StaticImport => "STATIC_IMPORT",
            NodeKind::ClassDef => "CLASS_DEF",
            NodeKind::InterfaceDef => "INTERFACE_DEF",
            NodeKind::EnumDef => "ENUM_DEF",
            NodeKind::TraitDef => "TRAIT_DEF",
            NodeKind::AnnotationDef => "ANNOTATION_DEF",
            NodeKind::Modifiers => "MODIFIERS",
            NodeKind::Modifier => "MODIFIER",
            NodeKind::Annotation => "ANNOTATION",
            NodeKind::TypeParameters => "TYPE_PARAMETERS",
            NodeKind::TypeParameter => "TYPE_PARAMETER",
            NodeKind::ExtendsClause => "EXTENDS_CLAUSE",
            NodeKind::ImplementsClause => "IMPLEMENTS_CLAUSE",
            NodeKind::ObjBlock => "OBJBLOCK",
            NodeKind::VariableDef => "VARIABLE_DEF",
            NodeKind::MethodDef => "METHOD_DEF",
            NodeKind::CtorIdent => "CTOR_IDENT",
            NodeKind::AnnotationFieldDef => "ANNOTATION_FIELD_DEF",
            NodeKind::EnumConstantDef => "ENUM_CONSTANT_DEF",
            NodeKind::Parameters => "PARAMETERS",
            NodeKind::ParameterDef => "PARAMETER_DEF",
            NodeKind::VariableParameterDef => "VARIABLE_PARAMETER_DEF",
            NodeKind::Type => "TYPE",
            NodeKind::ArrayDeclarator => "ARRAY_DECLARATOR",
            NodeKind::Throws => "LITERAL_throws",
            NodeKind::Slist => "SLIST",
            NodeKind::StaticInit => "STATIC_INIT",
            NodeKind::InstanceInit => "INSTANCE_INIT",
            NodeKind::Expr => "EXPR",
            NodeKind::Statement => "STATEMENT",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token_name())
    }
}

// ============================================================================
// Syntax Nodes
// ============================================================================

/// A node of a syntax tree tagged with node type `K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode<K> {
    /// Node type tag.
    pub kind: K,
    /// Node text: a declared name, a type spelling, or raw source text.
    pub text: String,
    /// Position of the first token of the node.
    pub pos: Position,
    /// Raw doc comment attached to a declaration, if any.
    pub doc: Option<String>,
    /// Child nodes in source order.
    pub children: Vec<SyntaxNode<K>>,
}

impl<K: NodeType> SyntaxNode<K> {
    /// Create a node without children.
    pub fn new(kind: K, text: impl Into<String>, pos: Position) -> Self {
        SyntaxNode {
            kind,
            text: text.into(),
            pos,
            doc: None,
            children: Vec::new(),
        }
    }

    /// Attach a doc comment (builder style).
    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }

    /// Append a child (builder style).
    pub fn with_child(mut self, child: SyntaxNode<K>) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child.
    pub fn push(&mut self, child: SyntaxNode<K>) {
        self.children.push(child);
    }

    /// First child with the given node type.
    pub fn child(&self, kind: K) -> Option<&SyntaxNode<K>> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// First child with the given node type, mutably.
    pub fn child_mut(&mut self, kind: K) -> Option<&mut SyntaxNode<K>> {
        self.children.iter_mut().find(|c| c.kind == kind)
    }

    /// All children with the given node type, in source order.
    pub fn children_of(&self, kind: K) -> impl Iterator<Item = &SyntaxNode<K>> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Total number of nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::count).sum::<usize>()
    }

    /// Visit every node of this subtree in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode<K>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Rewrite every node type tag of this subtree in pre-order.
    ///
    /// Only tags change: text, positions, doc comments and the tree shape are
    /// preserved. The first error aborts the rewrite.
    pub fn try_map_kinds<L: NodeType, E>(
        self,
        map: &mut impl FnMut(K) -> Result<L, E>,
    ) -> Result<SyntaxNode<L>, E> {
        let kind = map(self.kind)?;
        let children = self
            .children
            .into_iter()
            .map(|child| child.try_map_kinds(map))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(SyntaxNode {
            kind,
            text: self.text,
            pos: self.pos,
            doc: self.doc,
            children,
        })
    }

    /// Render the subtree as an indented outline of `TOKEN_NAME text` lines.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_into(0, &mut out);
        out
    }

    fn outline_into(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.kind.token_name());
        if !self.text.is_empty() {
            out.push(' ');
            out.push_str(&self.text);
        }
        out.push('\n');
        for child in &self.children {
            child.outline_into(depth + 1, out);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode<NodeKind> {
        let pos = Position::new(1, 1);
        SyntaxNode::new(NodeKind::CompilationUnit, "", pos).with_child(
            SyntaxNode::new(NodeKind::ClassDef, "Foo", pos)
                .with_child(SyntaxNode::new(NodeKind::Modifiers, "", pos))
                .with_child(SyntaxNode::new(NodeKind::ObjBlock, "", pos)),
        )
    }

    #[test]
    fn token_names_round_trip_through_lookup() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_token_name(kind.token_name()), Some(*kind));
        }
        assert_eq!(NodeKind::from_token_name("NO_SUCH_TOKEN"), None);
    }

    #[test]
    fn count_and_walk_visit_every_node() {
        let tree = sample();
        assert_eq!(tree.count(), 4);
        let mut seen = Vec::new();
        tree.walk(&mut |n| seen.push(n.kind));
        assert_eq!(
            seen,
            vec![
                NodeKind::CompilationUnit,
                NodeKind::ClassDef,
                NodeKind::Modifiers,
                NodeKind::ObjBlock
            ]
        );
    }

    #[test]
    fn try_map_kinds_preserves_shape_and_text() {
        let tree = sample();
        let mapped: SyntaxNode<NodeKind> = tree
            .clone()
            .try_map_kinds(&mut |k| {
                Ok::<_, ()>(if k == NodeKind::ClassDef {
                    NodeKind::TraitDef
                } else {
                    k
                })
            })
            .unwrap();
        assert_eq!(mapped.count(), tree.count());
        assert_eq!(mapped.children[0].kind, NodeKind::TraitDef);
        assert_eq!(mapped.children[0].text, "Foo");
    }

    #[test]
    fn try_map_kinds_stops_at_first_error() {
        let result: Result<SyntaxNode<NodeKind>, String> = sample().try_map_kinds(&mut |k| {
            if k == NodeKind::ObjBlock {
                Err(format!("unmapped {}", k))
            } else {
                Ok(k)
            }
        });
        assert_eq!(result.unwrap_err(), "unmapped OBJBLOCK");
    }

    #[test]
    fn outline_indents_children() {
        let outline = sample().outline();
        assert_eq!(
            outline,
            "COMPILATION_UNIT\n  CLASS_DEF Foo\n    MODIFIERS\n    OBJBLOCK\n"
        );
    }
}
