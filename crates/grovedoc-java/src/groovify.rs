//! Idiom rewrite: Java constructs expressed the Groovy way.
//!
//! Runs on a tree that is already in the normalized vocabulary. The rewrites:
//!
//! - `ArrayDeclarator` children (`String args[]`) are folded into the `Type`
//!   text (`String[]`) and removed.
//! - Declarations without an access modifier are package-private in Java but
//!   public in Groovy, so classes, fields, methods and constructors that have
//!   none gain a `@PackageScope` annotation. Members of interfaces and
//!   annotation types are implicitly public and are left alone. Enum
//!   constructors are implicitly private and gain a `private` modifier.
//! - `public` on classes, methods and constructors is redundant and dropped.
//!   Fields keep it: a Groovy field without an access modifier is a property.

use grovedoc_core::error::{ParseError, ParseResult};
use grovedoc_core::tree::{NodeKind, SyntaxNode};

type Node = SyntaxNode<NodeKind>;

const PACKAGE_SCOPE: &str = "PackageScope";

/// The kind of type declaration a member sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Enclosing {
    TopLevel,
    Class,
    Enum,
    /// Interface or annotation type.
    Interface,
}

impl Enclosing {
    fn of(kind: NodeKind) -> Self {
        match kind {
            NodeKind::InterfaceDef | NodeKind::AnnotationDef => Enclosing::Interface,
            NodeKind::EnumDef => Enclosing::Enum,
            _ => Enclosing::Class,
        }
    }
}

/// Apply the idiom rewrites to a whole compilation unit.
pub fn groovify(mut tree: Node) -> ParseResult<Node> {
    if tree.kind != NodeKind::CompilationUnit {
        return Err(ParseError::grammar(
            tree.pos,
            format!("expected {} at the root, found {}", NodeKind::CompilationUnit, tree.kind),
        ));
    }
    for child in &mut tree.children {
        rewrite(child, Enclosing::TopLevel)?;
    }
    Ok(tree)
}

fn rewrite(node: &mut Node, enclosing: Enclosing) -> ParseResult<()> {
    match node.kind {
        kind if kind.is_type_def() => {
            if enclosing != Enclosing::Interface {
                add_package_scope(node)?;
            }
            drop_public(node);
            let inner = Enclosing::of(kind);
            if let Some(body) = node.child_mut(NodeKind::ObjBlock) {
                for member in &mut body.children {
                    rewrite(member, inner)?;
                }
            }
        }
        NodeKind::VariableDef => {
            fold_array_dims(node)?;
            if enclosing != Enclosing::Interface {
                add_package_scope(node)?;
            }
        }
        NodeKind::MethodDef | NodeKind::AnnotationFieldDef => {
            fold_array_dims(node)?;
            rewrite_parameters(node)?;
            if enclosing != Enclosing::Interface {
                add_package_scope(node)?;
            }
            drop_public(node);
        }
        NodeKind::CtorIdent => {
            rewrite_parameters(node)?;
            if enclosing == Enclosing::Enum {
                make_private(node)?;
            } else {
                add_package_scope(node)?;
            }
            drop_public(node);
        }
        NodeKind::EnumConstantDef => {
            if let Some(body) = node.child_mut(NodeKind::ObjBlock) {
                for member in &mut body.children {
                    rewrite(member, Enclosing::Class)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn rewrite_parameters(node: &mut Node) -> ParseResult<()> {
    if let Some(params) = node.child_mut(NodeKind::Parameters) {
        for param in &mut params.children {
            fold_array_dims(param)?;
        }
    }
    Ok(())
}

/// Move `[]` written after a name onto the declared type.
fn fold_array_dims(node: &mut Node) -> ParseResult<()> {
    let Some(index) = node
        .children
        .iter()
        .position(|c| c.kind == NodeKind::ArrayDeclarator)
    else {
        return Ok(());
    };
    let dims = node.children.remove(index);
    if let Some(ty) = node.child_mut(NodeKind::Type) {
        ty.text.push_str(&dims.text);
        return Ok(());
    }
    Err(ParseError::grammar(
        dims.pos,
        format!("array dimensions on '{}' without a type", node.text),
    ))
}

fn modifiers_mut(node: &mut Node) -> ParseResult<&mut Node> {
    let pos = node.pos;
    let text = node.text.clone();
    node.child_mut(NodeKind::Modifiers).ok_or_else(|| {
        ParseError::grammar(pos, format!("declaration '{}' has no modifier list", text))
    })
}

fn has_access_modifier(modifiers: &Node) -> bool {
    modifiers.children.iter().any(|m| {
        m.kind == NodeKind::Modifier && matches!(m.text.as_str(), "public" | "protected" | "private")
    })
}

fn add_package_scope(node: &mut Node) -> ParseResult<()> {
    let modifiers = modifiers_mut(node)?;
    let already = modifiers
        .children
        .iter()
        .any(|m| m.kind == NodeKind::Annotation && m.text.ends_with(PACKAGE_SCOPE));
    if !has_access_modifier(modifiers) && !already {
        let pos = modifiers.pos;
        modifiers
            .children
            .insert(0, Node::new(NodeKind::Annotation, PACKAGE_SCOPE, pos));
    }
    Ok(())
}

fn make_private(node: &mut Node) -> ParseResult<()> {
    let modifiers = modifiers_mut(node)?;
    if !has_access_modifier(modifiers) {
        let pos = modifiers.pos;
        modifiers
            .children
            .insert(0, Node::new(NodeKind::Modifier, "private", pos));
    }
    Ok(())
}

fn drop_public(node: &mut Node) {
    if let Some(modifiers) = node.child_mut(NodeKind::Modifiers) {
        modifiers
            .children
            .retain(|m| !(m.kind == NodeKind::Modifier && m.text == "public"));
    }
}
