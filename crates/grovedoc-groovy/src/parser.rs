//! Declaration-level Groovy parser.
//!
//! Produces the normalized tree directly (see `grovedoc_core::tree`). Method
//! bodies, initializers and script statements are kept as opaque token runs;
//! only declarations are parsed structurally.
//!
//! Groovy specifics handled here:
//! - newlines terminate declarations and statements, semicolons are optional;
//! - `def`, untyped fields, parameters and methods (`static x = 1`);
//! - parameter default values;
//! - `trait` declarations;
//! - script files: top-level statements and methods next to classes;
//! - aliased imports (`import a.b.C as D`);
//! - string method names (`def "does a thing"() {}`).

use grovedoc_core::cursor::TokenCursor;
use grovedoc_core::error::{ParseError, ParseResult};
use grovedoc_core::lexer::{tokenize, LexerConfig, TokenKind};
use grovedoc_core::tree::{NodeKind, Position, SyntaxNode};

type Node = SyntaxNode<NodeKind>;

/// Reserved words.
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "def", "default", "do", "double", "else", "enum", "extends", "false",
    "final", "finally", "float", "for", "goto", "if", "implements", "import", "in",
    "instanceof", "int", "interface", "long", "native", "new", "null", "package", "private",
    "protected", "public", "return", "short", "static", "strictfp", "super", "switch",
    "synchronized", "this", "threadsafe", "throw", "throws", "trait", "transient", "true",
    "try", "void", "volatile", "while",
];

/// Keywords that may still be used as names.
const SOFT_KEYWORDS: &[&str] = &["as", "in", "trait", "threadsafe"];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "threadsafe",
    "default",
];

/// Deepest allowed nesting of class bodies, enum constant bodies included.
const MAX_CLASS_NESTING: usize = 64;

pub(crate) const LEXER: LexerConfig = LexerConfig {
    keywords: KEYWORDS,
    significant_newlines: true,
    allow_shebang: true,
};

/// Parse Groovy source into a normalized tree.
pub fn parse(source: &str) -> ParseResult<Node> {
    let tokens = tokenize(source, &LEXER)?;
    Parser {
        cursor: TokenCursor::new(tokens),
        depth: 0,
    }
    .compilation_unit()
}

struct Parser {
    cursor: TokenCursor,
    /// Class bodies currently open.
    depth: usize,
}

impl Parser {
    // ------------------------------------------------------------------------
    // Compilation unit
    // ------------------------------------------------------------------------

    fn compilation_unit(mut self) -> ParseResult<Node> {
        let mut unit = Node::new(NodeKind::CompilationUnit, "", Position::new(1, 1));
        loop {
            self.cursor.skip_separators();
            if self.cursor.at_eof() {
                return Ok(unit);
            }
            if self.cursor.at_keyword("package") {
                unit.push(self.package_def()?);
            } else if self.cursor.at_keyword("import") {
                unit.push(self.import()?);
            } else {
                unit.push(self.top_level()?);
            }
        }
    }

    fn package_def(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_keyword("package")?.pos;
        let name = self.cursor.qualified_name(SOFT_KEYWORDS)?;
        self.end_of_declaration()?;
        Ok(Node::new(NodeKind::PackageDef, name, pos))
    }

    fn import(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_keyword("import")?.pos;
        let kind = if self.cursor.eat_keyword("static") {
            NodeKind::StaticImport
        } else {
            NodeKind::Import
        };
        let mut name = self.cursor.qualified_name(SOFT_KEYWORDS)?;
        if self.cursor.eat_punct('.') {
            self.cursor.expect_punct('*')?;
            name.push_str(".*");
        } else if self.cursor.eat_keyword("as") {
            let alias = self.cursor.expect_ident(SOFT_KEYWORDS)?;
            name = format!("{} as {}", name, alias.text);
        }
        self.end_of_declaration()?;
        Ok(Node::new(kind, name, pos))
    }

    /// A type declaration, a script method, or a script statement.
    fn top_level(&mut self) -> ParseResult<Node> {
        let mark = self.cursor.mark();
        let modifiers = self.modifiers()?;
        if self.at_type_def() {
            return self.type_def(mark, modifiers);
        }
        if self.looks_like_method(!modifiers.children.is_empty()) {
            let mut nodes = self.method_or_field(mark, modifiers, None)?;
            return nodes
                .pop()
                .ok_or_else(|| self.cursor.unexpected("method declaration"));
        }
        self.cursor.rewind(mark);
        self.statement()
    }

    /// Whether the tokens ahead form `[def | Type] name (...) {`, or
    /// `name (...) {` after modifiers. Script methods always have a body,
    /// which tells `String name() {` apart from the call `println name()`.
    /// The cursor is left where it was.
    fn looks_like_method(&mut self, has_modifiers: bool) -> bool {
        let mark = self.cursor.mark();
        let typed = if self.cursor.eat_keyword("def") {
            true
        } else if has_modifiers && self.at_name() && self.cursor.peek_nth(1).is_punct('(') {
            false
        } else {
            self.cursor.type_text(PRIMITIVES, SOFT_KEYWORDS).is_ok()
        };
        let named = (typed || has_modifiers)
            && (self.at_name() || self.cursor.peek().kind == TokenKind::StringLit)
            && self.cursor.peek_nth(1).is_punct('(');
        let result = named && {
            self.cursor.bump();
            self.cursor.skip_balanced().is_ok() && {
                let next = self.cursor.peek_significant(0);
                next.is_punct('{') || next.is_keyword("throws")
            }
        };
        self.cursor.rewind(mark);
        result
    }

    fn statement(&mut self) -> ParseResult<Node> {
        let mark = self.cursor.mark();
        let pos = self.cursor.pos();
        self.skip_expression(false)?;
        if self.cursor.mark() == mark {
            return Err(self.cursor.unexpected("declaration or statement"));
        }
        Ok(Node::new(NodeKind::Statement, self.cursor.text_since(mark), pos))
    }

    // ------------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------------

    fn at_type_def(&self) -> bool {
        let token = self.cursor.peek();
        token.is_keyword("class")
            || token.is_keyword("interface")
            || token.is_keyword("enum")
            || token.is_keyword("trait")
            || (token.is_punct('@') && self.cursor.peek_nth(1).is_keyword("interface"))
    }

    fn type_def(&mut self, mark: usize, modifiers: Node) -> ParseResult<Node> {
        let kind = if self.cursor.eat_punct('@') {
            self.cursor.expect_keyword("interface")?;
            NodeKind::AnnotationDef
        } else {
            let keyword = self.cursor.bump();
            match keyword.text.as_str() {
                "class" => NodeKind::ClassDef,
                "interface" => NodeKind::InterfaceDef,
                "enum" => NodeKind::EnumDef,
                _ => NodeKind::TraitDef,
            }
        };
        let name = self.cursor.expect_ident(SOFT_KEYWORDS)?.text;
        let mut node = Node::new(kind, name.clone(), self.cursor.pos_at(mark))
            .with_doc(self.cursor.doc_at_mark(mark))
            .with_child(modifiers);

        if self.cursor.at_punct('<') {
            node.push(self.type_parameters()?);
        }
        self.cursor.skip_newlines();
        if self.cursor.at_keyword("extends") {
            node.push(self.type_list(NodeKind::ExtendsClause, "extends")?);
            self.cursor.skip_newlines();
        }
        if self.cursor.at_keyword("implements") {
            node.push(self.type_list(NodeKind::ImplementsClause, "implements")?);
            self.cursor.skip_newlines();
        }
        node.push(self.class_body(&name, kind == NodeKind::EnumDef)?);
        Ok(node)
    }

    fn type_list(&mut self, kind: NodeKind, keyword: &str) -> ParseResult<Node> {
        let pos = self.cursor.expect_keyword(keyword)?.pos;
        let mut clause = Node::new(kind, "", pos);
        loop {
            self.cursor.skip_newlines();
            let type_pos = self.cursor.pos();
            let ty = self.cursor.type_text(PRIMITIVES, SOFT_KEYWORDS)?;
            clause.push(Node::new(NodeKind::Type, ty, type_pos));
            if !self.cursor.peek_significant(0).is_punct(',') {
                return Ok(clause);
            }
            self.cursor.skip_newlines();
            self.cursor.bump();
        }
    }

    fn type_parameters(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('<')?.pos;
        let mut params = Node::new(NodeKind::TypeParameters, "", pos);
        loop {
            self.cursor.skip_newlines();
            let mark = self.cursor.mark();
            let param_pos = self.cursor.pos();
            self.cursor.expect_ident(SOFT_KEYWORDS)?;
            if self.cursor.eat_keyword("extends") {
                loop {
                    self.cursor.type_text(PRIMITIVES, SOFT_KEYWORDS)?;
                    if !self.cursor.eat_punct('&') {
                        break;
                    }
                }
            }
            params.push(Node::new(
                NodeKind::TypeParameter,
                self.cursor.text_since(mark),
                param_pos,
            ));
            self.cursor.skip_newlines();
            if self.cursor.eat_punct(',') {
                continue;
            }
            self.cursor.expect_punct('>')?;
            return Ok(params);
        }
    }

    fn class_body(&mut self, class_name: &str, is_enum: bool) -> ParseResult<Node> {
        if self.depth >= MAX_CLASS_NESTING {
            return Err(ParseError::grammar(self.cursor.pos(), "class nesting too deep"));
        }
        self.depth += 1;
        let body = self.class_members(class_name, is_enum);
        self.depth -= 1;
        body
    }

    fn class_members(&mut self, class_name: &str, is_enum: bool) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('{')?.pos;
        let mut block = Node::new(NodeKind::ObjBlock, "", pos);
        if is_enum {
            self.enum_constants(&mut block)?;
        }
        loop {
            self.cursor.skip_separators();
            if self.cursor.eat_punct('}') {
                return Ok(block);
            }
            if self.cursor.at_eof() {
                return Err(self.cursor.unexpected("'}'"));
            }
            for member in self.member(class_name)? {
                block.push(member);
            }
        }
    }

    fn enum_constants(&mut self, block: &mut Node) -> ParseResult<()> {
        loop {
            self.cursor.skip_newlines();
            if self.cursor.at_punct('}') || self.cursor.eat_punct(';') {
                return Ok(());
            }
            let mark = self.cursor.mark();
            let mut annotations = Vec::new();
            while self.cursor.at_punct('@') {
                annotations.push(self.annotation()?);
                self.cursor.skip_newlines();
            }
            let name = self.cursor.expect_ident(SOFT_KEYWORDS)?.text;
            let mut constant = Node::new(NodeKind::EnumConstantDef, name, self.cursor.pos_at(mark))
                .with_doc(self.cursor.doc_at_mark(mark));
            for annotation in annotations {
                constant.push(annotation);
            }
            if self.cursor.at_punct('(') {
                constant.push(self.parenthesized_expr()?);
            }
            if self.cursor.at_punct('{') {
                constant.push(self.class_body("", false)?);
            }
            self.cursor.skip_newlines();
            block.push(constant);
            if !self.cursor.eat_punct(',') {
                self.cursor.eat_punct(';');
                return Ok(());
            }
        }
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    fn member(&mut self, class_name: &str) -> ParseResult<Vec<Node>> {
        let mark = self.cursor.mark();
        let pos = self.cursor.pos();

        if self.cursor.at_punct('{') {
            return Ok(vec![self.initializer(NodeKind::InstanceInit, pos)?]);
        }
        if self.cursor.at_keyword("static") && self.cursor.peek_significant(1).is_punct('{') {
            self.cursor.bump();
            self.cursor.skip_newlines();
            return Ok(vec![self.initializer(NodeKind::StaticInit, pos)?]);
        }

        let modifiers = self.modifiers()?;
        if self.at_type_def() {
            return Ok(vec![self.type_def(mark, modifiers)?]);
        }
        self.method_or_field(mark, modifiers, Some(class_name))
    }

    fn initializer(&mut self, kind: NodeKind, pos: Position) -> ParseResult<Node> {
        let body_pos = self.cursor.pos();
        self.cursor.skip_balanced()?;
        Ok(Node::new(kind, "", pos).with_child(Node::new(NodeKind::Slist, "", body_pos)))
    }

    /// A method, constructor or field declaration after its modifiers.
    /// Fields with several declarators yield several nodes.
    fn method_or_field(
        &mut self,
        mark: usize,
        modifiers: Node,
        class_name: Option<&str>,
    ) -> ParseResult<Vec<Node>> {
        let doc = self.cursor.doc_at_mark(mark);
        let pos = self.cursor.pos_at(mark);

        let type_params = if self.cursor.at_punct('<') {
            Some(self.type_parameters()?)
        } else {
            None
        };

        let is_ctor = class_name.is_some_and(|class| {
            let token = self.cursor.peek();
            token.kind == TokenKind::Ident && token.text == class && self.cursor.peek_nth(1).is_punct('(')
        });
        if is_ctor {
            let name = self.cursor.bump().text;
            let mut ctor = Node::new(NodeKind::CtorIdent, name, pos)
                .with_doc(doc)
                .with_child(modifiers);
            if let Some(type_params) = type_params {
                ctor.push(type_params);
            }
            self.method_rest(&mut ctor)?;
            return Ok(vec![ctor]);
        }

        let type_pos = self.cursor.pos();
        let ty = if self.cursor.eat_keyword("def") {
            "def".to_string()
        } else if self.at_name() && self.untyped_follows() {
            "def".to_string()
        } else {
            self.cursor.type_text(PRIMITIVES, SOFT_KEYWORDS)?
        };
        let ty = Node::new(NodeKind::Type, ty, type_pos);

        if self.cursor.peek().kind == TokenKind::StringLit && self.cursor.peek_nth(1).is_punct('(') {
            let literal = self.cursor.bump().text;
            let name = literal.trim_matches(|c| c == '"' || c == '\'').to_string();
            return self.method(name, pos, doc, modifiers, type_params, ty).map(|m| vec![m]);
        }

        let name = self.cursor.expect_ident(SOFT_KEYWORDS)?.text;
        if self.cursor.at_punct('(') {
            return self.method(name, pos, doc, modifiers, type_params, ty).map(|m| vec![m]);
        }
        if let Some(params) = type_params {
            return Err(ParseError::grammar(
                params.pos,
                "type parameters on a field",
            ));
        }
        self.fields(name, pos, doc, modifiers, ty)
    }

    /// After an identifier: whether it is the name of an untyped declaration.
    fn untyped_follows(&self) -> bool {
        let next = self.cursor.peek_nth(1);
        next.is_punct('=')
            || next.is_punct(',')
            || next.is_punct(';')
            || next.is_punct('}')
            || next.is_punct('(')
            || next.kind == TokenKind::Newline
            || next.is_eof()
    }

    fn method(
        &mut self,
        name: String,
        pos: Position,
        doc: Option<String>,
        modifiers: Node,
        type_params: Option<Node>,
        ty: Node,
    ) -> ParseResult<Node> {
        let mut method = Node::new(NodeKind::MethodDef, name, pos)
            .with_doc(doc)
            .with_child(modifiers);
        if let Some(type_params) = type_params {
            method.push(type_params);
        }
        method.push(ty);
        self.method_rest(&mut method)?;
        Ok(method)
    }

    /// Parameters, throws clause, annotation default, and body.
    fn method_rest(&mut self, method: &mut Node) -> ParseResult<()> {
        method.push(self.parameters()?);
        if self.cursor.peek_significant(0).is_keyword("throws") {
            self.cursor.skip_newlines();
            method.push(self.type_list(NodeKind::Throws, "throws")?);
        }
        let next = self.cursor.peek_significant(0);
        if next.is_keyword("default") || next.is_punct('{') {
            self.cursor.skip_newlines();
        }
        if self.cursor.eat_keyword("default") {
            let expr_pos = self.cursor.pos();
            let mark = self.cursor.mark();
            self.skip_expression(false)?;
            method.kind = NodeKind::AnnotationFieldDef;
            method.push(Node::new(NodeKind::Expr, self.cursor.text_since(mark), expr_pos));
            return self.end_of_declaration();
        }
        if self.cursor.at_punct('{') {
            let body_pos = self.cursor.pos();
            self.cursor.skip_balanced()?;
            method.push(Node::new(NodeKind::Slist, "", body_pos));
            return Ok(());
        }
        self.end_of_declaration()
    }

    fn parameters(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('(')?.pos;
        let mut params = Node::new(NodeKind::Parameters, "", pos);
        loop {
            self.cursor.skip_newlines();
            if self.cursor.eat_punct(')') {
                return Ok(params);
            }
            params.push(self.parameter()?);
            self.cursor.skip_newlines();
            if !self.cursor.eat_punct(',') {
                self.cursor.expect_punct(')')?;
                return Ok(params);
            }
        }
    }

    fn parameter(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.pos();
        let modifiers = self.modifiers()?;
        let type_pos = self.cursor.pos();
        let ty = if self.cursor.eat_keyword("def") {
            "def".to_string()
        } else if self.at_name() && self.untyped_parameter_follows() {
            "def".to_string()
        } else {
            self.cursor.type_text(PRIMITIVES, SOFT_KEYWORDS)?
        };
        let varargs = self.cursor.peek().kind == TokenKind::Ellipsis;
        if varargs {
            self.cursor.bump();
        }
        let name = self.cursor.expect_ident(SOFT_KEYWORDS)?.text;
        let kind = if varargs {
            NodeKind::VariableParameterDef
        } else {
            NodeKind::ParameterDef
        };
        let mut param = Node::new(kind, name, pos)
            .with_child(modifiers)
            .with_child(Node::new(NodeKind::Type, ty, type_pos));
        if self.cursor.eat_punct('=') {
            let expr_pos = self.cursor.pos();
            let mark = self.cursor.mark();
            self.cursor
                .skip_until(|c| c.at_punct(',') || c.at_punct(')'))?;
            param.push(Node::new(NodeKind::Expr, self.cursor.text_since(mark), expr_pos));
        }
        Ok(param)
    }

    fn untyped_parameter_follows(&self) -> bool {
        let next = self.cursor.peek_nth(1);
        next.is_punct(',') || next.is_punct(')') || next.is_punct('=') || next.kind == TokenKind::Newline
    }

    fn fields(
        &mut self,
        first: String,
        pos: Position,
        doc: Option<String>,
        modifiers: Node,
        ty: Node,
    ) -> ParseResult<Vec<Node>> {
        let mut fields = Vec::new();
        let mut name = first;
        let mut field_pos = pos;
        loop {
            let mut field = Node::new(NodeKind::VariableDef, name, field_pos)
                .with_doc(doc.clone())
                .with_child(modifiers.clone())
                .with_child(ty.clone());
            if self.cursor.eat_punct('=') {
                let expr_pos = self.cursor.pos();
                let mark = self.cursor.mark();
                self.skip_expression(true)?;
                field.push(Node::new(NodeKind::Expr, self.cursor.text_since(mark), expr_pos));
            }
            fields.push(field);
            if !self.cursor.eat_punct(',') {
                break;
            }
            self.cursor.skip_newlines();
            field_pos = self.cursor.pos();
            name = self.cursor.expect_ident(SOFT_KEYWORDS)?.text;
        }
        self.end_of_declaration()?;
        Ok(fields)
    }

    // ------------------------------------------------------------------------
    // Modifiers and annotations
    // ------------------------------------------------------------------------

    fn modifiers(&mut self) -> ParseResult<Node> {
        let mut modifiers = Node::new(NodeKind::Modifiers, "", self.cursor.pos());
        loop {
            let token = self.cursor.peek();
            if token.is_punct('@') && !self.cursor.peek_nth(1).is_keyword("interface") {
                modifiers.push(self.annotation()?);
            } else if token.kind == TokenKind::Keyword
                && MODIFIERS.contains(&token.text.as_str())
                && !self.cursor.peek_nth(1).is_punct('.')
            {
                let token = self.cursor.bump();
                modifiers.push(Node::new(NodeKind::Modifier, token.text, token.pos));
            } else {
                return Ok(modifiers);
            }
            self.cursor.skip_newlines();
        }
    }

    fn annotation(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('@')?.pos;
        let name = self.cursor.qualified_name(SOFT_KEYWORDS)?;
        let mut annotation = Node::new(NodeKind::Annotation, name, pos);
        if self.cursor.at_punct('(') {
            annotation.push(self.parenthesized_expr()?);
        }
        Ok(annotation)
    }

    /// `( ... )` as an `Expr` node holding the text between the parentheses.
    fn parenthesized_expr(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.pos();
        let mark = self.cursor.mark();
        self.cursor.skip_balanced()?;
        let text = self.cursor.text_since(mark);
        let inner = text
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(&text)
            .trim()
            .to_string();
        Ok(Node::new(NodeKind::Expr, inner, pos))
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn at_name(&self) -> bool {
        let token = self.cursor.peek();
        token.kind == TokenKind::Ident
            || (token.kind == TokenKind::Keyword && SOFT_KEYWORDS.contains(&token.text.as_str()))
    }

    /// Skip an opaque expression or statement. It ends at `;`, at a newline
    /// that does not continue it, at a closing bracket, or (when `at_comma`)
    /// at a top-level comma.
    fn skip_expression(&mut self, at_comma: bool) -> ParseResult<()> {
        loop {
            self.cursor
                .skip_until(|c| c.at_punct(';') || c.at_newline() || (at_comma && c.at_punct(',')))?;
            if self.cursor.at_newline() && self.continues_on_next_line() {
                self.cursor.skip_newlines();
                continue;
            }
            return Ok(());
        }
    }

    /// At a newline: whether the expression before it carries on after it.
    fn continues_on_next_line(&self) -> bool {
        let dangling = self.cursor.prev().is_some_and(|prev| {
            prev.kind == TokenKind::Punct && "=+-*/%&|^!~<>?:,.".contains(prev.text.as_str())
        });
        let next = self.cursor.peek_significant(0);
        let chained = next.is_punct('.')
            || (next.is_punct('?') && self.cursor.peek_significant(1).is_punct('.'));
        dangling || chained
    }

    /// A declaration must be followed by a separator or the end of a block.
    fn end_of_declaration(&mut self) -> ParseResult<()> {
        if self.cursor.eat_punct(';') || self.cursor.at_newline() || self.cursor.at_punct('}') || self.cursor.at_eof() {
            Ok(())
        } else {
            Err(self.cursor.unexpected("end of declaration"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Node {
        match parse(source) {
            Ok(tree) => tree,
            Err(err) => panic!("parse failed: {err}\n{source}"),
        }
    }

    fn first_class(tree: &Node) -> &Node {
        tree.children
            .iter()
            .find(|c| c.kind.is_type_def())
            .expect("no class")
    }

    fn body(class: &Node) -> &Node {
        class.child(NodeKind::ObjBlock).expect("no body")
    }

    mod headers {
        use super::*;

        #[test]
        fn package_and_imports() {
            let tree = parse_ok(
                "package pkg.a\n\nimport java.util.*\nimport static java.lang.Math.max\nimport groovy.transform.Canonical as Canon\n",
            );
            let kinds: Vec<(NodeKind, &str)> = tree
                .children
                .iter()
                .map(|c| (c.kind, c.text.as_str()))
                .collect();
            assert_eq!(
                kinds,
                vec![
                    (NodeKind::PackageDef, "pkg.a"),
                    (NodeKind::Import, "java.util.*"),
                    (NodeKind::StaticImport, "java.lang.Math.max"),
                    (NodeKind::Import, "groovy.transform.Canonical as Canon"),
                ]
            );
        }

        #[test]
        fn class_header_across_lines() {
            let tree = parse_ok(
                "/** A bar. */\n@Deprecated\nabstract class Bar<T extends Comparable<T>>\n    extends Base<T>\n    implements Runnable, Serializable\n{\n}\n",
            );
            let bar = first_class(&tree);
            assert_eq!(bar.kind, NodeKind::ClassDef);
            assert_eq!(bar.text, "Bar");
            assert_eq!(bar.doc.as_deref(), Some("/** A bar. */"));
            assert_eq!(bar.pos, Position::new(2, 1));
            let mods: Vec<&str> = bar
                .child(NodeKind::Modifiers)
                .unwrap()
                .children
                .iter()
                .map(|m| m.text.as_str())
                .collect();
            assert_eq!(mods, vec!["Deprecated", "abstract"]);
            let tp = bar.child(NodeKind::TypeParameters).unwrap();
            assert_eq!(tp.children[0].text, "T extends Comparable<T>");
            assert_eq!(bar.child(NodeKind::ExtendsClause).unwrap().children[0].text, "Base<T>");
            assert_eq!(bar.child(NodeKind::ImplementsClause).unwrap().children.len(), 2);
        }

        #[test]
        fn trait_and_annotation_types() {
            let tree = parse_ok("trait Greeter { String greet() { 'hi' } }\n@interface Marker { String value() default 'x' }");
            assert_eq!(tree.children[0].kind, NodeKind::TraitDef);
            assert_eq!(tree.children[1].kind, NodeKind::AnnotationDef);
            let element = &body(&tree.children[1]).children[0];
            assert_eq!(element.kind, NodeKind::AnnotationFieldDef);
            assert_eq!(element.child(NodeKind::Expr).unwrap().text, "'x'");
        }
    }

    mod members {
        use super::*;

        #[test]
        fn properties_fields_and_untyped_declarations() {
            let tree = parse_ok(
                "class Foo {\n  String name\n  private int count = 1 +\n     2\n  static final MAX = 10\n  def a, b = [1, 2]\n}\n",
            );
            let members: Vec<(&str, &str)> = body(first_class(&tree))
                .children
                .iter()
                .map(|m| (m.text.as_str(), m.child(NodeKind::Type).unwrap().text.as_str()))
                .collect();
            assert_eq!(
                members,
                vec![("name", "String"), ("count", "int"), ("MAX", "def"), ("a", "def"), ("b", "def")]
            );
            let count = &body(first_class(&tree)).children[1];
            assert_eq!(count.child(NodeKind::Expr).unwrap().text, "1 + 2");
        }

        #[test]
        fn methods_with_defaults_varargs_and_throws() {
            let tree = parse_ok(
                "class Foo {\n  /** Does it. */\n  def run(String cmd, int retries = 3, Object... rest) throws IOException {\n    println cmd\n  }\n  static main(args) { }\n  abstract void stop()\n}\n",
            );
            let members = &body(first_class(&tree)).children;
            let run = &members[0];
            assert_eq!(run.kind, NodeKind::MethodDef);
            assert_eq!(run.doc.as_deref(), Some("/** Does it. */"));
            let params = run.child(NodeKind::Parameters).unwrap();
            assert_eq!(params.children.len(), 3);
            assert_eq!(params.children[1].child(NodeKind::Expr).unwrap().text, "3");
            assert_eq!(params.children[2].kind, NodeKind::VariableParameterDef);
            assert_eq!(run.child(NodeKind::Throws).unwrap().children[0].text, "IOException");
            assert!(run.child(NodeKind::Slist).is_some());

            let main = &members[1];
            assert_eq!(main.text, "main");
            assert_eq!(main.child(NodeKind::Type).unwrap().text, "def");
            let arg = &main.child(NodeKind::Parameters).unwrap().children[0];
            assert_eq!(arg.child(NodeKind::Type).unwrap().text, "def");

            assert!(members[2].child(NodeKind::Slist).is_none());
        }

        #[test]
        fn constructors_and_initializers() {
            let tree = parse_ok(
                "class Foo {\n  static { init() }\n  { setup() }\n  Foo(int x) { }\n  private Foo() { this(1) }\n}\n",
            );
            let kinds: Vec<NodeKind> = body(first_class(&tree)).children.iter().map(|m| m.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    NodeKind::StaticInit,
                    NodeKind::InstanceInit,
                    NodeKind::CtorIdent,
                    NodeKind::CtorIdent
                ]
            );
        }

        #[test]
        fn enum_constants_and_members() {
            let tree = parse_ok(
                "enum Planet {\n  /** Closest. */\n  MERCURY(3.3e23),\n  VENUS(4.8e24) { String toString() { 'v' } }\n\n  final double mass\n  Planet(double mass) { this.mass = mass }\n}\n",
            );
            let members = &body(first_class(&tree)).children;
            assert_eq!(members[0].kind, NodeKind::EnumConstantDef);
            assert_eq!(members[0].doc.as_deref(), Some("/** Closest. */"));
            assert_eq!(members[0].child(NodeKind::Expr).unwrap().text, "3.3e23");
            assert!(members[1].child(NodeKind::ObjBlock).is_some());
            assert_eq!(members[2].kind, NodeKind::VariableDef);
            assert_eq!(members[3].kind, NodeKind::CtorIdent);
        }

        #[test]
        fn nested_classes_and_string_method_names() {
            let tree = parse_ok(
                "class Spec {\n  def \"adds numbers\"() { expect: 1 + 1 == 2 }\n  static class Helper { }\n}\n",
            );
            let members = &body(first_class(&tree)).children;
            assert_eq!(members[0].text, "adds numbers");
            assert_eq!(members[1].kind, NodeKind::ClassDef);
            assert_eq!(members[1].text, "Helper");
        }
    }

    mod scripts {
        use super::*;

        #[test]
        fn statements_and_script_methods() {
            let tree = parse_ok(
                "#!/usr/bin/env groovy\nimport groovy.json.JsonSlurper\n\ndef data = new JsonSlurper()\n    .parseText('{}')\nprintln data\n\ndef greet(name) {\n  \"Hello $name\"\n}\n\nclass Helper {}\n",
            );
            let kinds: Vec<NodeKind> = tree.children.iter().map(|c| c.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    NodeKind::Import,
                    NodeKind::Statement,
                    NodeKind::Statement,
                    NodeKind::MethodDef,
                    NodeKind::ClassDef
                ]
            );
            assert_eq!(
                tree.children[1].text,
                "def data = new JsonSlurper() .parseText('{}')"
            );
        }

        #[test]
        fn call_statements_are_not_methods() {
            let tree = parse_ok(
                "foo(1)\nString s = bar()\nprintln total([1, 2])\nif (x) {\n  y()\n} else {\n  z()\n}\n",
            );
            assert!(tree.children.iter().all(|c| c.kind == NodeKind::Statement));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn missing_closing_brace_is_grammar_error() {
            let err = parse("class Foo {\n  def x\n").unwrap_err();
            assert!(matches!(err, ParseError::Grammar { .. }));
            assert!(err.to_string().contains("end of input"));
        }

        #[test]
        fn stray_closing_brace_is_grammar_error() {
            let err = parse("class Foo { }\n}\n").unwrap_err();
            assert_eq!(err.pos(), Position::new(2, 1));
        }

        #[test]
        fn unterminated_string_is_token_stream_error() {
            let err = parse("def s = 'oops\n").unwrap_err();
            assert!(matches!(err, ParseError::TokenStream { .. }));
        }

        #[test]
        fn garbage_in_class_body() {
            let err = parse("class Foo {\n  int x y z\n}\n").unwrap_err();
            assert!(matches!(err, ParseError::Grammar { .. }));
        }

        #[test]
        fn deeply_nested_classes_are_rejected() {
            let depth = 200;
            let mut source = String::new();
            for i in 0..depth {
                source.push_str(&format!("class C{i} {{\n"));
            }
            source.push_str(&"}\n".repeat(depth));
            let err = parse(&source).unwrap_err();
            assert!(matches!(err, ParseError::Grammar { .. }));
            assert!(err.to_string().contains("nesting too deep"));
        }

        #[test]
        fn moderate_nesting_parses() {
            let depth = 32;
            let mut source = String::new();
            for i in 0..depth {
                source.push_str(&format!("class C{i} {{\n"));
            }
            source.push_str(&"}\n".repeat(depth));
            parse_ok(&source);
        }
    }
}
