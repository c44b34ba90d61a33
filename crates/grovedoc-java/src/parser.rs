//! Declaration-level Java parser producing a [`JavaKind`] tree.
//!
//! The tree has the normalized shape (see `grovedoc_core::tree`) with two
//! Java-only features: constructors are `CtorDef` nodes, and C-style array
//! dimensions written after a name (`String args[]`) are kept as an
//! `ArrayDeclarator` child instead of being part of the `Type`.
//!
//! Bodies and initializers are skipped as balanced token runs. The grammar is
//! strict about terminators: fields, imports, abstract methods and the package
//! clause must end in `;`.

use grovedoc_core::cursor::TokenCursor;
use grovedoc_core::error::{ParseError, ParseResult};
use grovedoc_core::lexer::{tokenize, LexerConfig, TokenKind};
use grovedoc_core::tree::{Position, SyntaxNode};

use crate::kind::JavaKind;

type Node = SyntaxNode<JavaKind>;

pub const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

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
    "default",
];

const NO_SOFT_KEYWORDS: &[&str] = &[];

/// Deepest allowed nesting of class bodies, enum constant bodies included.
const MAX_CLASS_NESTING: usize = 64;

pub(crate) const LEXER: LexerConfig = LexerConfig {
    keywords: KEYWORDS,
    significant_newlines: false,
    allow_shebang: false,
};

/// Parse Java source into its native tree.
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
    fn compilation_unit(mut self) -> ParseResult<Node> {
        let mut unit = Node::new(JavaKind::CompilationUnit, "", Position::new(1, 1));
        loop {
            if self.cursor.eat_punct(';') {
                continue;
            }
            if self.cursor.at_eof() {
                return Ok(unit);
            }
            let mark = self.cursor.mark();
            let modifiers = self.modifiers()?;
            if self.cursor.at_keyword("package") {
                unit.push(self.package_def()?);
            } else if self.cursor.at_keyword("import") && modifiers.children.is_empty() {
                unit.push(self.import()?);
            } else if self.at_type_def() {
                unit.push(self.type_def(mark, modifiers)?);
            } else {
                return Err(self.cursor.unexpected("type declaration"));
            }
        }
    }

    fn package_def(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_keyword("package")?.pos;
        let name = self.cursor.qualified_name(NO_SOFT_KEYWORDS)?;
        self.cursor.expect_punct(';')?;
        Ok(Node::new(JavaKind::PackageDef, name, pos))
    }

    fn import(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_keyword("import")?.pos;
        let kind = if self.cursor.eat_keyword("static") {
            JavaKind::StaticImport
        } else {
            JavaKind::Import
        };
        let mut name = self.cursor.qualified_name(NO_SOFT_KEYWORDS)?;
        if self.cursor.eat_punct('.') {
            self.cursor.expect_punct('*')?;
            name.push_str(".*");
        }
        self.cursor.expect_punct(';')?;
        Ok(Node::new(kind, name, pos))
    }

    // ------------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------------

    fn at_type_def(&self) -> bool {
        let token = self.cursor.peek();
        token.is_keyword("class")
            || token.is_keyword("interface")
            || token.is_keyword("enum")
            || (token.is_punct('@') && self.cursor.peek_nth(1).is_keyword("interface"))
    }

    fn type_def(&mut self, mark: usize, modifiers: Node) -> ParseResult<Node> {
        let kind = if self.cursor.eat_punct('@') {
            self.cursor.expect_keyword("interface")?;
            JavaKind::AnnotationDef
        } else {
            match self.cursor.bump().text.as_str() {
                "class" => JavaKind::ClassDef,
                "interface" => JavaKind::InterfaceDef,
                _ => JavaKind::EnumDef,
            }
        };
        let name = self.cursor.expect_ident(NO_SOFT_KEYWORDS)?.text;
        let mut node = Node::new(kind, name.clone(), self.cursor.pos_at(mark))
            .with_doc(self.cursor.doc_at_mark(mark))
            .with_child(modifiers);
        if self.cursor.at_punct('<') {
            node.push(self.type_parameters()?);
        }
        if self.cursor.at_keyword("extends") {
            node.push(self.type_list(JavaKind::ExtendsClause, "extends")?);
        }
        if self.cursor.at_keyword("implements") {
            node.push(self.type_list(JavaKind::ImplementsClause, "implements")?);
        }
        node.push(self.class_body(&name, kind == JavaKind::EnumDef)?);
        Ok(node)
    }

    fn type_list(&mut self, kind: JavaKind, keyword: &str) -> ParseResult<Node> {
        let pos = self.cursor.expect_keyword(keyword)?.pos;
        let mut clause = Node::new(kind, "", pos);
        loop {
            let type_pos = self.cursor.pos();
            let ty = self.cursor.type_text(PRIMITIVES, NO_SOFT_KEYWORDS)?;
            clause.push(Node::new(JavaKind::Type, ty, type_pos));
            if !self.cursor.eat_punct(',') {
                return Ok(clause);
            }
        }
    }

    fn type_parameters(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('<')?.pos;
        let mut params = Node::new(JavaKind::TypeParameters, "", pos);
        loop {
            let mark = self.cursor.mark();
            let param_pos = self.cursor.pos();
            self.cursor.expect_ident(NO_SOFT_KEYWORDS)?;
            if self.cursor.eat_keyword("extends") {
                loop {
                    self.cursor.type_text(PRIMITIVES, NO_SOFT_KEYWORDS)?;
                    if !self.cursor.eat_punct('&') {
                        break;
                    }
                }
            }
            params.push(Node::new(
                JavaKind::TypeParameter,
                self.cursor.text_since(mark),
                param_pos,
            ));
            if !self.cursor.eat_punct(',') {
                self.cursor.expect_punct('>')?;
                return Ok(params);
            }
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
        let mut block = Node::new(JavaKind::ObjBlock, "", pos);
        if is_enum {
            self.enum_constants(&mut block)?;
        }
        loop {
            if self.cursor.eat_punct(';') {
                continue;
            }
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
            if self.cursor.at_punct('}') || self.cursor.eat_punct(';') {
                return Ok(());
            }
            let mark = self.cursor.mark();
            let mut annotations = Vec::new();
            while self.cursor.at_punct('@') {
                annotations.push(self.annotation()?);
            }
            let name = self.cursor.expect_ident(NO_SOFT_KEYWORDS)?.text;
            let mut constant = Node::new(JavaKind::EnumConstantDef, name, self.cursor.pos_at(mark))
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
            block.push(constant);
            if !self.cursor.eat_punct(',') {
                if !self.cursor.at_punct('}') {
                    self.cursor.expect_punct(';')?;
                }
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
            return Ok(vec![self.initializer(JavaKind::InstanceInit, pos)?]);
        }
        if self.cursor.at_keyword("static") && self.cursor.peek_nth(1).is_punct('{') {
            self.cursor.bump();
            return Ok(vec![self.initializer(JavaKind::StaticInit, pos)?]);
        }

        let modifiers = self.modifiers()?;
        if self.at_type_def() {
            return Ok(vec![self.type_def(mark, modifiers)?]);
        }

        let doc = self.cursor.doc_at_mark(mark);
        let pos = self.cursor.pos_at(mark);
        let type_params = if self.cursor.at_punct('<') {
            Some(self.type_parameters()?)
        } else {
            None
        };

        let is_ctor = {
            let token = self.cursor.peek();
            token.kind == TokenKind::Ident
                && token.text == class_name
                && self.cursor.peek_nth(1).is_punct('(')
        };
        if is_ctor {
            let name = self.cursor.bump().text;
            let mut ctor = Node::new(JavaKind::CtorDef, name, pos)
                .with_doc(doc)
                .with_child(modifiers);
            if let Some(type_params) = type_params {
                ctor.push(type_params);
            }
            self.method_rest(&mut ctor)?;
            return Ok(vec![ctor]);
        }

        let type_pos = self.cursor.pos();
        let ty = Node::new(
            JavaKind::Type,
            self.cursor.type_text(PRIMITIVES, NO_SOFT_KEYWORDS)?,
            type_pos,
        );
        let name = self.cursor.expect_ident(NO_SOFT_KEYWORDS)?.text;

        if self.cursor.at_punct('(') {
            let mut method = Node::new(JavaKind::MethodDef, name, pos)
                .with_doc(doc)
                .with_child(modifiers);
            if let Some(type_params) = type_params {
                method.push(type_params);
            }
            method.push(ty);
            self.method_rest(&mut method)?;
            return Ok(vec![method]);
        }
        if let Some(params) = type_params {
            return Err(ParseError::grammar(params.pos, "type parameters on a field"));
        }

        let mut fields = Vec::new();
        let mut name = name;
        let mut field_pos = pos;
        loop {
            let mut field = Node::new(JavaKind::VariableDef, name, field_pos)
                .with_doc(doc.clone())
                .with_child(modifiers.clone())
                .with_child(ty.clone());
            if let Some(dims) = self.array_dims() {
                field.push(dims);
            }
            if self.cursor.eat_punct('=') {
                let expr_pos = self.cursor.pos();
                let expr_mark = self.cursor.mark();
                self.cursor
                    .skip_until(|c| c.at_punct(',') || c.at_punct(';'))?;
                field.push(Node::new(JavaKind::Expr, self.cursor.text_since(expr_mark), expr_pos));
            }
            fields.push(field);
            if !self.cursor.eat_punct(',') {
                break;
            }
            field_pos = self.cursor.pos();
            name = self.cursor.expect_ident(NO_SOFT_KEYWORDS)?.text;
        }
        self.cursor.expect_punct(';')?;
        Ok(fields)
    }

    fn initializer(&mut self, kind: JavaKind, pos: Position) -> ParseResult<Node> {
        let body_pos = self.cursor.pos();
        self.cursor.skip_balanced()?;
        Ok(Node::new(kind, "", pos).with_child(Node::new(JavaKind::Slist, "", body_pos)))
    }

    fn method_rest(&mut self, method: &mut Node) -> ParseResult<()> {
        method.push(self.parameters()?);
        if let Some(dims) = self.array_dims() {
            method.push(dims);
        }
        if self.cursor.at_keyword("throws") {
            method.push(self.type_list(JavaKind::Throws, "throws")?);
        }
        if self.cursor.eat_keyword("default") {
            let expr_pos = self.cursor.pos();
            let mark = self.cursor.mark();
            self.cursor.skip_until(|c| c.at_punct(';'))?;
            method.kind = JavaKind::AnnotationFieldDef;
            method.push(Node::new(JavaKind::Expr, self.cursor.text_since(mark), expr_pos));
            self.cursor.expect_punct(';')?;
            return Ok(());
        }
        if self.cursor.at_punct('{') {
            let body_pos = self.cursor.pos();
            self.cursor.skip_balanced()?;
            method.push(Node::new(JavaKind::Slist, "", body_pos));
            return Ok(());
        }
        self.cursor.expect_punct(';')?;
        Ok(())
    }

    fn parameters(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('(')?.pos;
        let mut params = Node::new(JavaKind::Parameters, "", pos);
        if self.cursor.eat_punct(')') {
            return Ok(params);
        }
        loop {
            params.push(self.parameter()?);
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
        let ty = self.cursor.type_text(PRIMITIVES, NO_SOFT_KEYWORDS)?;
        let kind = if self.cursor.peek().kind == TokenKind::Ellipsis {
            self.cursor.bump();
            JavaKind::VariableParameterDef
        } else {
            JavaKind::ParameterDef
        };
        let name = self.cursor.expect_ident(NO_SOFT_KEYWORDS)?.text;
        let mut param = Node::new(kind, name, pos)
            .with_child(modifiers)
            .with_child(Node::new(JavaKind::Type, ty, type_pos));
        if let Some(dims) = self.array_dims() {
            param.push(dims);
        }
        Ok(param)
    }

    /// `[]` pairs written after a name.
    fn array_dims(&mut self) -> Option<Node> {
        let pos = self.cursor.pos();
        let mut dims = String::new();
        while self.cursor.at_punct('[') && self.cursor.peek_nth(1).is_punct(']') {
            self.cursor.bump();
            self.cursor.bump();
            dims.push_str("[]");
        }
        (!dims.is_empty()).then(|| Node::new(JavaKind::ArrayDeclarator, dims, pos))
    }

    // ------------------------------------------------------------------------
    // Modifiers and annotations
    // ------------------------------------------------------------------------

    fn modifiers(&mut self) -> ParseResult<Node> {
        let mut modifiers = Node::new(JavaKind::Modifiers, "", self.cursor.pos());
        loop {
            let token = self.cursor.peek();
            if token.is_punct('@') && !self.cursor.peek_nth(1).is_keyword("interface") {
                modifiers.push(self.annotation()?);
            } else if token.kind == TokenKind::Keyword && MODIFIERS.contains(&token.text.as_str()) {
                let token = self.cursor.bump();
                modifiers.push(Node::new(JavaKind::Modifier, token.text, token.pos));
            } else {
                return Ok(modifiers);
            }
        }
    }

    fn annotation(&mut self) -> ParseResult<Node> {
        let pos = self.cursor.expect_punct('@')?.pos;
        let name = self.cursor.qualified_name(NO_SOFT_KEYWORDS)?;
        let mut annotation = Node::new(JavaKind::Annotation, name, pos);
        if self.cursor.at_punct('(') {
            annotation.push(self.parenthesized_expr()?);
        }
        Ok(annotation)
    }

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
        Ok(Node::new(JavaKind::Expr, inner, pos))
    }
}

// ============================================================================
// Tests
// ============================================================================
