//! Token cursor used by the hand-written declaration parsers.
//!
//! The cursor owns the token list produced by [`tokenize`](crate::lexer::tokenize),
//! with doc comments folded onto the token that follows them: a declaration
//! picks up its comment from its first token via [`TokenCursor::doc_at_mark`].

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenKind};
use crate::tree::Position;

/// A token plus the doc comment immediately preceding it.
#[derive(Debug, Clone)]
struct Slot {
    token: Token,
    doc: Option<String>,
}

/// Forward-only cursor over a token list.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    slots: Vec<Slot>,
    index: usize,
}

impl TokenCursor {
    /// Build a cursor, attaching every doc comment to the next real token.
    ///
    /// Newlines between a doc comment and its declaration do not detach it;
    /// any other token does.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut slots: Vec<Slot> = Vec::with_capacity(tokens.len());
        let mut pending: Option<String> = None;
        for token in tokens {
            match token.kind {
                TokenKind::DocComment => pending = Some(token.text),
                TokenKind::Newline => slots.push(Slot { token, doc: None }),
                _ => {
                    let doc = pending.take();
                    slots.push(Slot { token, doc });
                }
            }
        }
        if slots.last().is_none_or(|s| !s.token.is_eof()) {
            let pos = slots.last().map(|s| s.token.pos).unwrap_or_default();
            slots.push(Slot {
                token: Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    pos,
                    spaced: false,
                },
                doc: None,
            });
        }
        TokenCursor { slots, index: 0 }
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// The current token.
    pub fn peek(&self) -> &Token {
        &self.slots[self.index].token
    }

    /// The token `n` positions ahead (0 is the current token). Past the end,
    /// this is the end-of-input token.
    pub fn peek_nth(&self, n: usize) -> &Token {
        let i = (self.index + n).min(self.slots.len() - 1);
        &self.slots[i].token
    }

    /// The `n`-th token ahead that is not a newline.
    pub fn peek_significant(&self, n: usize) -> &Token {
        let mut seen = 0;
        for slot in &self.slots[self.index..] {
            if slot.token.kind == TokenKind::Newline {
                continue;
            }
            if seen == n {
                return &slot.token;
            }
            seen += 1;
        }
        &self.slots[self.slots.len() - 1].token
    }

    pub fn pos(&self) -> Position {
        self.peek().pos
    }

    pub fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    pub fn at_punct(&self, c: char) -> bool {
        self.peek().is_punct(c)
    }

    pub fn at_keyword(&self, kw: &str) -> bool {
        self.peek().is_keyword(kw)
    }

    pub fn at_newline(&self) -> bool {
        self.peek().kind == TokenKind::Newline
    }

    /// Current index, for use with [`TokenCursor::doc_at_mark`] and
    /// [`TokenCursor::text_since`].
    pub fn mark(&self) -> usize {
        self.index
    }

    /// Doc comment attached to the token at `mark`.
    pub fn doc_at_mark(&self, mark: usize) -> Option<String> {
        self.slots.get(mark).and_then(|s| s.doc.clone())
    }

    /// Position of the token at `mark`.
    pub fn pos_at(&self, mark: usize) -> Position {
        let i = mark.min(self.slots.len() - 1);
        self.slots[i].token.pos
    }

    /// Return to an earlier mark.
    pub fn rewind(&mut self, mark: usize) {
        self.index = mark.min(self.slots.len() - 1);
    }

    /// The last consumed token, if any.
    pub fn prev(&self) -> Option<&Token> {
        self.index.checked_sub(1).map(|i| &self.slots[i].token)
    }

    /// Source-like text of the tokens from `mark` up to the current token.
    ///
    /// Tokens are joined with a single space where the source had whitespace;
    /// newlines are rendered as spaces.
    pub fn text_since(&self, mark: usize) -> String {
        let mut out = String::new();
        for slot in &self.slots[mark..self.index] {
            let token = &slot.token;
            if token.kind == TokenKind::Newline {
                continue;
            }
            if token.spaced && !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }

    // ------------------------------------------------------------------------
    // Consumption
    // ------------------------------------------------------------------------

    /// Consume and return the current token. The end-of-input token is never
    /// consumed.
    pub fn bump(&mut self) -> Token {
        let token = self.slots[self.index].token.clone();
        if !token.is_eof() {
            self.index += 1;
        }
        token
    }

    pub fn eat_punct(&mut self, c: char) -> bool {
        if self.at_punct(c) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Skip newline tokens.
    pub fn skip_newlines(&mut self) {
        while self.at_newline() {
            self.index += 1;
        }
    }

    /// Skip newlines and semicolons.
    pub fn skip_separators(&mut self) {
        while self.at_newline() || self.at_punct(';') {
            self.index += 1;
        }
    }

    pub fn expect_punct(&mut self, c: char) -> ParseResult<Token> {
        if self.at_punct(c) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    pub fn expect_keyword(&mut self, kw: &str) -> ParseResult<Token> {
        if self.at_keyword(kw) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&format!("'{}'", kw)))
        }
    }

    /// Expect an identifier. Contextual words listed in `soft_keywords` are
    /// accepted as identifiers too.
    pub fn expect_ident(&mut self, soft_keywords: &[&str]) -> ParseResult<Token> {
        let token = self.peek();
        let ok = token.kind == TokenKind::Ident
            || (token.kind == TokenKind::Keyword && soft_keywords.contains(&token.text.as_str()));
        if ok {
            Ok(self.bump())
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// A grammar error describing the current token.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.is_eof() {
            ParseError::grammar(
                token.pos,
                format!("unexpected end of input, expected {}", expected),
            )
        } else {
            ParseError::grammar(
                token.pos,
                format!("unexpected {}, expected {}", token.describe(), expected),
            )
        }
    }

    /// Consume a bracketed run starting at the current `open` token, through
    /// its matching `close`. Nested brackets of all three kinds must balance.
    pub fn skip_balanced(&mut self) -> ParseResult<()> {
        let start = self.peek().clone();
        let mut stack: Vec<char> = Vec::new();
        loop {
            let token = self.bump();
            if token.is_eof() {
                return Err(ParseError::grammar(
                    start.pos,
                    format!("unexpected end of input, '{}' is never closed", start.text),
                ));
            }
            if token.kind != TokenKind::Punct {
                if stack.is_empty() {
                    return Err(ParseError::grammar(token.pos, "expected a bracket"));
                }
                continue;
            }
            match token.text.as_str() {
                "(" => stack.push(')'),
                "[" => stack.push(']'),
                "{" => stack.push('}'),
                ")" | "]" | "}" => {
                    let close = token.text.chars().next().unwrap_or(')');
                    match stack.pop() {
                        Some(expected) if expected == close => {}
                        Some(expected) => {
                            return Err(ParseError::grammar(
                                token.pos,
                                format!("unexpected '{}', expected '{}'", close, expected),
                            ));
                        }
                        None => {
                            return Err(ParseError::grammar(
                                token.pos,
                                format!("unexpected '{}'", close),
                            ));
                        }
                    }
                }
                _ => {}
            }
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    /// Dotted name `a.b.C`. Newlines are not allowed inside the name.
    pub fn qualified_name(&mut self, soft_keywords: &[&str]) -> ParseResult<String> {
        let mut name = self.expect_ident(soft_keywords)?.text;
        while self.at_punct('.') && self.peek_nth(1).kind == TokenKind::Ident {
            self.bump();
            name.push('.');
            name.push_str(&self.bump().text);
        }
        Ok(name)
    }

    /// Consume a `<...>` run of type arguments or parameters, starting at the
    /// current `<`. Only type syntax may appear inside.
    pub fn skip_angles(&mut self) -> ParseResult<()> {
        let start = self.expect_punct('<')?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.peek();
            if token.is_eof() {
                return Err(ParseError::grammar(
                    start.pos,
                    "unexpected end of input, '<' is never closed",
                ));
            }
            match token.kind {
                TokenKind::Punct => match token.text.as_str() {
                    "<" => depth += 1,
                    ">" => depth -= 1,
                    "," | "." | "?" | "&" | "[" | "]" | "@" => {}
                    _ => return Err(self.unexpected("type argument")),
                },
                TokenKind::Ident | TokenKind::Keyword | TokenKind::Newline => {}
                _ => return Err(self.unexpected("type argument")),
            }
            self.bump();
        }
        Ok(())
    }

    /// A type as written: a primitive, or a dotted name with optional type
    /// arguments on any segment, followed by optional `[]` pairs.
    ///
    /// Returns the source-like type text (`Map<String, List<Integer>>[]`).
    pub fn type_text(&mut self, primitives: &[&str], soft_keywords: &[&str]) -> ParseResult<String> {
        let mark = self.mark();
        let token = self.peek();
        if token.kind == TokenKind::Keyword && primitives.contains(&token.text.as_str()) {
            self.bump();
        } else {
            self.expect_ident(soft_keywords)?;
            loop {
                if self.at_punct('<') {
                    self.skip_angles()?;
                }
                if self.at_punct('.') && self.peek_nth(1).kind == TokenKind::Ident {
                    self.bump();
                    self.bump();
                } else {
                    break;
                }
            }
        }
        while self.at_punct('[') && self.peek_nth(1).is_punct(']') {
            self.bump();
            self.bump();
        }
        Ok(self.text_since(mark))
    }

    /// Consume tokens until `stop` returns true for a token at bracket depth
    /// zero (that token is not consumed). Brackets are skipped as balanced runs.
    ///
    /// Used for initializers and default values, whose content is opaque.
    pub fn skip_until(&mut self, mut stop: impl FnMut(&TokenCursor) -> bool) -> ParseResult<()> {
        loop {
            if self.at_eof() || stop(self) {
                return Ok(());
            }
            let token = self.peek();
            if token.is_punct('(') || token.is_punct('[') || token.is_punct('{') {
                self.skip_balanced()?;
            } else if token.is_punct(')') || token.is_punct(']') || token.is_punct('}') {
                return Ok(());
            } else {
                self.bump();
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
