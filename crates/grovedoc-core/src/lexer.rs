//! Tokenizer shared by the language front ends.
//!
//! Both languages share their lexical structure closely enough that one
//! tokenizer serves both; the differences (keyword set, significant newlines,
//! a leading `#!` line) are carried by [`LexerConfig`].
//!
//! The tokenizer only needs to be precise about the things a declaration-level
//! parser depends on: identifiers, brackets, string and comment boundaries, and
//! doc comments. Operators are emitted as single punctuation characters.
//!
//! Any input that cannot be split into tokens is reported as
//! [`ParseError::TokenStream`].

use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_until, take_while};
use winnow::ModalResult;

use crate::error::{ParseError, ParseResult};
use crate::tree::Position;
use crate::unicode::Unescaped;

// ============================================================================
// Tokens
// ============================================================================

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Keyword,
    Number,
    StringLit,
    CharLit,
    /// A `/** ... */` comment. Other comments are dropped.
    DocComment,
    /// End of line; only emitted when newlines are significant.
    Newline,
    /// A single punctuation or operator character.
    Punct,
    /// `...`
    Ellipsis,
    Eof,
}

/// A token with its text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
    /// Whether whitespace, a comment, or a newline precedes this token.
    pub spaced: bool,
}

impl Token {
    /// Whether this is the punctuation character `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }

    /// Whether this is the keyword `kw`.
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    /// Whether this is an identifier or keyword spelled `word`.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Keyword) && self.text == word
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::StringLit => "string literal".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Dialect settings for [`tokenize`].
#[derive(Debug, Clone, Copy)]
pub struct LexerConfig {
    /// Reserved words; matching identifiers become [`TokenKind::Keyword`].
    pub keywords: &'static [&'static str],
    /// Emit [`TokenKind::Newline`] tokens.
    pub significant_newlines: bool,
    /// Treat a `#!` first line as a comment.
    pub allow_shebang: bool,
}

/// `\` appears in regex-style literals inside Groovy method bodies.
const PUNCTUATION: &str = "{}()[]<>;,.=@?:+-*/%!~&|^\\";

// ============================================================================
// Line Index
// ============================================================================

/// Maps byte offsets to line/column positions.
pub(crate) struct LineIndex<'s> {
    source: &'s str,
    starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        LineIndex { source, starts }
    }

    pub(crate) fn position(&self, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.starts[line];
        let column = self.source[start..offset].chars().count() + 1;
        Position::new(line as u32 + 1, column as u32)
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Split `source` into tokens. The last token is always [`TokenKind::Eof`].
///
/// Unicode escapes are decoded first (see [`Unescaped`]); positions still
/// refer to `source` as written.
pub fn tokenize(source: &str, config: &LexerConfig) -> ParseResult<Vec<Token>> {
    let lines = LineIndex::new(source);
    let unescaped = Unescaped::decode(source);
    let decoded = unescaped.text();
    let mut input = decoded;
    let mut tokens = Vec::new();
    let mut spaced = false;

    if config.allow_shebang && input.starts_with("#!") {
        let _ = line_comment_body(&mut input);
        spaced = true;
    }

    loop {
        let offset = decoded.len() - input.len();
        let pos = lines.position(unescaped.original_offset(offset));
        let Some(c) = input.chars().next() else {
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                pos,
                spaced,
            });
            return Ok(tokens);
        };

        let (kind, text) = match c {
            ' ' | '\t' | '\r' | '\u{000C}' => {
                let _ = whitespace(&mut input);
                spaced = true;
                continue;
            }
            '\n' => {
                input = &input[1..];
                if config.significant_newlines {
                    tokens.push(Token {
                        kind: TokenKind::Newline,
                        text: "\n".to_string(),
                        pos,
                        spaced,
                    });
                }
                spaced = true;
                continue;
            }
            '/' if input.starts_with("//") => {
                let _ = line_comment_body(&mut input);
                spaced = true;
                continue;
            }
            '/' if input.starts_with("/*") => {
                let comment = block_comment(&mut input)
                    .map_err(|_| ParseError::token_stream(pos, "unterminated comment"))?;
                let is_doc = comment.starts_with("/**") && comment != "/**/";
                if !is_doc {
                    if config.significant_newlines && comment.contains('\n') {
                        tokens.push(Token {
                            kind: TokenKind::Newline,
                            text: "\n".to_string(),
                            pos,
                            spaced,
                        });
                    }
                    spaced = true;
                    continue;
                }
                (TokenKind::DocComment, comment)
            }
            '"' | '\'' => {
                let literal = string_literal(&mut input).map_err(|_| {
                    ParseError::token_stream(pos, "unterminated string literal")
                })?;
                let kind = if c == '\'' && is_char_literal(literal) {
                    TokenKind::CharLit
                } else {
                    TokenKind::StringLit
                };
                (kind, literal)
            }
            c if is_ident_start(c) => {
                let word = identifier(&mut input)
                    .map_err(|_| ParseError::token_stream(pos, "malformed identifier"))?;
                let kind = if config.keywords.contains(&word) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Ident
                };
                (kind, word)
            }
            c if c.is_ascii_digit() => {
                let number = number(&mut input)
                    .map_err(|_| ParseError::token_stream(pos, "malformed number"))?;
                (TokenKind::Number, number)
            }
            '.' if input.starts_with("...") => {
                input = &input[3..];
                (TokenKind::Ellipsis, "...")
            }
            c if PUNCTUATION.contains(c) => {
                let text = &input[..c.len_utf8()];
                input = &input[c.len_utf8()..];
                (TokenKind::Punct, text)
            }
            other => {
                return Err(ParseError::token_stream(
                    pos,
                    format!("unexpected character '{}'", other.escape_default()),
                ));
            }
        };

        tokens.push(Token {
            kind,
            text: text.to_string(),
            pos,
            spaced,
        });
        spaced = false;
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

/// A single-quoted literal holding exactly one (possibly escaped) character.
fn is_char_literal(literal: &str) -> bool {
    let inner = &literal[1..literal.len() - 1];
    let mut chars = inner.chars();
    match chars.next() {
        Some('\\') => true,
        Some(_) => chars.next().is_none(),
        None => false,
    }
}

// ============================================================================
// Token parsers (winnow)
// ============================================================================

fn whitespace<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., [' ', '\t', '\r', '\u{000C}']).parse_next(input)
}

fn line_comment_body<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(0.., |c: char| c != '\n').parse_next(input)
}

fn block_comment<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    ("/*", take_until(0.., "*/"), "*/").take().parse_next(input)
}

fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)
}

/// Integer, decimal, hex and suffixed literals. A `.` only continues the
/// number when a digit follows, so `1..5` stays a range.
fn number<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        opt((
            '.',
            one_of(|c: char| c.is_ascii_digit()),
            take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
    )
        .take()
        .parse_next(input)
}

fn string_literal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        triple_quoted("\"\"\""),
        triple_quoted("'''"),
        quoted('"'),
        quoted('\''),
    ))
    .parse_next(input)
}

fn triple_quoted<'s>(delim: &'static str) -> impl FnMut(&mut &'s str) -> ModalResult<&'s str> {
    move |input: &mut &'s str| {
        (
            delim,
            cut_err((
                repeat::<_, _, (), _, _>(
                    0..,
                    alt((escape, preceded(opt_not(delim), any).void())),
                ),
                delim,
            )),
        )
            .take()
            .parse_next(input)
    }
}

fn quoted<'s>(quote: char) -> impl FnMut(&mut &'s str) -> ModalResult<&'s str> {
    move |input: &mut &'s str| {
        delimited(
            quote,
            repeat::<_, _, (), _, _>(0.., alt((escape, none_of([quote, '\\', '\n']).void()))),
            quote,
        )
        .take()
        .parse_next(input)
    }
}

fn escape(input: &mut &str) -> ModalResult<()> {
    ('\\', any).void().parse_next(input)
}

/// Succeeds without consuming input unless `delim` comes next.
fn opt_not<'s>(delim: &'static str) -> impl FnMut(&mut &'s str) -> ModalResult<()> {
    move |input: &mut &'s str| {
        if input.starts_with(delim) {
            Err(winnow::error::ErrMode::Backtrack(
                winnow::error::ContextError::new(),
            ))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
