//! Package description extraction from `package.html` files.
//!
//! The markup accepted here is the well-formed subset of HTML that package
//! description files are written in: a document type declaration, comments,
//! processing instructions, CDATA sections, elements with quoted or bare
//! attributes, void elements such as `<br>`, and character entities. Every
//! other element must be closed, innermost first.
//!
//! [`extract_body_text`] returns the text content of the `<body>` element with
//! runs of whitespace collapsed to a single space. Block-level elements
//! separate words; inline elements do not.

use thiserror::Error;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};
use winnow::ModalResult;

use crate::lexer::LineIndex;
use crate::tree::Position;

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose boundaries separate words in the extracted text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "blockquote", "br", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "li", "ol", "p", "pre", "table", "td", "th", "tr", "ul",
];

// ============================================================================
// Errors
// ============================================================================

/// Failure to extract a description from markup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// The input is not well-formed at `pos`.
    #[error("malformed markup at {pos}: {message}")]
    Syntax { pos: Position, message: String },

    /// A closing tag does not match the innermost open element.
    #[error("mismatched tag at {pos}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        pos: Position,
        expected: String,
        found: String,
    },

    /// An element is still open at end of input.
    #[error("unclosed <{tag}> opened at {pos}")]
    Unclosed { tag: String, pos: Position },

    /// The document has no `<body>` element.
    #[error("no <body> element")]
    MissingBody,
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event<'s> {
    /// Doctype, comment or processing instruction.
    Ignored,
    Start { name: &'s str, self_closing: bool },
    End { name: &'s str },
    Text(&'s str),
    CData(&'s str),
}

fn name<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')),
    )
        .take()
        .parse_next(input)
}

fn attribute_value<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
        take_till(1.., |c: char| c.is_whitespace() || c == '>'),
    ))
    .parse_next(input)
}

fn attribute(input: &mut &str) -> ModalResult<()> {
    (
        take_while(1.., char::is_whitespace),
        name,
        opt((multispace0, '=', multispace0, attribute_value)),
    )
        .void()
        .parse_next(input)
}

fn start_tag<'s>(input: &mut &'s str) -> ModalResult<Event<'s>> {
    (
        preceded('<', name),
        repeat::<_, _, (), _, _>(0.., attribute),
        multispace0,
        opt('/'),
        '>',
    )
        .map(|(name, (), _, slash, _)| Event::Start {
            name,
            self_closing: slash.is_some(),
        })
        .parse_next(input)
}

fn end_tag<'s>(input: &mut &'s str) -> ModalResult<Event<'s>> {
    delimited("</", name, (multispace0, '>'))
        .map(|name| Event::End { name })
        .parse_next(input)
}

fn ignored<'s>(input: &mut &'s str) -> ModalResult<Event<'s>> {
    alt((
        ("<!--", take_until(0.., "-->"), "-->").void(),
        ("<?", take_until(0.., "?>"), "?>").void(),
        ("<!", take_till(0.., '>'), '>').void(),
    ))
    .value(Event::Ignored)
    .parse_next(input)
}

fn cdata<'s>(input: &mut &'s str) -> ModalResult<Event<'s>> {
    delimited("<![CDATA[", take_until(0.., "]]>"), "]]>")
        .map(Event::CData)
        .parse_next(input)
}

fn text<'s>(input: &mut &'s str) -> ModalResult<Event<'s>> {
    take_till(1.., '<').map(Event::Text).parse_next(input)
}

fn event<'s>(input: &mut &'s str) -> ModalResult<Event<'s>> {
    alt((cdata, ignored, end_tag, start_tag, text)).parse_next(input)
}

// ============================================================================
// Extraction
// ============================================================================

/// Text content of the `<body>` element, whitespace collapsed.
pub fn extract_body_text(source: &str) -> Result<String, MarkupError> {
    let lines = LineIndex::new(source);
    let mut input = source;
    let mut open: Vec<(String, Position)> = Vec::new();
    // Depth of `open` at which the body element sits, while inside it.
    let mut body_depth: Option<usize> = None;
    let mut seen_body = false;
    let mut text = String::new();

    while !input.is_empty() {
        let pos = lines.position(source.len() - input.len());
        let event = event(&mut input).map_err(|_| MarkupError::Syntax {
            pos,
            message: describe_failure(input),
        })?;

        match event {
            Event::Ignored => {}
            Event::Start { name, self_closing } => {
                let name = name.to_ascii_lowercase();
                if body_depth.is_some() && BLOCK_ELEMENTS.contains(&name.as_str()) {
                    text.push(' ');
                }
                if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                if name == "body" && body_depth.is_none() && !seen_body {
                    body_depth = Some(open.len());
                    seen_body = true;
                }
                open.push((name, pos));
            }
            Event::End { name } => {
                let name = name.to_ascii_lowercase();
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                match open.pop() {
                    Some((expected, _)) if expected == name => {
                        if body_depth == Some(open.len()) {
                            body_depth = None;
                        } else if body_depth.is_some() && BLOCK_ELEMENTS.contains(&name.as_str()) {
                            text.push(' ');
                        }
                    }
                    Some((expected, _)) => {
                        return Err(MarkupError::MismatchedTag {
                            pos,
                            expected,
                            found: name,
                        });
                    }
                    None => {
                        return Err(MarkupError::Syntax {
                            pos,
                            message: format!("closing tag </{}> without an open element", name),
                        });
                    }
                }
            }
            Event::Text(raw) => {
                if body_depth.is_some() {
                    decode_entities(raw, &mut text);
                }
            }
            Event::CData(raw) => {
                if body_depth.is_some() {
                    text.push_str(raw);
                }
            }
        }
    }

    if let Some((tag, pos)) = open.pop() {
        return Err(MarkupError::Unclosed { tag, pos });
    }
    if !seen_body {
        return Err(MarkupError::MissingBody);
    }
    Ok(collapse_whitespace(&text))
}

fn describe_failure(rest: &str) -> String {
    let snippet: String = rest.chars().take(20).collect();
    if rest.starts_with("<!--") {
        "unterminated comment".to_string()
    } else if rest.starts_with('<') {
        format!("malformed tag near {:?}", snippet)
    } else {
        format!("unexpected input near {:?}", snippet)
    }
}

/// Append `raw` to `out`, replacing character entities. Unknown entities are
/// kept verbatim.
fn decode_entities(raw: &str, out: &mut String) {
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest[1..].find(';').map(|i| i + 1) else {
            break;
        };
        let entity = &rest[1..semi];
        match decode_entity(entity) {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "copy" => Some('\u{00A9}'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
