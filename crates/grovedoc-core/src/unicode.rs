//! Unicode escape translation applied to source text before tokenizing.
//!
//! `\uXXXX` escapes (with any number of `u`s) stand for the character they
//! name anywhere in a source file, identifiers and comments included. An
//! escape only starts at a backslash preceded by an even number of
//! backslashes, so `\\u0041` stays as written. Escapes that are not followed
//! by four hex digits, and unpaired surrogates, are kept verbatim.
//!
//! The decoded text keeps a map back to byte offsets in the original, so
//! positions reported by the tokenizer still point into the file as written.

use std::borrow::Cow;

/// Source text with unicode escapes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unescaped<'s> {
    text: Cow<'s, str>,
    /// `(decoded, original)` offset pairs taken just after each escape.
    shifts: Vec<(usize, usize)>,
}

impl<'s> Unescaped<'s> {
    /// Decode every escape in `source`.
    pub fn decode(source: &'s str) -> Self {
        if !source.contains("\\u") {
            return Unescaped {
                text: Cow::Borrowed(source),
                shifts: Vec::new(),
            };
        }

        let bytes = source.as_bytes();
        let mut text = String::with_capacity(source.len());
        let mut shifts = Vec::new();
        let mut copied = 0;
        let mut backslashes = 0usize;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'\\' {
                backslashes = 0;
                i += 1;
                continue;
            }
            if backslashes % 2 == 1 {
                backslashes += 1;
                i += 1;
                continue;
            }
            let Some((c, end)) = escape_at(source, i) else {
                backslashes += 1;
                i += 1;
                continue;
            };
            text.push_str(&source[copied..i]);
            text.push(c);
            shifts.push((text.len(), end));
            copied = end;
            backslashes = 0;
            i = end;
        }
        text.push_str(&source[copied..]);

        Unescaped {
            text: Cow::Owned(text),
            shifts,
        }
    }

    /// The decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any escape was decoded.
    pub fn has_escapes(&self) -> bool {
        !self.shifts.is_empty()
    }

    /// Byte offset in the original source of byte `offset` of the decoded
    /// text. A decoded character maps to the backslash of its escape.
    pub fn original_offset(&self, offset: usize) -> usize {
        let idx = self.shifts.partition_point(|&(decoded, _)| decoded <= offset);
        match idx.checked_sub(1) {
            Some(prev) => {
                let (decoded, original) = self.shifts[prev];
                original + (offset - decoded)
            }
            None => offset,
        }
    }
}

/// The character and end offset of a well-formed escape starting at the
/// backslash at `start`, combining surrogate pairs.
fn escape_at(source: &str, start: usize) -> Option<(char, usize)> {
    let (unit, end) = code_unit_at(source, start)?;
    match unit {
        0xD800..=0xDBFF => {
            let (low, pair_end) = code_unit_at(source, end)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return None;
            }
            let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(code).map(|c| (c, pair_end))
        }
        0xDC00..=0xDFFF => None,
        _ => char::from_u32(unit).map(|c| (c, end)),
    }
}

/// One `\u+XXXX` code unit at `start`.
fn code_unit_at(source: &str, start: usize) -> Option<(u32, usize)> {
    let rest = source.get(start..)?.strip_prefix('\\')?;
    let after_us = rest.trim_start_matches('u');
    let us = rest.len() - after_us.len();
    if us == 0 {
        return None;
    }
    let hex = after_us.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u32::from_str_radix(hex, 16).ok()?;
    Some((unit, start + 1 + us + 4))
}
