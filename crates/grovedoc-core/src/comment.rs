//! Doc comment processing.
//!
//! Turns a raw `/** ... */` comment into a description, its first sentence and
//! its block tags (`@param`, `@return`, `@see`, ...). Inline tags such as
//! `{@link Foo}` are left in the text untouched.

use serde::Serialize;

/// Block tags whose first word is an argument rather than text.
const TAGS_WITH_ARGUMENT: &[&str] = &["param", "throws", "exception"];

/// A block tag of a doc comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTag {
    /// Tag name without the `@`.
    pub name: String,
    /// Parameter or exception name for `@param`, `@throws`, `@exception`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    pub text: String,
}

/// A processed doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    /// Comment body before the first block tag.
    pub description: String,
    /// First sentence of the description.
    pub first_sentence: String,
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Parse a raw doc comment, with or without its `/**` and `*/` delimiters.
    pub fn parse(raw: &str) -> Self {
        let body = strip_delimiters(raw);
        let mut description_lines: Vec<&str> = Vec::new();
        let mut tags: Vec<(String, Vec<&str>)> = Vec::new();

        for line in body.lines().map(strip_margin) {
            if let Some(rest) = line.strip_prefix('@') {
                let name_len = rest
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(rest.len());
                let (name, text) = rest.split_at(name_len);
                tags.push((name.to_string(), vec![text.trim_start()]));
            } else if let Some((_, lines)) = tags.last_mut() {
                lines.push(line.trim_start());
            } else {
                description_lines.push(line);
            }
        }

        let description = description_lines.join("\n").trim().to_string();
        let first_sentence = first_sentence(&description);
        let tags = tags
            .into_iter()
            .map(|(name, lines)| make_tag(name, lines.join("\n").trim()))
            .collect();

        DocComment {
            description,
            first_sentence,
            tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.tags.is_empty()
    }

    /// Texts of all tags named `name`.
    pub fn tag_texts<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.tags
            .iter()
            .filter(move |t| t.name == name)
            .map(|t| t.text.as_str())
    }

    /// Text of the `@param` tag for `param`, if present.
    pub fn param(&self, param: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == "param" && t.argument.as_deref() == Some(param))
            .map(|t| t.text.as_str())
    }

    /// Whether the comment carries a `@deprecated` tag.
    pub fn is_deprecated(&self) -> bool {
        self.tags.iter().any(|t| t.name == "deprecated")
    }
}

fn make_tag(name: String, text: &str) -> DocTag {
    if TAGS_WITH_ARGUMENT.contains(&name.as_str()) {
        let split = text.find(char::is_whitespace).unwrap_or(text.len());
        let (argument, rest) = text.split_at(split);
        DocTag {
            name,
            argument: (!argument.is_empty()).then(|| argument.to_string()),
            text: rest.trim().to_string(),
        }
    } else {
        DocTag {
            name,
            argument: None,
            text: text.to_string(),
        }
    }
}

fn strip_delimiters(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw.strip_prefix("/**").unwrap_or(raw);
    raw.strip_suffix("*/").unwrap_or(raw)
}

/// Drop leading whitespace, one leading `*`, and one following space.
fn strip_margin(line: &str) -> &str {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    let line = line.strip_prefix(' ').unwrap_or(line);
    line.trim_end()
}

/// Text up to and including the first period that is followed by whitespace
/// or ends the text.
fn first_sentence(text: &str) -> String {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '.' && chars.peek().is_none_or(|(_, next)| next.is_whitespace()) {
            return normalize_space(&text[..=i]);
        }
    }
    normalize_space(text)
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_delimiters_and_margins() {
        let doc = DocComment::parse("/**\n * Adds two numbers.\n * Really.\n */");
        assert_eq!(doc.description, "Adds two numbers.\nReally.");
        assert_eq!(doc.first_sentence, "Adds two numbers.");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn single_line_comment() {
        let doc = DocComment::parse("/** A widget */");
        assert_eq!(doc.description, "A widget");
        assert_eq!(doc.first_sentence, "A widget");
    }

    #[test]
    fn block_tags_with_and_without_arguments() {
        let doc = DocComment::parse(
            "/**\n * Sum.\n * @param a the first\n *        operand\n * @return the sum\n * @throws IllegalStateException never\n */",
        );
        assert_eq!(doc.description, "Sum.");
        assert_eq!(doc.tags.len(), 3);
        assert_eq!(doc.param("a"), Some("the first\noperand"));
        assert_eq!(doc.tag_texts("return").collect::<Vec<_>>(), vec!["the sum"]);
        assert_eq!(doc.tags[2].argument.as_deref(), Some("IllegalStateException"));
    }

    #[test]
    fn version_numbers_do_not_end_first_sentence() {
        let doc = DocComment::parse("/** Works with v1.5 and later. More text. */");
        assert_eq!(doc.first_sentence, "Works with v1.5 and later.");
    }

    #[test]
    fn deprecated_tag_is_detected() {
        let doc = DocComment::parse("/** Old.\n @deprecated use New */");
        assert!(doc.is_deprecated());
        assert!(!DocComment::parse("/** New. */").is_deprecated());
    }

    #[test]
    fn empty_comment() {
        let doc = DocComment::parse("/** */");
        assert!(doc.is_empty());
    }
}
