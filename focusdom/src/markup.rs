//! Lenient HTML fragment parser and escaping helpers.
//!
//! Recovery follows what browsers do with sloppy markup: stray closing tags
//! are dropped, a closing tag closes every element opened after its match,
//! and elements still open at the end of input are closed implicitly.

use thiserror::Error;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),
    #[error("unterminated attribute value starting at byte {0}")]
    UnterminatedAttribute(usize),
}

/// A parsed node, not yet attached to any document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ParsedNode>,
    },
    Text(String),
}

struct Open {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

impl Open {
    fn into_node(self) -> ParsedNode {
        ParsedNode::Element {
            tag: self.tag,
            attrs: self.attrs,
            children: self.children,
        }
    }
}

/// Parse a fragment of markup into top-level nodes.
pub fn parse_fragment(input: &str) -> Result<Vec<ParsedNode>, MarkupError> {
    let mut pos = 0;
    let mut roots = Vec::new();
    let mut open: Vec<Open> = Vec::new();

    while pos < input.len() {
        let rest = &input[pos..];

        if rest.starts_with("<!--") {
            let Some(end) = rest[4..].find("-->") else {
                return Err(MarkupError::UnterminatedComment(pos));
            };
            pos += 4 + end + 3;
        } else if rest.starts_with("</") {
            let Some(end) = rest.find('>') else {
                return Err(MarkupError::UnterminatedTag(pos));
            };
            let tag = rest[2..end].trim().to_ascii_lowercase();
            pos += end + 1;
            close(&mut open, &mut roots, &tag);
        } else if starts_tag(rest) {
            let (tag, attrs, self_closing, consumed) = parse_open_tag(input, pos)?;
            pos += consumed;
            if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                push_node(
                    &mut open,
                    &mut roots,
                    ParsedNode::Element {
                        tag,
                        attrs,
                        children: Vec::new(),
                    },
                );
            } else {
                open.push(Open {
                    tag,
                    attrs,
                    children: Vec::new(),
                });
            }
        } else {
            let end = text_end(rest);
            push_node(
                &mut open,
                &mut roots,
                ParsedNode::Text(decode_entities(&rest[..end])),
            );
            pos += end;
        }
    }

    while let Some(element) = open.pop() {
        let node = element.into_node();
        push_node(&mut open, &mut roots, node);
    }

    Ok(roots)
}

fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Length of the text run at the start of `rest`.
///
/// The first character is always consumed, so a `<` that does not start
/// markup becomes text.
fn text_end(rest: &str) -> usize {
    for (i, c) in rest.char_indices().skip(1) {
        if c == '<' {
            let next = rest[i + 1..].chars().next();
            if next.is_some_and(|n| n.is_ascii_alphabetic() || n == '/' || n == '!') {
                return i;
            }
        }
    }
    rest.len()
}

fn push_node(open: &mut [Open], roots: &mut Vec<ParsedNode>, node: ParsedNode) {
    let siblings = match open.last_mut() {
        Some(parent) => &mut parent.children,
        None => roots,
    };
    if let ParsedNode::Text(text) = &node {
        if let Some(ParsedNode::Text(previous)) = siblings.last_mut() {
            previous.push_str(text);
            return;
        }
    }
    siblings.push(node);
}

fn close(open: &mut Vec<Open>, roots: &mut Vec<ParsedNode>, tag: &str) {
    let Some(index) = open.iter().rposition(|o| o.tag == tag) else {
        log::debug!("dropping stray closing tag </{tag}>");
        return;
    };
    while open.len() > index {
        let Some(element) = open.pop() else {
            break;
        };
        let node = element.into_node();
        push_node(open, roots, node);
    }
}

type OpenTag = (String, Vec<(String, String)>, bool, usize);

/// Parse `<tag attr=...>` starting at `start`. Returns the tag, its
/// attributes, whether it was self-closing and the number of bytes consumed.
fn parse_open_tag(input: &str, start: usize) -> Result<OpenTag, MarkupError> {
    let mut pos = start + 1;
    let name_len = input[pos..]
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-' || *c == ':'))
        .map(|(i, _)| i)
        .unwrap_or(input.len() - pos);
    let tag = input[pos..pos + name_len].to_ascii_lowercase();
    pos += name_len;

    let mut attrs: Vec<(String, String)> = Vec::new();
    loop {
        pos += leading_whitespace(&input[pos..]);
        let rest = &input[pos..];
        if rest.is_empty() {
            return Err(MarkupError::UnterminatedTag(start));
        }
        if rest.starts_with("/>") {
            return Ok((tag, attrs, true, pos + 2 - start));
        }
        if rest.starts_with('>') {
            return Ok((tag, attrs, false, pos + 1 - start));
        }
        if rest.starts_with('/') {
            pos += 1;
            continue;
        }

        let name_len = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if name_len == 0 {
            // a lone '=' or similar junk; skip it
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        }
        let name = rest[..name_len].to_ascii_lowercase();
        pos += name_len;

        let after_ws = pos + leading_whitespace(&input[pos..]);
        let mut value = String::new();
        if input[after_ws..].starts_with('=') {
            pos = after_ws + 1;
            pos += leading_whitespace(&input[pos..]);
            let rest = &input[pos..];
            match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let Some(end) = rest[1..].find(quote) else {
                        return Err(MarkupError::UnterminatedAttribute(pos));
                    };
                    value = decode_entities(&rest[1..1 + end]);
                    pos += end + 2;
                }
                Some(_) => {
                    let end = rest
                        .char_indices()
                        .find(|(_, c)| c.is_whitespace() || *c == '>')
                        .map(|(i, _)| i)
                        .unwrap_or(rest.len());
                    value = decode_entities(&rest[..end]);
                    pos += end;
                }
                None => return Err(MarkupError::UnterminatedTag(start)),
            }
        }

        if !attrs.iter().any(|(n, _)| *n == name) {
            attrs.push((name, value));
        }
    }
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Decode the character references the widget markup relies on.
/// Unknown references are kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
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
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}
