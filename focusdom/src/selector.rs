//! CSS selector subset used to resolve widget containers and sub-elements.
//!
//! Supported: selector lists, type/universal selectors, `#id`, `.class`,
//! `[attr]`, `[attr=value]`, and the descendant and child combinators.

use thiserror::Error;

use crate::document::Document;
use crate::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unexpected '{found}' at position {position} in selector")]
    Unexpected { found: char, position: usize },
    #[error("unterminated attribute selector starting at position {0}")]
    UnterminatedAttribute(usize),
    #[error("selector ends with a combinator")]
    DanglingCombinator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let chars: Vec<char> = source.chars().collect();
        let mut alternatives = Vec::new();
        let mut start = 0;
        let mut in_brackets = false;
        let mut quote: Option<char> = None;

        for (i, &c) in chars.iter().enumerate() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') if in_brackets => quote = Some(c),
                (None, '[') => in_brackets = true,
                (None, ']') => in_brackets = false,
                (None, ',') if !in_brackets => {
                    alternatives.push(parse_complex(&chars[start..i], start)?);
                    start = i + 1;
                }
                _ => {}
            }
        }
        alternatives.push(parse_complex(&chars[start..], start)?);

        Ok(Self { alternatives })
    }

    /// Whether `node` matches any selector of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.tag(node).is_some()
            && self
                .alternatives
                .iter()
                .any(|complex| complex.matches(doc, node))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let last = self.compounds.len() - 1;
        self.compounds[last].matches(doc, node) && self.matches_before(doc, node, last)
    }

    /// `compounds[index]` matched `node`; check the compounds to its left.
    fn matches_before(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        let previous = &self.compounds[index - 1];
        match self.combinators[index - 1] {
            Combinator::Child => doc.parent(node).is_some_and(|parent| {
                previous.matches(doc, parent) && self.matches_before(doc, parent, index - 1)
            }),
            Combinator::Descendant => doc.ancestors(node).any(|ancestor| {
                previous.matches(doc, ancestor) && self.matches_before(doc, ancestor, index - 1)
            }),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| doc.has_class(node, class)) {
            return false;
        }
        self.attrs.iter().all(|attr| match (&attr.value, doc.attr(node, &attr.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn unexpected(chars: &[char], i: usize, offset: usize) -> SelectorError {
    SelectorError::Unexpected {
        found: chars[i],
        position: offset + i,
    }
}

fn parse_complex(chars: &[char], offset: usize) -> Result<Complex, SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut i = 0;

    loop {
        let before = i;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let saw_whitespace = i > before;
        if i >= chars.len() {
            break;
        }

        if chars[i] == '>' {
            if compounds.is_empty() || pending == Some(Combinator::Child) {
                return Err(unexpected(chars, i, offset));
            }
            pending = Some(Combinator::Child);
            i += 1;
            continue;
        }

        if !compounds.is_empty() {
            match pending.take() {
                Some(combinator) => combinators.push(combinator),
                None if saw_whitespace => combinators.push(Combinator::Descendant),
                None => return Err(unexpected(chars, i, offset)),
            }
        }

        let (compound, next) = parse_compound(chars, i, offset)?;
        compounds.push(compound);
        i = next;
    }

    if pending.is_some() {
        return Err(SelectorError::DanglingCombinator);
    }
    if compounds.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(Complex {
        compounds,
        combinators,
    })
}

fn read_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_compound(
    chars: &[char],
    mut i: usize,
    offset: usize,
) -> Result<(Compound, usize), SelectorError> {
    let mut compound = Compound::default();
    let mut universal = false;

    if chars[i] == '*' {
        universal = true;
        i += 1;
    } else if is_ident_char(chars[i]) {
        let (tag, next) = read_ident(chars, i);
        compound.tag = Some(tag.to_ascii_lowercase());
        i = next;
    }

    while i < chars.len() {
        match chars[i] {
            '#' | '.' => {
                let marker = chars[i];
                let (name, next) = read_ident(chars, i + 1);
                if name.is_empty() {
                    return Err(match chars.get(i + 1) {
                        Some(_) => unexpected(chars, i + 1, offset),
                        None => unexpected(chars, i, offset),
                    });
                }
                if marker == '#' {
                    compound.id = Some(name);
                } else {
                    compound.classes.push(name);
                }
                i = next;
            }
            '[' => {
                let (attr, next) = parse_attr(chars, i, offset)?;
                compound.attrs.push(attr);
                i = next;
            }
            c if c.is_whitespace() || c == '>' => break,
            _ => return Err(unexpected(chars, i, offset)),
        }
    }

    if compound.is_empty() && !universal {
        return Err(unexpected(chars, i.min(chars.len() - 1), offset));
    }
    Ok((compound, i))
}

fn parse_attr(
    chars: &[char],
    open: usize,
    offset: usize,
) -> Result<(AttrMatch, usize), SelectorError> {
    let unterminated = SelectorError::UnterminatedAttribute(offset + open);
    let skip_ws = |mut i: usize| {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        i
    };

    let i = skip_ws(open + 1);
    let (name, i) = read_ident(chars, i);
    if name.is_empty() {
        return Err(match chars.get(i) {
            Some(_) => unexpected(chars, i, offset),
            None => unterminated,
        });
    }
    let mut i = skip_ws(i);
    let mut value = None;

    match chars.get(i) {
        None => return Err(unterminated),
        Some(']') => {}
        Some('=') => {
            i = skip_ws(i + 1);
            match chars.get(i) {
                None => return Err(unterminated),
                Some(&quote @ ('"' | '\'')) => {
                    let start = i + 1;
                    let Some(len) = chars[start..].iter().position(|&c| c == quote) else {
                        return Err(unterminated);
                    };
                    value = Some(chars[start..start + len].iter().collect());
                    i = start + len + 1;
                }
                Some(_) => {
                    let (raw, next) = read_ident(chars, i);
                    if raw.is_empty() {
                        return Err(unexpected(chars, i, offset));
                    }
                    value = Some(raw);
                    i = next;
                }
            }
            i = skip_ws(i);
        }
        Some(_) => return Err(unexpected(chars, i, offset)),
    }

    match chars.get(i) {
        Some(']') => Ok((
            AttrMatch {
                name: name.to_ascii_lowercase(),
                value,
            },
            i + 1,
        )),
        Some(_) => Err(unexpected(chars, i, offset)),
        None => Err(unterminated),
    }
}
