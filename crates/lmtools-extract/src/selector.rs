//! A small CSS selector subset for querying [`Element`] trees.
//!
//! Supported: type selectors (`li`, `*`), classes (`.a`), ids (`#a`),
//! attribute selectors (`[a]`, `[a="v"]`, `[a^="v"]`, `[a$="v"]`, `[a*="v"]`,
//! `[a~="v"]`) and the descendant combinator (whitespace).

use crate::dom::Element;
use crate::error::SelectorError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    /// Outermost ancestor first, subject last.
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Class(String),
    Id(String),
    Attr { name: String, op: AttrOp },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    Includes(String),
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = Vec::new();
        let mut parser = Parser {
            source: trimmed,
            chars: trimmed.char_indices().peekable(),
        };

        loop {
            parser.skip_whitespace();
            if parser.peek().is_none() {
                break;
            }
            compounds.push(parser.compound()?);
        }

        Ok(Self {
            source: trimmed.to_string(),
            compounds,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Does `element` match, given its ancestors (outermost first)?
    pub fn matches(&self, element: &Element, ancestors: &[&Element]) -> bool {
        let Some((subject, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }

        // Descendant-only chains can be matched greedily against the nearest ancestor
        let mut remaining = ancestors.len();
        for compound in rest.iter().rev() {
            match ancestors[..remaining].iter().rposition(|a| compound.matches(a)) {
                Some(pos) => remaining = pos,
                None => return false,
            }
        }
        true
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.conditions.iter().all(|c| c.matches(element))
    }
}

impl Condition {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Condition::Class(class) => element.has_class(class),
            Condition::Id(id) => element.id() == Some(id.as_str()),
            Condition::Attr { name, op } => {
                let Some(value) = element.attr(name) else {
                    return false;
                };
                match op {
                    AttrOp::Exists => true,
                    AttrOp::Equals(v) => value == v,
                    AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
                    AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
                    AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
                    AttrOp::Includes(v) => value.split_whitespace().any(|w| w == v),
                }
            }
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn unexpected(&mut self) -> SelectorError {
        match self.chars.peek() {
            Some(&(offset, found)) => SelectorError::UnexpectedChar {
                selector: self.source.to_string(),
                found,
                offset,
            },
            None => SelectorError::UnterminatedAttribute(self.source.to_string()),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.unexpected());
        }
        Ok(ident)
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => {
                self.chars.next();
            }
            Some(c) if c.is_alphabetic() => compound.tag = Some(self.ident()?),
            _ => {}
        }

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.chars.next();
                    compound.conditions.push(Condition::Class(self.ident()?));
                }
                '#' => {
                    self.chars.next();
                    compound.conditions.push(Condition::Id(self.ident()?));
                }
                '[' => {
                    self.chars.next();
                    compound.conditions.push(self.attribute()?);
                }
                c if c.is_whitespace() => break,
                _ => return Err(self.unexpected()),
            }
        }

        Ok(compound)
    }

    fn attribute(&mut self) -> Result<Condition, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        let op_char = match self.peek() {
            Some(']') => {
                self.chars.next();
                return Ok(Condition::Attr {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => None,
            Some(c @ ('^' | '$' | '*' | '~')) => {
                self.chars.next();
                Some(c)
            }
            _ => return Err(self.unexpected()),
        };
        if self.peek() != Some('=') {
            return Err(self.unexpected());
        }
        self.chars.next();
        self.skip_whitespace();

        let value = self.attribute_value()?;
        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err(self.unexpected());
        }
        self.chars.next();

        let op = match op_char {
            None => AttrOp::Equals(value),
            Some('^') => AttrOp::Prefix(value),
            Some('$') => AttrOp::Suffix(value),
            Some('*') => AttrOp::Contains(value),
            Some(_) => AttrOp::Includes(value),
        };
        Ok(Condition::Attr { name, op })
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                let mut value = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, c)) if c == quote => return Ok(value),
                        Some((_, c)) => value.push(c),
                        None => {
                            return Err(SelectorError::UnterminatedAttribute(
                                self.source.to_string(),
                            ))
                        }
                    }
                }
            }
            _ => self.ident(),
        }
    }
}
