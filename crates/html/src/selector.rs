//! Minimal CSS selector support for `query_selector`.
//!
//! Supported: `*`, type, `#id`, `.class`, `[attr]`, `[attr=value]` (value quoted or bare),
//! compound selectors, descendant (whitespace) and child (`>`) combinators, and `,` lists.

use crate::dom::Document;
use crate::types::NodeId;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorError {
    pub input: String,
    pub position: usize,
    pub reason: &'static str,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid selector {:?} at byte {}: {}",
            self.input, self.position, self.reason
        )
    }
}

impl std::error::Error for SelectorError {}

#[derive(Clone, Debug, PartialEq, Eq)]
enum SimpleSelector {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One compound selector plus the combinator linking it to the compound on its left.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound {
    simple: Vec<SimpleSelector>,
    combinator: Option<Combinator>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &'static str) -> SelectorError {
        SelectorError {
            input: self.input.to_string(),
            position: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn ident(&mut self) -> Result<&'a str, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_string();
        self.skip_whitespace();
        let value = match self.bump() {
            Some(']') => return Ok(SimpleSelector::Attribute { name, value: None }),
            Some('=') => {
                self.skip_whitespace();
                match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        let start = self.pos;
                        let Some(len) = self.input[start..].find(quote) else {
                            self.pos = self.input.len();
                            return Err(self.error("unterminated string"));
                        };
                        self.pos = start + len + 1;
                        self.input[start..start + len].to_string()
                    }
                    _ => self.ident()?.to_string(),
                }
            }
            _ => return Err(self.error("expected `]` or `=`")),
        };
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.error("expected `]`"));
        }
        Ok(SimpleSelector::Attribute {
            name,
            value: Some(value),
        })
    }

    fn compound(&mut self) -> Result<Vec<SimpleSelector>, SelectorError> {
        let mut simple = Vec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                simple.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_char(c) => {
                simple.push(SimpleSelector::Type(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    simple.push(SimpleSelector::Id(self.ident()?.to_string()));
                }
                Some('.') => {
                    self.bump();
                    simple.push(SimpleSelector::Class(self.ident()?.to_string()));
                }
                Some('[') => {
                    self.bump();
                    simple.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if simple.is_empty() {
            return Err(self.error("expected selector"));
        }
        Ok(simple)
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![Compound {
            simple: self.compound()?,
            combinator: None,
        }];
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            compounds.push(Compound {
                simple: self.compound()?,
                combinator: Some(combinator),
            });
        }
        Ok(Complex { compounds })
    }
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser { input, pos: 0 };
        let mut selectors = Vec::new();
        loop {
            parser.skip_whitespace();
            selectors.push(parser.complex()?);
            match parser.bump() {
                None => break,
                Some(',') => continue,
                Some(_) => return Err(parser.error("unexpected character")),
            }
        }
        Ok(Self { selectors })
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        doc.is_element(id)
            && self
                .selectors
                .iter()
                .any(|complex| matches_complex(doc, id, &complex.compounds))
    }
}

fn matches_simple(doc: &Document, id: NodeId, selector: &SimpleSelector) -> bool {
    match selector {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(t) => doc.tag_name(id).is_some_and(|n| n.eq_ignore_ascii_case(t)),
        SimpleSelector::Id(want) => doc.attribute(id, "id") == Some(want.as_str()),
        SimpleSelector::Class(want) => doc
            .attribute(id, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == want)),
        SimpleSelector::Attribute { name, value } => match value {
            None => doc.has_attribute(id, name),
            Some(want) => doc.attribute(id, name) == Some(want.as_str()),
        },
    }
}

fn matches_compound(doc: &Document, id: NodeId, compound: &Compound) -> bool {
    doc.is_element(id) && compound.simple.iter().all(|s| matches_simple(doc, id, s))
}

/// Right-to-left match of `compounds` ending at `id`.
fn matches_complex(doc: &Document, id: NodeId, compounds: &[Compound]) -> bool {
    let Some((last, rest)) = compounds.split_last() else {
        return true;
    };
    if !matches_compound(doc, id, last) {
        return false;
    }
    match last.combinator {
        None => true,
        Some(Combinator::Child) => doc
            .parent(id)
            .is_some_and(|parent| matches_complex(doc, parent, rest)),
        Some(Combinator::Descendant) => {
            let mut ancestor = doc.parent(id);
            while let Some(current) = ancestor {
                if matches_complex(doc, current, rest) {
                    return true;
                }
                ancestor = doc.parent(current);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched_ids(html: &str, selector: &str) -> Vec<String> {
        let doc = Document::parse_fragment(html);
        doc.query_selector_all(doc.root(), selector)
            .expect("valid selector")
            .into_iter()
            .map(|id| doc.attribute(id, "id").unwrap_or("?").to_string())
            .collect()
    }

    const PAGE: &str = "<div id=a class='greeter big'><span id=b>x</span>\
                        <p id=c><span id=d data-k=v>y</span></p></div><span id=e></span>";

    #[test]
    fn type_class_id_and_attribute() {
        assert_eq!(matched_ids(PAGE, "span"), vec!["b", "d", "e"]);
        assert_eq!(matched_ids(PAGE, ".greeter"), vec!["a"]);
        assert_eq!(matched_ids(PAGE, "div.greeter.big"), vec!["a"]);
        assert_eq!(matched_ids(PAGE, "#d"), vec!["d"]);
        assert_eq!(matched_ids(PAGE, "[data-k]"), vec!["d"]);
        assert_eq!(matched_ids(PAGE, "span[data-k=\"v\"]"), vec!["d"]);
        assert_eq!(matched_ids(PAGE, "*").len(), 5);
    }

    #[test]
    fn combinators_and_lists() {
        assert_eq!(matched_ids(PAGE, "div span"), vec!["b", "d"]);
        assert_eq!(matched_ids(PAGE, "div > span"), vec!["b"]);
        assert_eq!(matched_ids(PAGE, "div>p>span"), vec!["d"]);
        assert_eq!(matched_ids(PAGE, "#e, p"), vec!["c", "e"]);
    }

    #[test]
    fn parse_errors_report_position() {
        let err = SelectorList::parse("div > ").expect_err("dangling combinator");
        assert_eq!(err.position, 6);
        assert!(SelectorList::parse("a[b").is_err());
        assert!(SelectorList::parse("a[b='c]").is_err());
        assert!(SelectorList::parse(".").is_err());
        assert!(SelectorList::parse("a,,b").is_err());
        assert!(SelectorList::parse("div!").is_err());
        assert!(err.to_string().contains("div > "));
    }
}
