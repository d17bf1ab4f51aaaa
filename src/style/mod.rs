//! CSS-like style declaration sets.
//!
//! A `style` attribute is modeled as an unordered map from property name to
//! trimmed, whitespace-collapsed value. Serialization is canonical
//! (`name: value; name: value;`), so normalizing an already-normalized
//! attribute is a no-op. The set algebra here (difference, intersection,
//! pattern removal) backs the style rule family and the table column-style
//! factoring.

use std::collections::BTreeMap;

use cssparser::{Parser, ParserInput, Token};
use markup5ever_rcdom::Handle;
use regex::Regex;

use crate::dom::node_util;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDecls {
    decls: BTreeMap<String, String>,
}

/// Parse one `name: value` declaration. A missing name or `:` is fatal at
/// parse time.
pub fn split_declaration(text: &str) -> Result<(String, String)> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let name = parser
        .expect_ident()
        .map(|ident| ident.to_string().to_ascii_lowercase())
        .map_err(|_| EngineError::StyleParse(text.to_string()))?;
    parser
        .expect_colon()
        .map_err(|_| EngineError::StyleParse(text.to_string()))?;
    Ok((name, normalize_value(&declaration_value(&mut parser))))
}

/// Raw source text of the current declaration's value, up to the next
/// top-level `;` or the end of input. Tokenizing keeps semicolons inside
/// `url(...)` and quoted strings out of the declaration boundary.
fn declaration_value(parser: &mut Parser) -> String {
    let start = parser.position();
    let mut end = start;
    loop {
        if matches!(parser.next(), Ok(Token::Semicolon) | Err(_)) {
            break;
        }
        end = parser.position();
    }
    parser.slice(start..end).to_owned()
}

fn normalize_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl StyleDecls {
    /// Parse a `style` attribute value as a declaration list. Empty
    /// declarations between semicolons are ignored; a declaration without a
    /// leading identifier and `:` aborts the parse.
    pub fn parse(text: &str) -> Result<Self> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let mut decls = BTreeMap::new();
        loop {
            if parser.is_exhausted() {
                break;
            }
            let name = match parser.try_parse(|p| p.expect_ident().map(|i| i.to_string())) {
                Ok(name) => name.to_ascii_lowercase(),
                Err(_) => match parser.next() {
                    Ok(Token::Semicolon) => continue,
                    _ => return Err(EngineError::StyleParse(text.to_string())),
                },
            };
            if parser.expect_colon().is_err() {
                return Err(EngineError::StyleParse(text.to_string()));
            }
            decls.insert(name, normalize_value(&declaration_value(&mut parser)));
        }
        Ok(Self { decls })
    }

    /// Declaration set of an element's `style` attribute; empty when the
    /// attribute is absent.
    pub fn from_element(node: &Handle) -> Result<Self> {
        match node_util::get_attr(node, "style") {
            Some(text) => Self::parse(&text),
            None => Ok(Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.decls.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.decls
            .insert(name.trim().to_ascii_lowercase(), normalize_value(value));
    }

    pub fn remove_name(&mut self, name: &str) -> Option<String> {
        self.decls.remove(name)
    }

    /// Remove the declaration only when both name and value match.
    pub fn remove_exact(&mut self, name: &str, value: &str) -> bool {
        if self.decls.get(name).map(String::as_str) == Some(value) {
            self.decls.remove(name);
            true
        } else {
            false
        }
    }

    /// Remove every declaration whose `name: value` text matches the pattern.
    pub fn remove_pattern(&mut self, pattern: &Regex) -> bool {
        let before = self.decls.len();
        self.decls
            .retain(|name, value| !pattern.is_match(&format!("{name}: {value}")));
        self.decls.len() != before
    }

    /// Order-insensitive equality, used to decide whether adjacent inline
    /// elements can merge.
    pub fn is_same(&self, other: &StyleDecls) -> bool {
        self.decls == other.decls
    }

    /// Whether every declaration of `other` is present here verbatim.
    pub fn contains_all(&self, other: &StyleDecls) -> bool {
        other
            .decls
            .iter()
            .all(|(name, value)| self.decls.get(name) == Some(value))
    }

    /// Set difference: drop declarations that appear identically in `other`.
    pub fn remove_present_in(&mut self, other: &StyleDecls) {
        self.decls
            .retain(|name, value| other.decls.get(name) != Some(value));
    }

    /// Set intersection: keep only declarations that appear identically in
    /// `other`.
    pub fn retain_common(&mut self, other: &StyleDecls) {
        self.decls
            .retain(|name, value| other.decls.get(name) == Some(value));
    }

    pub fn clear(&mut self) {
        self.decls.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Canonical `name: value;` serialization.
    pub fn to_css(&self) -> String {
        self.decls
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write the set back to the element's `style` attribute, dropping the
    /// attribute entirely when the set is empty.
    pub fn write_to(&self, node: &Handle) {
        if self.decls.is_empty() {
            node_util::remove_attr(node, "style");
        } else {
            node_util::set_attr(node, "style", &self.to_css());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_collapses_whitespace() {
        let decls = StyleDecls::parse("  color :  dark   red ; width:50% ").unwrap();
        assert_eq!(decls.get("color"), Some("dark red"));
        assert_eq!(decls.get("width"), Some("50%"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = StyleDecls::parse("b: 2 ;a:1").unwrap().to_css();
        let twice = StyleDecls::parse(&once).unwrap().to_css();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_colon_is_fatal() {
        assert!(matches!(
            StyleDecls::parse("color red"),
            Err(EngineError::StyleParse(_))
        ));
    }

    #[test]
    fn difference_and_intersection() {
        let mut a = StyleDecls::parse("color: red; width: 10%; border: none;").unwrap();
        let b = StyleDecls::parse("color: red; width: 20%;").unwrap();

        let mut common = a.clone();
        common.retain_common(&b);
        assert_eq!(common.to_css(), "color: red;");

        a.remove_present_in(&b);
        assert_eq!(a.to_css(), "border: none; width: 10%;");
    }

    #[test]
    fn equality_ignores_declaration_order() {
        let a = StyleDecls::parse("color: red; width: 10%;").unwrap();
        let b = StyleDecls::parse("width: 10%; color: red;").unwrap();
        assert!(a.is_same(&b));
    }
}
