//! Line-oriented rule DSL parser.
//!
//! The grammar is deliberately small and total: blank and `#` lines are
//! ignored, `[SECTION]` headers pick the rule family, and every other line
//! must parse as one command of that family or the whole catalog build
//! aborts with an error naming the line. Commands dispatch on a fixed set of
//! leading verbs; secondary keywords (` WITH `, ` TO `, ...) are located by
//! substring search.

use regex::Regex;

use super::RuleCatalog;
use super::actions::{AttrAction, ClassAction, ElementAction, StyleAction, UrlAction, UrlKind};
use crate::error::{EngineError, Result};
use crate::style::split_declaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Elements,
    Attributes,
    Styles,
    StyleToClass,
    Urls,
}

/// Parse one rule text into the catalog, tagging every rule with `system`.
pub fn parse_rule_text(text: &str, system: bool, catalog: &mut RuleCatalog) -> Result<()> {
    let mut section: Option<Section> = None;
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = Some(match header {
                "ELEMENTS" => Section::Elements,
                "ATTRIBUTES" => Section::Attributes,
                "STYLES" => Section::Styles,
                "STYLE_TO_CLASS" => Section::StyleToClass,
                "URLS" => Section::Urls,
                other => return Err(parse_err(line, format!("unknown section '{other}'"))),
            });
            continue;
        }
        let Some(section) = section else {
            return Err(parse_err(line, "rule line before any [SECTION] header"));
        };
        match section {
            Section::Elements => catalog.elements.push(parse_element_line(line)?, system),
            Section::Attributes => catalog.attributes.push(parse_attr_line(line)?, system),
            Section::Styles => catalog.styles.push(parse_style_line(line)?, system),
            Section::StyleToClass => catalog.classes.push(parse_class_line(line)?, system),
            Section::Urls => catalog.urls.push(parse_url_line(line)?, system),
        }
    }
    Ok(())
}

fn parse_err(line: &str, reason: impl Into<String>) -> EngineError {
    EngineError::RuleParse {
        line: line.to_string(),
        reason: reason.into(),
    }
}

/// Split on the first occurrence of a secondary keyword, trimming both sides.
fn split_keyword<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    text.find(keyword)
        .map(|idx| (text[..idx].trim(), text[idx + keyword.len()..].trim()))
}

/// Strip one pair of surrounding quote characters, if present.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn compile_pattern(line: &str, text: &str) -> Result<Regex> {
    Regex::new(unquote(text)).map_err(|e| parse_err(line, format!("bad pattern: {e}")))
}

fn declaration(line: &str, text: &str) -> Result<(String, String)> {
    split_declaration(unquote(text)).map_err(|_| {
        parse_err(line, format!("'{text}' is not a 'name: value' declaration"))
    })
}

fn parse_element_line(line: &str) -> Result<ElementAction> {
    if let Some(rest) = line.strip_prefix("REPLACE ") {
        let (from, to) = split_keyword(rest, " WITH ")
            .ok_or_else(|| parse_err(line, "expected ' WITH '"))?;
        return Ok(ElementAction::Replace {
            from: unquote(from).to_string(),
            to: unquote(to).to_string(),
        });
    }
    if let Some(rest) = line.strip_prefix("REMOVE ") {
        if let Some(tag) = rest.strip_suffix(" INCLUDING CONTENT") {
            return Ok(ElementAction::RemoveIncludingContent {
                tag: unquote(tag.trim()).to_string(),
            });
        }
        return Ok(ElementAction::Remove {
            tag: unquote(rest.trim()).to_string(),
        });
    }
    Err(parse_err(line, "unrecognized element command"))
}

fn parse_attr_line(line: &str) -> Result<AttrAction> {
    if let Some(rest) = line.strip_prefix("MOVE ") {
        let (name, target) =
            split_keyword(rest, " TO ").ok_or_else(|| parse_err(line, "expected ' TO '"))?;
        if target != "STYLE" {
            return Err(parse_err(line, "attributes can only be moved TO STYLE"));
        }
        return Ok(AttrAction::MoveToStyle {
            name: unquote(name).to_string(),
        });
    }
    if let Some(rest) = line.strip_prefix("REMOVE ") {
        if let Some((name, pattern)) = split_keyword(rest, " IF PATTERN ") {
            return Ok(AttrAction::RemoveIfPattern {
                name: unquote(name).to_string(),
                pattern: compile_pattern(line, pattern)?,
            });
        }
        if let Some((name, value)) = split_keyword(rest, " IF ") {
            return Ok(AttrAction::RemoveIfValue {
                name: unquote(name).to_string(),
                value: unquote(value).to_string(),
            });
        }
        return Ok(AttrAction::Remove {
            name: unquote(rest.trim()).to_string(),
        });
    }
    Err(parse_err(line, "unrecognized attribute command"))
}

fn parse_style_line(line: &str) -> Result<StyleAction> {
    if let Some(rest) = line.strip_prefix("REMOVE ANY ") {
        return Ok(StyleAction::RemoveAny {
            name: unquote(rest.trim()).to_ascii_lowercase(),
        });
    }
    if let Some(rest) = line.strip_prefix("REMOVE PATTERN ") {
        return Ok(StyleAction::RemovePattern {
            pattern: compile_pattern(line, rest.trim())?,
        });
    }
    if let Some(rest) = line.strip_prefix("REPLACE PATTERN ") {
        let (pattern, replacement) = split_keyword(rest, " WITH ")
            .ok_or_else(|| parse_err(line, "expected ' WITH '"))?;
        return Ok(StyleAction::ReplacePattern {
            pattern: compile_pattern(line, pattern)?,
            replacement: unquote(replacement).to_string(),
        });
    }
    if let Some(rest) = line.strip_prefix("REPLACE ") {
        let (from, to) = split_keyword(rest, " WITH ")
            .ok_or_else(|| parse_err(line, "expected ' WITH '"))?;
        let (name, value) = declaration(line, from)?;
        let (to_name, to_value) = declaration(line, to)?;
        return Ok(StyleAction::Replace {
            name,
            value,
            to_name,
            to_value,
        });
    }
    if let Some(rest) = line.strip_prefix("MOVE ") {
        if let Some(decl) = rest.strip_suffix(" TO ATTRIBUTE") {
            let (name, value) = declaration(line, decl.trim())?;
            return Ok(StyleAction::MoveToAttribute { name, value });
        }
        if let Some((decl, tag)) = split_keyword(rest, " TO ELEMENT ") {
            let (name, value) = declaration(line, decl)?;
            return Ok(StyleAction::MoveToElement {
                name,
                value,
                tag: unquote(tag).to_string(),
            });
        }
        return Err(parse_err(line, "expected ' TO ATTRIBUTE' or ' TO ELEMENT '"));
    }
    if let Some(rest) = line.strip_prefix("REMOVE ") {
        let (name, value) = declaration(line, rest.trim())?;
        return Ok(StyleAction::Remove { name, value });
    }
    Err(parse_err(line, "unrecognized style command"))
}

fn parse_class_line(line: &str) -> Result<ClassAction> {
    let (partial, rest) = if let Some(rest) = line.strip_prefix("REPLACE EXACT MATCH OF STYLES ") {
        (false, rest)
    } else if let Some(rest) = line.strip_prefix("REPLACE PARTIAL MATCH OF STYLES ") {
        (true, rest)
    } else {
        return Err(parse_err(line, "unrecognized style-to-class command"));
    };
    let (decl_list, tail) = split_keyword(rest, " WITH CLASS ")
        .ok_or_else(|| parse_err(line, "expected ' WITH CLASS '"))?;
    let (class, only_tag) = match split_keyword(tail, " IF ELEMENT ") {
        Some((class, tag)) => (class, Some(unquote(tag).to_string())),
        None => (tail, None),
    };
    let mut decls = Vec::new();
    for part in decl_list.split(" AND ") {
        decls.push(declaration(line, part.trim())?);
    }
    if decls.is_empty() {
        return Err(parse_err(line, "expected at least one declaration"));
    }
    Ok(ClassAction::ReplaceWithClass {
        decls,
        class: unquote(class).to_string(),
        only_tag,
        partial,
    })
}

fn parse_url_line(line: &str) -> Result<UrlAction> {
    let (kind, rest) = if let Some(rest) = line.strip_prefix("MAP A ") {
        (UrlKind::Anchor, rest)
    } else if let Some(rest) = line.strip_prefix("MAP IMG ") {
        (UrlKind::Image, rest)
    } else {
        return Err(parse_err(line, "unrecognized URL command"));
    };
    if let Some(rest) = rest.strip_prefix("PATTERN ") {
        let (pattern, replacement) =
            split_keyword(rest, " TO ").ok_or_else(|| parse_err(line, "expected ' TO '"))?;
        return Ok(UrlAction::MapPattern {
            kind,
            pattern: compile_pattern(line, pattern)?,
            replacement: unquote(replacement).to_string(),
        });
    }
    let (from, to) = split_keyword(rest, " TO ").ok_or_else(|| parse_err(line, "expected ' TO '"))?;
    Ok(UrlAction::MapExact {
        kind,
        from: unquote(from).to_string(),
        to: unquote(to).to_string(),
    })
}
