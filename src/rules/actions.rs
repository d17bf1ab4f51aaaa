//! Typed rule actions, one closed set of verbs per subject family.
//!
//! An action both tests and acts: evaluating it against a subject returns
//! "matched and acted", and any side effect has already happened by the time
//! the boolean comes back. The outcome the walker should see after a matched
//! action is recorded on the subject.

use markup5ever_rcdom::Handle;
use regex::Regex;

use crate::dom::node_util;
use crate::dom::walker::Outcome;
use crate::error::Result;
use crate::style::{StyleDecls, split_declaration};

/// Evaluated by a [`super::RuleSet`]; the subject type differs per family.
pub trait RuleAction {
    type Subject<'s>;

    fn apply(&self, subject: &mut Self::Subject<'_>) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Element rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum ElementAction {
    /// `REPLACE <tag> WITH <tag>`
    Replace { from: String, to: String },
    /// `REMOVE <tag>`: the element goes away, its children are promoted.
    Remove { tag: String },
    /// `REMOVE <tag> INCLUDING CONTENT`
    RemoveIncludingContent { tag: String },
}

pub struct ElementSubject<'a> {
    pub node: &'a Handle,
    pub tag: String,
    pub outcome: Outcome,
}

impl<'a> ElementSubject<'a> {
    pub fn new(node: &'a Handle, tag: String) -> Self {
        Self {
            node,
            tag,
            outcome: Outcome::Continue,
        }
    }
}

impl RuleAction for ElementAction {
    type Subject<'s> = ElementSubject<'s>;

    fn apply(&self, subject: &mut ElementSubject<'_>) -> Result<bool> {
        // The walk root has no parent and is never rewritten.
        if node_util::parent(subject.node).is_none() {
            return Ok(false);
        }
        match self {
            Self::Replace { from, to } if *from == subject.tag => {
                node_util::rename_element(subject.node, to);
                subject.outcome = Outcome::RestartFromParent;
                Ok(true)
            }
            Self::Remove { tag } if *tag == subject.tag => {
                node_util::unwrap_element(subject.node);
                subject.outcome = Outcome::RestartFromParent;
                Ok(true)
            }
            Self::RemoveIncludingContent { tag } if *tag == subject.tag => {
                node_util::detach(subject.node);
                subject.outcome = Outcome::RestartFromParent;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum AttrAction {
    /// `MOVE <attr> TO STYLE`
    MoveToStyle { name: String },
    /// `REMOVE <attr>`
    Remove { name: String },
    /// `REMOVE <attr> IF <value>`
    RemoveIfValue { name: String, value: String },
    /// `REMOVE <attr> IF PATTERN <regex>`
    RemoveIfPattern { name: String, pattern: Regex },
}

pub struct AttrSubject<'a> {
    pub node: &'a Handle,
    pub name: String,
    pub value: String,
    pub outcome: Outcome,
}

impl<'a> AttrSubject<'a> {
    pub fn new(node: &'a Handle, name: String, value: String) -> Self {
        Self {
            node,
            name,
            value,
            outcome: Outcome::RestartFromSelf,
        }
    }
}

impl RuleAction for AttrAction {
    type Subject<'s> = AttrSubject<'s>;

    fn apply(&self, subject: &mut AttrSubject<'_>) -> Result<bool> {
        match self {
            Self::MoveToStyle { name } if *name == subject.name => {
                node_util::remove_attr(subject.node, &subject.name);
                let mut decls = StyleDecls::from_element(subject.node)?;
                decls.insert(&subject.name, &subject.value);
                decls.write_to(subject.node);
                Ok(true)
            }
            Self::Remove { name } if *name == subject.name => {
                node_util::remove_attr(subject.node, &subject.name);
                Ok(true)
            }
            Self::RemoveIfValue { name, value }
                if *name == subject.name && *value == subject.value =>
            {
                node_util::remove_attr(subject.node, &subject.name);
                Ok(true)
            }
            Self::RemoveIfPattern { name, pattern }
                if *name == subject.name && pattern.is_match(&subject.value) =>
            {
                node_util::remove_attr(subject.node, &subject.name);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Style rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum StyleAction {
    /// `REMOVE <decl>`
    Remove { name: String, value: String },
    /// `REMOVE ANY <name>`
    RemoveAny { name: String },
    /// `REMOVE PATTERN <regex>`: matched against `name: value`.
    RemovePattern { pattern: Regex },
    /// `REPLACE <decl> WITH <decl>`
    Replace {
        name: String,
        value: String,
        to_name: String,
        to_value: String,
    },
    /// `REPLACE PATTERN <regex> WITH <replacement>`
    ReplacePattern { pattern: Regex, replacement: String },
    /// `MOVE <decl> TO ATTRIBUTE`
    MoveToAttribute { name: String, value: String },
    /// `MOVE <decl> TO ELEMENT <tag>`: the declaration becomes a wrapper
    /// element around the subject's content.
    MoveToElement {
        name: String,
        value: String,
        tag: String,
    },
}

/// One declaration of the element's style set under evaluation. Actions edit
/// the shared working set; the driver writes it back once the set is stable.
pub struct StyleSubject<'a> {
    pub node: &'a Handle,
    pub name: String,
    pub value: String,
    pub decls: &'a mut StyleDecls,
    pub outcome: Outcome,
}

impl RuleAction for StyleAction {
    type Subject<'s> = StyleSubject<'s>;

    fn apply(&self, subject: &mut StyleSubject<'_>) -> Result<bool> {
        let decl_text = format!("{}: {}", subject.name, subject.value);
        match self {
            Self::Remove { name, value }
                if *name == subject.name && *value == subject.value =>
            {
                subject.decls.remove_name(&subject.name);
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            Self::RemoveAny { name } if *name == subject.name => {
                subject.decls.remove_name(&subject.name);
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            Self::RemovePattern { pattern } if pattern.is_match(&decl_text) => {
                subject.decls.remove_name(&subject.name);
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            Self::Replace {
                name,
                value,
                to_name,
                to_value,
            } if *name == subject.name && *value == subject.value => {
                subject.decls.remove_name(&subject.name);
                subject.decls.insert(to_name, to_value);
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            Self::ReplacePattern {
                pattern,
                replacement,
            } if pattern.is_match(&decl_text) => {
                subject.decls.remove_name(&subject.name);
                let rewritten = pattern.replace(&decl_text, replacement.as_str());
                let rewritten = rewritten.trim();
                if !rewritten.is_empty() {
                    let (name, value) = split_declaration(rewritten)?;
                    subject.decls.insert(&name, &value);
                }
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            Self::MoveToAttribute { name, value }
                if *name == subject.name && *value == subject.value =>
            {
                subject.decls.remove_name(&subject.name);
                node_util::set_attr(subject.node, &subject.name, &subject.value);
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            Self::MoveToElement { name, value, tag }
                if *name == subject.name && *value == subject.value =>
            {
                subject.decls.remove_name(&subject.name);
                let wrapper = node_util::new_element(tag);
                node_util::move_children(subject.node, &wrapper);
                node_util::append_child(subject.node, &wrapper);
                subject.outcome = Outcome::RestartFromSelf;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Style-to-class rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum ClassAction {
    /// `REPLACE EXACT|PARTIAL MATCH OF STYLES <decl> [AND <decl>]* WITH CLASS
    /// <name> [IF ELEMENT <tag>]`
    ReplaceWithClass {
        decls: Vec<(String, String)>,
        class: String,
        only_tag: Option<String>,
        /// Partial match clears the whole style set instead of only the
        /// matched declarations.
        partial: bool,
    },
}

pub struct ClassSubject<'a> {
    pub node: &'a Handle,
    pub tag: String,
    pub decls: &'a mut StyleDecls,
    pub outcome: Outcome,
}

impl RuleAction for ClassAction {
    type Subject<'s> = ClassSubject<'s>;

    fn apply(&self, subject: &mut ClassSubject<'_>) -> Result<bool> {
        let Self::ReplaceWithClass {
            decls,
            class,
            only_tag,
            partial,
        } = self;
        if let Some(tag) = only_tag
            && *tag != subject.tag
        {
            return Ok(false);
        }
        if node_util::get_attr(subject.node, "class").is_some() {
            return Ok(false);
        }
        let matched = decls
            .iter()
            .all(|(name, value)| subject.decls.get(name) == Some(value));
        if !matched {
            return Ok(false);
        }
        if *partial {
            subject.decls.clear();
        } else {
            for (name, _) in decls {
                subject.decls.remove_name(name);
            }
        }
        node_util::set_attr(subject.node, "class", class);
        subject.outcome = Outcome::RestartFromSelf;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// URL rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// `href` of an anchor.
    Anchor,
    /// `src` of an image.
    Image,
}

#[derive(Debug, Clone)]
pub enum UrlAction {
    /// `MAP A|IMG <url> TO <url>`
    MapExact {
        kind: UrlKind,
        from: String,
        to: String,
    },
    /// `MAP A|IMG PATTERN <regex> TO <replacement>`
    MapPattern {
        kind: UrlKind,
        pattern: Regex,
        replacement: String,
    },
}

pub struct UrlSubject {
    pub kind: UrlKind,
    pub url: String,
}

impl RuleAction for UrlAction {
    type Subject<'s> = UrlSubject;

    fn apply(&self, subject: &mut UrlSubject) -> Result<bool> {
        match self {
            Self::MapExact { kind, from, to } if *kind == subject.kind && *from == subject.url => {
                subject.url = to.clone();
                Ok(true)
            }
            Self::MapPattern {
                kind,
                pattern,
                replacement,
            } if *kind == subject.kind && pattern.is_match(&subject.url) => {
                subject.url = pattern
                    .replace(&subject.url, replacement.as_str())
                    .into_owned();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
