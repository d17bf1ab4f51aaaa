//! Rule framework: generic first-match-wins rule sets and the catalog of
//! per-family sets built from the DSL.
//!
//! Every rule family (element, attribute, style, style-to-class, URL) shares
//! the same control flow: iterate rules in insertion order, optionally skip
//! the system-tagged ones, stop at the first rule whose action reports
//! "matched and acted". Order is the DSL's only conflict-resolution
//! mechanism.

pub mod actions;
pub mod builtin;
pub mod dsl;

use tracing::debug;

use crate::error::Result;
pub use actions::{
    AttrAction, AttrSubject, ClassAction, ClassSubject, ElementAction, ElementSubject,
    RuleAction, StyleAction, StyleSubject, UrlAction, UrlKind, UrlSubject,
};

/// A predicate-action paired with its origin: built-in rules are
/// system-tagged so a caller flag can suppress them.
#[derive(Debug, Clone)]
pub struct Rule<A> {
    pub action: A,
    pub system: bool,
}

/// Ordered rules for one subject family.
#[derive(Debug, Clone)]
pub struct RuleSet<A> {
    rules: Vec<Rule<A>>,
}

impl<A> Default for RuleSet<A> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<A> RuleSet<A> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, action: A, system: bool) {
        self.rules.push(Rule { action, system });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<A: RuleAction> RuleSet<A> {
    /// Apply the first matching rule to the subject. Returns whether any rule
    /// matched and acted.
    pub fn apply(&self, subject: &mut A::Subject<'_>, ignore_system: bool) -> Result<bool> {
        for rule in &self.rules {
            if rule.system && ignore_system {
                continue;
            }
            if rule.action.apply(subject)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// All rule sets for one conversion run, parsed once from the built-in rule
/// text plus an optional user-supplied override file.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    pub elements: RuleSet<ElementAction>,
    pub attributes: RuleSet<AttrAction>,
    pub styles: RuleSet<StyleAction>,
    pub classes: RuleSet<ClassAction>,
    pub urls: RuleSet<UrlAction>,
}

impl RuleCatalog {
    /// Catalog holding only the built-in (system) rules.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::default();
        dsl::parse_rule_text(builtin::BUILTIN_RULES, true, &mut catalog)?;
        catalog.log_sizes();
        Ok(catalog)
    }

    /// Catalog with user rules merged ahead of the built-ins, so a user rule
    /// shadows a system rule under first-match-wins.
    pub fn with_user_rules(user_rules: &str) -> Result<Self> {
        let mut catalog = Self::default();
        dsl::parse_rule_text(user_rules, false, &mut catalog)?;
        dsl::parse_rule_text(builtin::BUILTIN_RULES, true, &mut catalog)?;
        catalog.log_sizes();
        Ok(catalog)
    }

    fn log_sizes(&self) {
        debug!(
            elements = self.elements.len(),
            attributes = self.attributes.len(),
            styles = self.styles.len(),
            classes = self.classes.len(),
            urls = self.urls.len(),
            "rule catalog loaded"
        );
    }
}
