//! Applies the DSL rule sets to one visited element.
//!
//! Each family has its own iteration shape: element rules see the node once,
//! attribute rules run per attribute, style rules per declaration of the
//! style set, style-to-class rules once against the whole set, URL rules
//! against the `href`/`src` of anchors and images.

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;
use crate::error::Result;
use crate::rules::{
    AttrSubject, ClassSubject, ElementSubject, RuleCatalog, UrlKind, UrlSubject,
};
use crate::rules::actions::StyleSubject;
use crate::style::StyleDecls;

pub(super) fn apply_element_rules(
    catalog: &RuleCatalog,
    node: &Handle,
    ignore_system: bool,
) -> Result<Option<Outcome>> {
    let Some(tag) = node_util::tag_name(node).map(str::to_string) else {
        return Ok(None);
    };
    let mut subject = ElementSubject::new(node, tag);
    if catalog.elements.apply(&mut subject, ignore_system)? {
        Ok(Some(subject.outcome))
    } else {
        Ok(None)
    }
}

pub(super) fn apply_attribute_rules(
    catalog: &RuleCatalog,
    node: &Handle,
    ignore_system: bool,
) -> Result<Option<Outcome>> {
    for name in node_util::attr_names(node) {
        // A previous action may have removed the attribute already.
        let Some(value) = node_util::get_attr(node, &name) else {
            continue;
        };
        let mut subject = AttrSubject::new(node, name, value);
        if catalog.attributes.apply(&mut subject, ignore_system)? {
            return Ok(Some(subject.outcome));
        }
    }
    Ok(None)
}

pub(super) fn apply_style_rules(
    catalog: &RuleCatalog,
    node: &Handle,
    ignore_system: bool,
) -> Result<Option<Outcome>> {
    let mut decls = StyleDecls::from_element(node)?;
    if decls.is_empty() {
        return Ok(None);
    }
    let snapshot: Vec<(String, String)> = decls
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    let mut outcome = None;
    for (name, value) in snapshot {
        // Skip declarations an earlier action already removed or rewrote.
        if decls.get(&name) != Some(value.as_str()) {
            continue;
        }
        let mut subject = StyleSubject {
            node,
            name,
            value,
            decls: &mut decls,
            outcome: Outcome::RestartFromSelf,
        };
        if catalog.styles.apply(&mut subject, ignore_system)? {
            outcome = Some(subject.outcome);
        }
    }
    if outcome.is_some() {
        decls.write_to(node);
    }
    Ok(outcome)
}

pub(super) fn apply_class_rules(
    catalog: &RuleCatalog,
    node: &Handle,
    ignore_system: bool,
) -> Result<Option<Outcome>> {
    let Some(tag) = node_util::tag_name(node).map(str::to_string) else {
        return Ok(None);
    };
    let mut decls = StyleDecls::from_element(node)?;
    if decls.is_empty() {
        return Ok(None);
    }
    let mut subject = ClassSubject {
        node,
        tag,
        decls: &mut decls,
        outcome: Outcome::RestartFromSelf,
    };
    if catalog.classes.apply(&mut subject, ignore_system)? {
        let outcome = subject.outcome;
        decls.write_to(node);
        Ok(Some(outcome))
    } else {
        Ok(None)
    }
}

pub(super) fn apply_url_rules(
    catalog: &RuleCatalog,
    node: &Handle,
    ignore_system: bool,
) -> Result<Option<Outcome>> {
    let (kind, attr) = match node_util::tag_name(node) {
        Some("a") => (UrlKind::Anchor, "href"),
        Some("img") => (UrlKind::Image, "src"),
        _ => return Ok(None),
    };
    let Some(url) = node_util::get_attr(node, attr) else {
        return Ok(None);
    };
    let mut subject = UrlSubject {
        kind,
        url: url.clone(),
    };
    if catalog.urls.apply(&mut subject, ignore_system)? && subject.url != url {
        node_util::set_attr(node, attr, &subject.url);
        // Attribute-only change; document order is unaffected.
        return Ok(Some(Outcome::Continue));
    }
    Ok(None)
}
