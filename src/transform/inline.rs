//! Inline-element rules: null-span removal, empty-element removal, adjacent
//! merging, nested-emphasis and bare-anchor unwrapping.

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;
use crate::style::StyleDecls;

/// Inline elements the engine is willing to merge or drop.
pub(super) const INLINE_TAGS: &[&str] = &[
    "span", "strong", "em", "b", "i", "u", "s", "sub", "sup", "code", "a", "font",
];

const MERGE_TAGS: &[&str] = &[
    "span", "strong", "em", "b", "i", "u", "s", "sub", "sup", "code",
];

const EMPHASIS_TAGS: &[&str] = &["strong", "em", "b", "i", "u", "code"];

fn tag_of(node: &Handle) -> Option<&str> {
    node_util::tag_name(node)
}

/// A span (or legacy font wrapper) with no attributes left says nothing;
/// promote its children. Blank attributes were already stripped, so the
/// `<span style="   ">x</span>` case reduces to this rule.
pub(super) fn remove_null_span(node: &Handle) -> Option<Outcome> {
    let tag = tag_of(node)?;
    if tag != "span" && tag != "font" {
        return None;
    }
    if node_util::attr_count(node) > 0 || node_util::parent(node).is_none() {
        return None;
    }
    node_util::unwrap_element(node);
    Some(Outcome::RestartFromParent)
}

/// Inline elements with no children at all render as nothing; drop them.
pub(super) fn remove_empty_inline(node: &Handle) -> Option<Outcome> {
    let tag = tag_of(node)?;
    if !INLINE_TAGS.contains(&tag) {
        return None;
    }
    if !node.children.borrow().is_empty() || node_util::parent(node).is_none() {
        return None;
    }
    node_util::detach(node);
    Some(Outcome::RestartFromParent)
}

/// An anchor without a target is just its content.
pub(super) fn unwrap_bare_anchor(node: &Handle) -> Option<Outcome> {
    if tag_of(node)? != "a" || node_util::parent(node).is_none() {
        return None;
    }
    if node_util::get_attr(node, "href").is_some() {
        return None;
    }
    node_util::unwrap_element(node);
    Some(Outcome::RestartFromParent)
}

/// `<strong><strong>..</strong></strong>` and friends: the inner wrapper is
/// redundant.
pub(super) fn unwrap_nested_emphasis(node: &Handle) -> Option<Outcome> {
    let tag = tag_of(node)?;
    if !EMPHASIS_TAGS.contains(&tag) {
        return None;
    }
    let parent = node_util::parent(node)?;
    if node_util::tag_name(&parent) != Some(tag) {
        return None;
    }
    node_util::unwrap_element(node);
    Some(Outcome::RestartFromParent)
}

/// Merge the node into a preceding sibling of the same tag when both carry
/// identical attribute sets and order-insensitively identical style
/// declarations. Line markers between the two do not break adjacency.
pub(super) fn merge_adjacent_inline(node: &Handle) -> Option<Outcome> {
    let tag = tag_of(node)?;
    if !MERGE_TAGS.contains(&tag) {
        return None;
    }
    let prev = node_util::prev_sibling_skipping_lines(node)?;
    if node_util::tag_name(&prev) != Some(tag) {
        return None;
    }
    let mut attrs_a = node_util::attr_map(&prev);
    let mut attrs_b = node_util::attr_map(node);
    let style_a = attrs_a.remove("style").unwrap_or_default();
    let style_b = attrs_b.remove("style").unwrap_or_default();
    if attrs_a != attrs_b {
        return None;
    }
    let decls_a = StyleDecls::parse(&style_a).ok()?;
    let decls_b = StyleDecls::parse(&style_b).ok()?;
    if !decls_a.is_same(&decls_b) {
        return None;
    }
    node_util::move_children(node, &prev);
    node_util::detach(node);
    Some(Outcome::BackToPreviousSibling)
}
