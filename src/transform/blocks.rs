//! Block-level rules: div reduction and empty-block removal.

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;

/// Elements that establish their own block when promoted to the parent.
pub(super) const BLOCK_TAGS: &[&str] = &[
    "p", "div", "ul", "ol", "li", "table", "blockquote", "pre", "hr", "h1", "h2", "h3", "h4",
    "h5", "h6", "dl", "figure",
];

/// An attribute-less div whose children are all block-level is pure wrapper
/// markup; promote the children to where the div was.
pub(super) fn unwrap_plain_div(node: &Handle) -> Option<Outcome> {
    if node_util::tag_name(node)? != "div" {
        return None;
    }
    if node_util::attr_count(node) > 0 || node_util::parent(node).is_none() {
        return None;
    }
    let significant = node_util::significant_children(node);
    if significant.is_empty() {
        return None;
    }
    let all_blocks = significant.iter().all(|child| {
        node_util::tag_name(child).is_some_and(|tag| BLOCK_TAGS.contains(&tag))
    });
    if !all_blocks {
        return None;
    }
    node_util::unwrap_element(node);
    Some(Outcome::RestartFromParent)
}

/// A bare div directly inside another div adds no structure.
pub(super) fn reduce_nested_div(node: &Handle) -> Option<Outcome> {
    if node_util::tag_name(node)? != "div" || node_util::attr_count(node) > 0 {
        return None;
    }
    let parent = node_util::parent(node)?;
    if node_util::tag_name(&parent) != Some("div") {
        return None;
    }
    node_util::unwrap_element(node);
    Some(Outcome::RestartFromParent)
}

/// Paragraphs and divs containing nothing significant (only whitespace text
/// and line markers) are dropped; their markers survive in the parent.
pub(super) fn remove_empty_block(node: &Handle) -> Option<Outcome> {
    let tag = node_util::tag_name(node)?;
    if tag != "p" && tag != "div" {
        return None;
    }
    if node_util::parent(node).is_none() {
        return None;
    }
    if !node_util::significant_children(node).is_empty() {
        return None;
    }
    node_util::unwrap_element(node);
    Some(Outcome::RestartFromParent)
}
