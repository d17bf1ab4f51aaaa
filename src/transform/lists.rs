//! List consolidation: editors frequently emit one `<ul>` per item, and wrap
//! item content in a paragraph.

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;

/// Merge a list into a preceding sibling list of the same kind, line markers
/// between them notwithstanding.
pub(super) fn merge_adjacent_lists(node: &Handle) -> Option<Outcome> {
    let tag = node_util::tag_name(node)?;
    if tag != "ul" && tag != "ol" {
        return None;
    }
    let prev = node_util::prev_sibling_skipping_lines(node)?;
    if node_util::tag_name(&prev) != Some(tag) {
        return None;
    }
    node_util::move_children(node, &prev);
    node_util::detach(node);
    Some(Outcome::BackToPreviousSibling)
}

/// A list item whose sole significant child is an attribute-less paragraph
/// keeps the paragraph's content directly.
pub(super) fn unwrap_list_item_paragraph(node: &Handle) -> Option<Outcome> {
    if node_util::tag_name(node)? != "li" {
        return None;
    }
    let significant = node_util::significant_children(node);
    let [only] = significant.as_slice() else {
        return None;
    };
    if node_util::tag_name(only) != Some("p") || node_util::attr_count(only) > 0 {
        return None;
    }
    node_util::unwrap_element(only);
    Some(Outcome::RestartFromSelf)
}
