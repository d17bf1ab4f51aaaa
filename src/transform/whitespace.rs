//! Whitespace restructuring: text-node merging, non-breaking-space and
//! run collapsing, and hoisting of leading/trailing whitespace out of inline
//! elements so that `<strong> x </strong>` becomes ` <strong>x</strong> `.

use markup5ever_rcdom::Handle;

use super::blocks::BLOCK_TAGS;
use super::inline::INLINE_TAGS;
use crate::dom::node_util;
use crate::dom::walker::Outcome;

/// Adjacent text nodes (a frequent leftover after unwrapping) are merged
/// into the first of the pair.
pub(super) fn merge_text_with_previous(node: &Handle) -> Option<Outcome> {
    let text = node_util::text_contents(node)?;
    let prev = node_util::prev_sibling(node)?;
    let prev_text = node_util::text_contents(&prev)?;
    node_util::set_text_contents(&prev, &format!("{prev_text}{text}"));
    node_util::detach(node);
    Some(Outcome::BackToPreviousSibling)
}

/// Replace non-breaking spaces and collapse whitespace runs outside `pre`.
/// Whitespace-only text between two inline siblings is a word separator and
/// collapses to a single space; anywhere else it is inter-tag formatting and
/// is removed outright.
pub(super) fn normalize_text(node: &Handle) -> Option<Outcome> {
    let text = node_util::text_contents(node)?;
    if node_util::within_pre(node) {
        return None;
    }
    let normalized = collapse_whitespace(&text.replace('\u{a0}', " "));
    if normalized.is_empty() {
        if separates_inline_content(node) {
            if text != " " {
                node_util::set_text_contents(node, " ");
            }
            return None;
        }
        if node_util::parent(node).is_some() {
            node_util::detach(node);
            return Some(Outcome::RestartFromParent);
        }
        return None;
    }
    if normalized != text {
        node_util::set_text_contents(node, &normalized);
    }
    None
}

/// Table structure never flows with text, so spaces beside it are noise.
const TABLE_TAGS: &[&str] = &[
    "thead", "tbody", "tfoot", "tr", "td", "th", "caption", "colgroup", "col",
];

fn is_inline_content(node: &Handle) -> bool {
    match node_util::tag_name(node) {
        Some(tag) => !BLOCK_TAGS.contains(&tag) && !TABLE_TAGS.contains(&tag),
        None => node_util::is_text(node),
    }
}

fn separates_inline_content(node: &Handle) -> bool {
    let Some(prev) = node_util::prev_sibling_skipping_lines(node) else {
        return false;
    };
    let Some(next) = node_util::next_sibling_skipping_lines(node) else {
        return false;
    };
    is_inline_content(&prev) && is_inline_content(&next)
}

/// Collapse every whitespace run to a single space, keeping one leading or
/// trailing space when the original had any.
fn collapse_whitespace(text: &str) -> String {
    let has_leading = text.starts_with(char::is_whitespace);
    let has_trailing = text.ends_with(char::is_whitespace);
    let core = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if core.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(core.len() + 2);
    if has_leading {
        out.push(' ');
    }
    out.push_str(&core);
    if has_trailing {
        out.push(' ');
    }
    out
}

/// Move whitespace at the edges of an inline element's text out to sibling
/// text nodes, so emphasis markers produced downstream hug the content.
pub(super) fn hoist_inline_whitespace(node: &Handle) -> Option<Outcome> {
    let tag = node_util::tag_name(node)?;
    if !INLINE_TAGS.contains(&tag) || tag == "code" {
        return None;
    }
    if node_util::parent(node).is_none() || node_util::within_pre(node) {
        return None;
    }
    let mut acted = false;

    let first = node.children.borrow().first().cloned();
    if let Some(first) = first
        && let Some(text) = node_util::text_contents(&first)
        && text.starts_with(char::is_whitespace)
        && !text.chars().all(char::is_whitespace)
    {
        node_util::set_text_contents(&first, text.trim_start());
        node_util::insert_before(node, &node_util::new_text(" "));
        acted = true;
    }

    let last = node.children.borrow().last().cloned();
    if let Some(last) = last
        && let Some(text) = node_util::text_contents(&last)
        && text.ends_with(char::is_whitespace)
        && !text.chars().all(char::is_whitespace)
    {
        node_util::set_text_contents(&last, text.trim_end());
        node_util::insert_after(node, &node_util::new_text(" "));
        acted = true;
    }

    if acted {
        Some(Outcome::RestartFromParent)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::collapse_whitespace;

    #[test]
    fn collapse_keeps_edge_spaces() {
        assert_eq!(collapse_whitespace("  a \n b  "), " a b ");
        assert_eq!(collapse_whitespace("a b"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
