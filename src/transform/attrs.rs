//! Blank attribute removal.

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;

/// Drop attributes whose value is empty or whitespace-only. A `style` of
/// `"   "` carries no declarations, a blank `href` no target; downstream
/// rules treat their absence and blankness the same, so they go early.
pub(super) fn remove_blank_attributes(node: &Handle) -> Option<Outcome> {
    let blank: Vec<String> = node_util::attr_names(node)
        .into_iter()
        .filter(|name| {
            node_util::get_attr(node, name)
                .is_some_and(|value| value.trim().is_empty())
        })
        .collect();
    if blank.is_empty() {
        return None;
    }
    for name in &blank {
        node_util::remove_attr(node, name);
    }
    Some(Outcome::RestartFromSelf)
}
