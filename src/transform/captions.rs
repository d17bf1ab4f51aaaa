//! Table caption consolidation.
//!
//! Editors sometimes split a caption across several `<caption>` elements or
//! leave one in the middle of the table. This rule runs before table
//! canonicalization, which expects at most one caption.

use std::rc::Rc;

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;

pub(super) fn consolidate_captions(node: &Handle) -> Option<Outcome> {
    if node_util::tag_name(node)? != "table" {
        return None;
    }
    let captions: Vec<Handle> = node
        .children
        .borrow()
        .iter()
        .filter(|child| node_util::is_element(child, "caption"))
        .cloned()
        .collect();
    let (first, extra) = captions.split_first()?;

    let mut acted = false;
    for caption in extra {
        node_util::move_children(caption, first);
        node_util::detach(caption);
        acted = true;
    }

    let at_front = node
        .children
        .borrow()
        .first()
        .is_some_and(|child| Rc::ptr_eq(child, first));
    if !at_front {
        // Hoist the caption to the front of the table.
        node_util::detach(first);
        first.parent.set(Some(Rc::downgrade(node)));
        node.children.borrow_mut().insert(0, first.clone());
        acted = true;
    }

    if acted { Some(Outcome::RestartFromSelf) } else { None }
}
