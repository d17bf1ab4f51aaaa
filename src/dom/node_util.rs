//! Handle-level tree surgery.
//!
//! Every structural rule goes through these helpers rather than touching the
//! `RefCell`/`Cell` internals of `markup5ever_rcdom` directly. Two invariants
//! are maintained here: a node's `parent` link always agrees with membership
//! in that parent's child list, and decorative `<line number="..">` markers
//! (inserted by the upstream line-tracking preprocessor) are skipped whenever
//! adjacency is tested.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, QualName, ns};
use markup5ever_rcdom::{Handle, Node, NodeData};

/// RAII guard for reading the `Cell<Option<Weak<Node>>>` parent link.
///
/// The parent reference has to be taken out of the `Cell` to be inspected;
/// the guard restores it on drop so a panic mid-read cannot leave the link
/// empty.
struct ParentGuard<'a> {
    node: &'a Handle,
    value: Option<Option<Weak<Node>>>,
}

impl Drop for ParentGuard<'_> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.node.parent.set(value);
        }
    }
}

impl<'a> ParentGuard<'a> {
    fn new(node: &'a Handle) -> Self {
        let value = node.parent.take();
        Self {
            node,
            value: Some(value),
        }
    }

    fn get(&self) -> &Option<Weak<Node>> {
        self.value.as_ref().unwrap()
    }
}

/// Tag name of an element node, `None` for anything else.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

pub fn is_text(node: &Handle) -> bool {
    matches!(node.data, NodeData::Text { .. })
}

/// Text payload of a text node.
pub fn text_contents(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

pub fn set_text_contents(node: &Handle, text: &str) {
    if let NodeData::Text { contents } = &node.data {
        *contents.borrow_mut() = StrTendril::from(text);
    }
}

/// Whether this is a decorative line marker carrying an original line number.
pub fn is_line_marker(node: &Handle) -> bool {
    is_element(node, "line") && get_attr(node, "number").is_some()
}

pub fn is_whitespace_text(node: &Handle) -> bool {
    match &node.data {
        NodeData::Text { contents } => contents.borrow().chars().all(char::is_whitespace),
        _ => false,
    }
}

/// True for nodes that carry no document meaning when testing adjacency or
/// counting children: line markers and whitespace-only text.
pub fn is_insignificant(node: &Handle) -> bool {
    is_line_marker(node) || is_whitespace_text(node)
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let guard = ParentGuard::new(node);
    let weak = guard.get().as_ref()?;
    weak.upgrade()
}

fn position_of(children: &[Handle], node: &Handle) -> Option<usize> {
    children.iter().position(|c| Rc::ptr_eq(c, node))
}

pub fn prev_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent(node)?;
    let children = parent.children.borrow();
    let idx = position_of(&children, node)?;
    if idx == 0 { None } else { Some(children[idx - 1].clone()) }
}

pub fn next_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent(node)?;
    let children = parent.children.borrow();
    let idx = position_of(&children, node)?;
    children.get(idx + 1).cloned()
}

/// Previous sibling, skipping decorative line markers.
pub fn prev_sibling_skipping_lines(node: &Handle) -> Option<Handle> {
    let mut cur = prev_sibling(node)?;
    while is_line_marker(&cur) {
        cur = prev_sibling(&cur)?;
    }
    Some(cur)
}

/// Next sibling, skipping decorative line markers.
pub fn next_sibling_skipping_lines(node: &Handle) -> Option<Handle> {
    let mut cur = next_sibling(node)?;
    while is_line_marker(&cur) {
        cur = next_sibling(&cur)?;
    }
    Some(cur)
}

/// Remove a node from its parent's child list and clear its parent link.
pub fn detach(node: &Handle) {
    if let Some(parent) = parent(node) {
        let mut children = parent.children.borrow_mut();
        if let Some(idx) = position_of(&children, node) {
            children.remove(idx);
        }
    }
    node.parent.set(None);
}

/// Append a child, detaching it from any previous parent first.
pub fn append_child(parent: &Handle, child: &Handle) {
    detach(child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// Insert `new` immediately before `reference` under the same parent.
/// Returns false when `reference` has no parent.
pub fn insert_before(reference: &Handle, new: &Handle) -> bool {
    let Some(parent) = parent(reference) else {
        return false;
    };
    detach(new);
    let mut children = parent.children.borrow_mut();
    let Some(idx) = position_of(&children, reference) else {
        return false;
    };
    new.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(idx, new.clone());
    true
}

/// Insert `new` immediately after `reference` under the same parent.
pub fn insert_after(reference: &Handle, new: &Handle) -> bool {
    let Some(parent) = parent(reference) else {
        return false;
    };
    detach(new);
    let mut children = parent.children.borrow_mut();
    let Some(idx) = position_of(&children, reference) else {
        return false;
    };
    new.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(idx + 1, new.clone());
    true
}

/// Replace a node with its own children, promoting them into the parent at
/// the node's position. No-op when the node has no parent.
pub fn unwrap_element(node: &Handle) {
    let Some(parent) = parent(node) else {
        return;
    };
    let promoted: Vec<Handle> = node.children.borrow_mut().drain(..).collect();
    let mut siblings = parent.children.borrow_mut();
    let Some(idx) = position_of(&siblings, node) else {
        return;
    };
    siblings.remove(idx);
    for (offset, child) in promoted.iter().enumerate() {
        child.parent.set(Some(Rc::downgrade(&parent)));
        siblings.insert(idx + offset, child.clone());
    }
    drop(siblings);
    node.parent.set(None);
}

/// Move every child of `from` to the end of `to`'s child list.
pub fn move_children(from: &Handle, to: &Handle) {
    let moved: Vec<Handle> = from.children.borrow_mut().drain(..).collect();
    let mut target = to.children.borrow_mut();
    for child in moved {
        child.parent.set(Some(Rc::downgrade(to)));
        target.push(child);
    }
}

/// Build a fresh element with the given tag and no attributes.
pub fn new_element(tag: &str) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(tag)),
        attrs: RefCell::new(Vec::new()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

pub fn new_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

/// Rebuild an element under a new tag, carrying over attributes and children,
/// and swap it into the parent's child list. The tag is part of the immutable
/// `QualName`, so renaming in place is not possible.
///
/// Returns the replacement handle; the original node ends up detached and
/// empty.
pub fn rename_element(node: &Handle, tag: &str) -> Option<Handle> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    let replacement = new_element(tag);
    if let NodeData::Element {
        attrs: new_attrs, ..
    } = &replacement.data
    {
        new_attrs.borrow_mut().extend(attrs.borrow_mut().drain(..));
    }
    let children: Vec<Handle> = node.children.borrow_mut().drain(..).collect();
    for child in &children {
        child.parent.set(Some(Rc::downgrade(&replacement)));
    }
    *replacement.children.borrow_mut() = children;
    if let Some(parent) = parent(node) {
        let mut siblings = parent.children.borrow_mut();
        if let Some(idx) = position_of(&siblings, node) {
            replacement.parent.set(Some(Rc::downgrade(&parent)));
            siblings[idx] = replacement.clone();
        }
    }
    node.parent.set(None);
    Some(replacement)
}

pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|a| &*a.name.local == name) {
            existing.value = StrTendril::from(value);
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: StrTendril::from(value),
            });
        }
    }
}

pub fn remove_attr(node: &Handle, name: &str) -> Option<String> {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(idx) = attrs.iter().position(|a| &*a.name.local == name) {
            return Some(attrs.remove(idx).value.to_string());
        }
    }
    None
}

/// Attribute names in document order.
pub fn attr_names(node: &Handle) -> Vec<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|a| a.name.local.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

pub fn attr_count(node: &Handle) -> usize {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().len(),
        _ => 0,
    }
}

/// Order-insensitive name -> value view of an element's attributes.
pub fn attr_map(node: &Handle) -> BTreeMap<String, String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// First direct child element with the given tag.
pub fn find_child(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, tag))
        .cloned()
}

/// Children that carry document meaning: everything except line markers and
/// whitespace-only text.
pub fn significant_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| !is_insignificant(c))
        .cloned()
        .collect()
}

/// Whether any ancestor (or the node itself) is a `<pre>` element.
pub fn within_pre(node: &Handle) -> bool {
    let mut cur = node.clone();
    loop {
        if is_element(&cur, "pre") {
            return true;
        }
        match parent(&cur) {
            Some(p) => cur = p,
            None => return false,
        }
    }
}

/// Total node count of a subtree, used for traversal budgets.
pub fn subtree_size(root: &Handle) -> usize {
    let mut count = 0usize;
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children.borrow().iter().cloned());
    }
    count
}
