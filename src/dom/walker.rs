//! Mutation-aware pre-order traversal.
//!
//! Structural rules mutate the tree they are being walked over, so the walk
//! cannot live on the call stack. The walker holds an explicit
//! (handle, depth) position and resolves the next position from the
//! [`Outcome`] each visit reports. Parent and previous-sibling handles are
//! snapshotted before every visit, so restart outcomes still resolve after
//! the visited node was detached or merged away.

use std::rc::Rc;

use markup5ever_rcdom::{Handle, NodeData};
use tracing::warn;

use super::node_util;
use crate::error::{EngineError, Result};

/// Where the walker resumes after visiting a node.
///
/// `Continue` strictly advances document order; every other variant is only
/// reported after a structural change and re-derives the position from the
/// new tree shape. Edge cases are total: a restart that names a missing
/// relative degrades to the nearest enclosing restart (parent -> root,
/// previous sibling -> parent or self).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Advance to the next node in document order.
    Continue,
    /// Re-run the whole pass from the walk root.
    RestartFromRoot,
    /// Re-visit the visited node's parent.
    RestartFromParent,
    /// Re-visit the same node, e.g. after its attributes or children changed.
    RestartFromSelf,
    /// Resume from the previous non-line-marker sibling, used after merging
    /// the visited node into it.
    BackToPreviousSibling,
    /// Resume from the parent's first child.
    BackToFirstSibling,
}

/// One rule, or a composite of several, driven by the walker.
pub trait TreeVisitor {
    fn visit_element(&mut self, node: &Handle, depth: usize) -> Result<Outcome>;

    fn visit_text(&mut self, _node: &Handle, _depth: usize) -> Result<Outcome> {
        Ok(Outcome::Continue)
    }
}

/// Position snapshot taken before a visit so restart outcomes can be
/// resolved even when the visit detached the current node.
struct VisitSnapshot {
    parent: Option<Handle>,
    prev_sibling: Option<Handle>,
}

pub struct TreeWalker {
    root: Handle,
    max_steps: usize,
}

impl TreeWalker {
    pub fn new(root: Handle) -> Self {
        // A looping rule is a bug, not bad input; the budget turns it into a
        // reportable invariant violation instead of a hang.
        let max_steps = 64 + 16 * node_util::subtree_size(&root);
        Self { root, max_steps }
    }

    /// Visit every element and text node of the subtree, letting the visitor
    /// redirect the walk after mutations.
    pub fn walk<V: TreeVisitor>(&self, visitor: &mut V) -> Result<()> {
        let mut current = self.root.clone();
        let mut depth = 0usize;
        let mut steps = 0usize;
        loop {
            steps += 1;
            if steps > self.max_steps {
                warn!(steps, "traversal budget exceeded");
                return Err(EngineError::InvariantViolation(format!(
                    "traversal did not settle after {steps} visits; a rule is looping"
                )));
            }
            let snapshot = VisitSnapshot {
                parent: node_util::parent(&current),
                prev_sibling: node_util::prev_sibling_skipping_lines(&current),
            };
            let outcome = match &current.data {
                NodeData::Element { .. } => visitor.visit_element(&current, depth)?,
                NodeData::Text { .. } => visitor.visit_text(&current, depth)?,
                _ => Outcome::Continue,
            };
            match self.resolve(&current, depth, outcome, &snapshot) {
                Some((next, next_depth)) => {
                    current = next;
                    depth = next_depth;
                }
                None => return Ok(()),
            }
        }
    }

    fn resolve(
        &self,
        current: &Handle,
        depth: usize,
        outcome: Outcome,
        snapshot: &VisitSnapshot,
    ) -> Option<(Handle, usize)> {
        match outcome {
            Outcome::Continue => self.next_in_document_order(current, depth),
            Outcome::RestartFromRoot => Some((self.root.clone(), 0)),
            Outcome::RestartFromParent => match &snapshot.parent {
                Some(parent) => Some((parent.clone(), depth.saturating_sub(1))),
                None => Some((self.root.clone(), 0)),
            },
            Outcome::RestartFromSelf => Some((current.clone(), depth)),
            Outcome::BackToPreviousSibling => match &snapshot.prev_sibling {
                Some(prev) => Some((prev.clone(), depth)),
                None if node_util::parent(current).is_none()
                    && !Rc::ptr_eq(current, &self.root) =>
                {
                    // The node was merged away and had no previous sibling.
                    match &snapshot.parent {
                        Some(parent) => Some((parent.clone(), depth.saturating_sub(1))),
                        None => Some((self.root.clone(), 0)),
                    }
                }
                None => Some((current.clone(), depth)),
            },
            Outcome::BackToFirstSibling => match &snapshot.parent {
                Some(parent) => {
                    let first = parent.children.borrow().first().cloned();
                    match first {
                        Some(first) => Some((first, depth)),
                        None => Some((parent.clone(), depth.saturating_sub(1))),
                    }
                }
                None => Some((self.root.clone(), 0)),
            },
        }
    }

    /// Descend to the first child, otherwise climb to the nearest ancestor
    /// with a following sibling. Returns `None` when the walk is complete.
    fn next_in_document_order(&self, node: &Handle, depth: usize) -> Option<(Handle, usize)> {
        if let Some(first) = node.children.borrow().first() {
            return Some((first.clone(), depth + 1));
        }
        let mut cur = node.clone();
        let mut d = depth;
        loop {
            if d == 0 || Rc::ptr_eq(&cur, &self.root) {
                return None;
            }
            if let Some(sibling) = node_util::next_sibling(&cur) {
                return Some((sibling, d));
            }
            cur = node_util::parent(&cur)?;
            d -= 1;
        }
    }
}
