use markup5ever_rcdom::Handle;
use wikiprep::dom::{Document, node_util};
use wikiprep::{Outcome, Result, TreeVisitor, TreeWalker};

/// Records the tag/text of every visit, optionally replaying a scripted
/// outcome per visited tag.
struct Recorder {
    visits: Vec<String>,
    script: Vec<(String, Outcome)>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            visits: Vec::new(),
            script: Vec::new(),
        }
    }
}

impl TreeVisitor for Recorder {
    fn visit_element(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        let tag = node_util::tag_name(node).unwrap_or("?").to_string();
        self.visits.push(tag.clone());
        if let Some(idx) = self.script.iter().position(|(t, _)| *t == tag) {
            let (_, outcome) = self.script.remove(idx);
            return Ok(outcome);
        }
        Ok(Outcome::Continue)
    }

    fn visit_text(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        self.visits
            .push(format!("#{}", node_util::text_contents(node).unwrap()));
        Ok(Outcome::Continue)
    }
}

fn body_of(html: &str) -> (Document, Handle) {
    let doc = Document::parse(html);
    let body = doc.body().unwrap();
    (doc, body)
}

#[test]
fn continue_visits_every_node_once_in_document_order() {
    let (_doc, body) = body_of("<div><p>a<em>b</em></p><p>c</p></div><ul><li>d</li></ul>");
    let mut recorder = Recorder::new();
    TreeWalker::new(body).walk(&mut recorder).unwrap();
    assert_eq!(
        recorder.visits,
        vec!["body", "div", "p", "#a", "em", "#b", "p", "#c", "ul", "li", "#d"]
    );
}

#[test]
fn restart_from_self_revisits_the_same_node() {
    let (_doc, body) = body_of("<p>a</p>");
    let mut recorder = Recorder::new();
    recorder
        .script
        .push(("p".to_string(), Outcome::RestartFromSelf));
    TreeWalker::new(body).walk(&mut recorder).unwrap();
    assert_eq!(recorder.visits, vec!["body", "p", "p", "#a"]);
}

#[test]
fn restart_from_parent_backs_up_one_level() {
    let (_doc, body) = body_of("<div><p>a</p></div>");
    let mut recorder = Recorder::new();
    recorder
        .script
        .push(("p".to_string(), Outcome::RestartFromParent));
    TreeWalker::new(body).walk(&mut recorder).unwrap();
    assert_eq!(recorder.visits, vec!["body", "div", "p", "div", "p", "#a"]);
}

#[test]
fn restart_from_root_restarts_the_pass() {
    let (_doc, body) = body_of("<p>a</p><p>b</p>");
    let mut recorder = Recorder::new();
    recorder
        .script
        .push(("p".to_string(), Outcome::RestartFromRoot));
    TreeWalker::new(body).walk(&mut recorder).unwrap();
    assert_eq!(
        recorder.visits,
        vec!["body", "p", "body", "p", "#a", "p", "#b"]
    );
}

#[test]
fn back_to_first_sibling_rewinds_the_child_list() {
    let (_doc, body) = body_of("<ul><li>a</li><li>b</li></ul>");
    let mut recorder = Recorder::new();
    recorder
        .script
        .push(("li".to_string(), Outcome::BackToFirstSibling));
    TreeWalker::new(body).walk(&mut recorder).unwrap();
    assert_eq!(
        recorder.visits,
        vec!["body", "ul", "li", "li", "#a", "li", "#b"]
    );
}

#[test]
fn back_to_first_sibling_without_parent_restarts_from_root() {
    let root = node_util::new_element("div");
    node_util::append_child(&root, &node_util::new_element("p"));
    let mut recorder = Recorder::new();
    recorder
        .script
        .push(("div".to_string(), Outcome::BackToFirstSibling));
    TreeWalker::new(root).walk(&mut recorder).unwrap();
    assert_eq!(recorder.visits, vec!["div", "div", "p"]);
}

/// Unwraps the first div it sees; the walk resumes from the parent and
/// covers the promoted children.
struct DivUnwrapper {
    seen: Vec<String>,
}

impl TreeVisitor for DivUnwrapper {
    fn visit_element(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        let tag = node_util::tag_name(node).unwrap_or("?").to_string();
        self.seen.push(tag.clone());
        if tag == "div" {
            node_util::unwrap_element(node);
            return Ok(Outcome::RestartFromParent);
        }
        Ok(Outcome::Continue)
    }
}

#[test]
fn mutating_visitor_with_restart_still_terminates_and_covers_the_tree() {
    let (doc, body) = body_of("<div><p>a</p><p>b</p></div>");
    let mut visitor = DivUnwrapper { seen: Vec::new() };
    TreeWalker::new(body).walk(&mut visitor).unwrap();
    assert_eq!(visitor.seen, vec!["body", "div", "body", "p", "p"]);
    assert_eq!(doc.serialize().unwrap(), "<p>a</p><p>b</p>");
}

/// A visitor that always restarts from itself never settles; the walker
/// reports the loop instead of hanging.
struct Looper;

impl TreeVisitor for Looper {
    fn visit_element(&mut self, _node: &Handle, _depth: usize) -> Result<Outcome> {
        Ok(Outcome::RestartFromSelf)
    }
}

#[test]
fn looping_rule_is_reported_as_invariant_violation() {
    let (_doc, body) = body_of("<p>a</p>");
    let result = TreeWalker::new(body).walk(&mut Looper);
    assert!(matches!(
        result,
        Err(wikiprep::EngineError::InvariantViolation(_))
    ));
}

#[test]
fn back_to_previous_sibling_resumes_at_merge_target() {
    let (doc, body) = body_of("<p><b>a</b><b>b</b></p>");
    let _ = doc;

    struct Merger {
        order: Vec<String>,
    }
    impl TreeVisitor for Merger {
        fn visit_element(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
            let tag = node_util::tag_name(node).unwrap_or("?").to_string();
            self.order.push(tag.clone());
            if tag == "b"
                && let Some(prev) = node_util::prev_sibling_skipping_lines(node)
                && node_util::tag_name(&prev) == Some("b")
            {
                node_util::move_children(node, &prev);
                node_util::detach(node);
                return Ok(Outcome::BackToPreviousSibling);
            }
            Ok(Outcome::Continue)
        }
    }

    let mut merger = Merger { order: Vec::new() };
    TreeWalker::new(body).walk(&mut merger).unwrap();
    // second <b> merges into the first, walk resumes at the survivor
    assert_eq!(merger.order, vec!["body", "p", "b", "b", "b"]);
    assert_eq!(doc.serialize().unwrap(), "<p><b>ab</b></p>");
}
