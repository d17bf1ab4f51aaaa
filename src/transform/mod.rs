//! The structural rule catalog and the pass visitors that drive it.
//!
//! `StructuralPass` is the composite modifier: for each visited element it
//! tries the DSL rule families first, then the built-in structural rules, in
//! a fixed order; the first rule that acts decides the traversal outcome.
//! `StylePass` runs beforehand so every later rule can assume `style`
//! attributes are canonical, and `TablePass` runs last once the tree around
//! each table has settled.

mod attrs;
mod blocks;
mod captions;
mod headings;
mod images;
mod inline;
mod lists;
mod rulepass;
mod whitespace;

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::{Outcome, TreeVisitor};
use crate::error::Result;
use crate::rules::RuleCatalog;
use crate::style::StyleDecls;
use crate::table;

/// One full traversal applying the DSL rule sets and the structural catalog.
pub struct StructuralPass<'a> {
    catalog: &'a RuleCatalog,
    ignore_system: bool,
}

impl<'a> StructuralPass<'a> {
    pub fn new(catalog: &'a RuleCatalog, ignore_system: bool) -> Self {
        Self {
            catalog,
            ignore_system,
        }
    }
}

impl TreeVisitor for StructuralPass<'_> {
    fn visit_element(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        if let Some(outcome) =
            rulepass::apply_element_rules(self.catalog, node, self.ignore_system)?
        {
            return Ok(outcome);
        }
        if let Some(outcome) =
            rulepass::apply_attribute_rules(self.catalog, node, self.ignore_system)?
        {
            return Ok(outcome);
        }
        if let Some(outcome) =
            rulepass::apply_style_rules(self.catalog, node, self.ignore_system)?
        {
            return Ok(outcome);
        }
        if let Some(outcome) =
            rulepass::apply_class_rules(self.catalog, node, self.ignore_system)?
        {
            return Ok(outcome);
        }
        if let Some(outcome) = rulepass::apply_url_rules(self.catalog, node, self.ignore_system)? {
            return Ok(outcome);
        }

        let structural: [fn(&Handle) -> Option<Outcome>; 15] = [
            attrs::remove_blank_attributes,
            images::bucket_image_width,
            inline::remove_empty_inline,
            inline::remove_null_span,
            inline::unwrap_bare_anchor,
            inline::unwrap_nested_emphasis,
            inline::merge_adjacent_inline,
            whitespace::hoist_inline_whitespace,
            headings::infer_heading,
            blocks::unwrap_plain_div,
            blocks::reduce_nested_div,
            blocks::remove_empty_block,
            lists::merge_adjacent_lists,
            lists::unwrap_list_item_paragraph,
            captions::consolidate_captions,
        ];
        for rule in structural {
            if let Some(outcome) = rule(node) {
                return Ok(outcome);
            }
        }
        Ok(Outcome::Continue)
    }

    fn visit_text(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        if let Some(outcome) = whitespace::merge_text_with_previous(node) {
            return Ok(outcome);
        }
        if let Some(outcome) = whitespace::normalize_text(node) {
            return Ok(outcome);
        }
        Ok(Outcome::Continue)
    }
}

/// Canonicalizes every `style` attribute before the structural pass runs.
/// A declaration without `:` surfaces here, before any rule has mutated the
/// document.
pub struct StylePass;

impl TreeVisitor for StylePass {
    fn visit_element(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        if let Some(raw) = node_util::get_attr(node, "style") {
            StyleDecls::parse(&raw)?.write_to(node);
        }
        Ok(Outcome::Continue)
    }
}

/// Restructures every table into its canonical skeleton.
pub struct TablePass;

impl TreeVisitor for TablePass {
    fn visit_element(&mut self, node: &Handle, _depth: usize) -> Result<Outcome> {
        if node_util::is_element(node, "table") {
            table::restructure_table(node)?;
        }
        Ok(Outcome::Continue)
    }
}
