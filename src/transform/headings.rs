//! Heading inference.
//!
//! Editors export headings as paragraphs wrapping a chain of styled inline
//! elements. A `<p>` whose only significant descendant chain is
//! `p`/`span`/`strong`/`b`/`font` wrappers carrying a bucketed `font-size`
//! is rewritten to the matching heading element, keeping the original
//! paragraph's attributes and the innermost content.

use markup5ever_rcdom::{Handle, NodeData};

use crate::dom::node_util;
use crate::dom::walker::Outcome;
use crate::style::StyleDecls;

const WRAPPER_TAGS: &[&str] = &["p", "span", "strong", "b", "font"];

/// Map a font size in points to a heading level. Size groups follow the
/// usual editor presets: group 1 (>= 20pt) -> h2, group 2 (16-19pt) -> h3,
/// group 3 (14-15pt) -> h4. Body-sized text never becomes a heading.
fn heading_level(points: f32) -> Option<u32> {
    if points >= 20.0 {
        Some(2)
    } else if points >= 16.0 {
        Some(3)
    } else if points >= 14.0 {
        Some(4)
    } else {
        None
    }
}

/// Parse a `font-size` value. Bare numbers are read as points; pixel values
/// are converted at the CSS reference ratio of 0.75pt/px.
fn parse_font_size(value: &str) -> Option<f32> {
    let value = value.trim();
    if let Some(px) = value.strip_suffix("px") {
        return px.trim().parse::<f32>().ok().map(|v| v * 0.75);
    }
    value.strip_suffix("pt").unwrap_or(value).trim().parse().ok()
}

fn font_size_of(node: &Handle) -> Option<f32> {
    let decls = StyleDecls::from_element(node).ok()?;
    parse_font_size(decls.get("font-size")?)
}

pub(super) fn infer_heading(node: &Handle) -> Option<Outcome> {
    if node_util::tag_name(node)? != "p" || node_util::parent(node).is_none() {
        return None;
    }

    // Follow the single-wrapper chain down, remembering the innermost
    // font-size seen along the way.
    let mut size = font_size_of(node);
    let mut innermost = node.clone();
    loop {
        let significant = node_util::significant_children(&innermost);
        let [only] = significant.as_slice() else {
            break;
        };
        let Some(tag) = node_util::tag_name(only) else {
            break;
        };
        if !WRAPPER_TAGS.contains(&tag) {
            break;
        }
        if let Some(s) = font_size_of(only) {
            size = Some(s);
        }
        innermost = only.clone();
    }

    let level = heading_level(size?)?;
    if node_util::significant_children(&innermost).is_empty() {
        return None;
    }

    let heading = node_util::new_element(&format!("h{level}"));
    if let (
        NodeData::Element { attrs: from, .. },
        NodeData::Element { attrs: to, .. },
    ) = (&node.data, &heading.data)
    {
        to.borrow_mut().extend(from.borrow().iter().cloned());
    }
    // The size is now conveyed by the tag itself.
    if let Ok(mut decls) = StyleDecls::from_element(&heading) {
        decls.remove_name("font-size");
        decls.write_to(&heading);
    }
    node_util::move_children(&innermost, &heading);
    node_util::insert_before(node, &heading);
    node_util::detach(node);
    Some(Outcome::RestartFromParent)
}

#[cfg(test)]
mod tests {
    use super::{heading_level, parse_font_size};

    #[test]
    fn size_groups() {
        assert_eq!(heading_level(24.0), Some(2));
        assert_eq!(heading_level(17.0), Some(3));
        assert_eq!(heading_level(14.0), Some(4));
        assert_eq!(heading_level(12.0), None);
    }

    #[test]
    fn font_size_units() {
        assert_eq!(parse_font_size("16pt"), Some(16.0));
        assert_eq!(parse_font_size("16"), Some(16.0));
        assert_eq!(parse_font_size("24px"), Some(18.0));
        assert_eq!(parse_font_size("large"), None);
    }
}
