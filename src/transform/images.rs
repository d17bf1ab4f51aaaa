//! Image width bucketing.
//!
//! Absolute pixel widths exported by editors are meaningless to the target
//! markup; they are snapped to a small set of percentage buckets carried in
//! the `style` attribute, and the pixel attributes are dropped.

use markup5ever_rcdom::Handle;

use crate::dom::node_util;
use crate::dom::walker::Outcome;
use crate::style::StyleDecls;

fn width_bucket(pixels: u32) -> &'static str {
    match pixels {
        0..=150 => "20%",
        151..=300 => "30%",
        301..=450 => "50%",
        451..=600 => "75%",
        _ => "100%",
    }
}

pub(super) fn bucket_image_width(node: &Handle) -> Option<Outcome> {
    if node_util::tag_name(node)? != "img" {
        return None;
    }
    let width = node_util::get_attr(node, "width")?;
    let pixels: u32 = width.trim().parse().ok()?;

    node_util::remove_attr(node, "width");
    node_util::remove_attr(node, "height");
    let mut decls = StyleDecls::from_element(node).unwrap_or_default();
    decls.insert("width", width_bucket(pixels));
    decls.write_to(node);
    Some(Outcome::RestartFromSelf)
}

#[cfg(test)]
mod tests {
    use super::width_bucket;

    #[test]
    fn buckets() {
        assert_eq!(width_bucket(100), "20%");
        assert_eq!(width_bucket(400), "50%");
        assert_eq!(width_bucket(700), "100%");
    }
}
