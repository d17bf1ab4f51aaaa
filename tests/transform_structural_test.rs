use wikiprep::{Engine, EngineOptions};

fn convert(html: &str) -> String {
    let engine = Engine::new(None, EngineOptions::default()).unwrap();
    engine.run(html).unwrap().serialize().unwrap()
}

fn convert_with(rules: &str, html: &str) -> String {
    let engine = Engine::new(Some(rules), EngineOptions::default()).unwrap();
    engine.run(html).unwrap().serialize().unwrap()
}

#[test]
fn plain_div_around_blocks_is_unwrapped() {
    assert_eq!(
        convert("<div><p>a</p><p>b</p></div>"),
        "<p>a</p><p>b</p>"
    );
}

#[test]
fn div_with_attributes_survives() {
    assert_eq!(
        convert("<div class=\"note\"><p>a</p></div>"),
        "<div class=\"note\"><p>a</p></div>"
    );
}

#[test]
fn nested_plain_divs_are_reduced() {
    assert_eq!(
        convert("<div><div><p>a</p></div></div>"),
        "<p>a</p>"
    );
}

#[test]
fn null_span_is_unwrapped() {
    assert_eq!(convert("<p><span>text</span></p>"), "<p>text</p>");
}

#[test]
fn span_with_only_blank_attributes_reduces_to_null_span() {
    assert_eq!(
        convert("<p><span style=\"   \">text</span></p>"),
        "<p>text</p>"
    );
}

#[test]
fn styled_paragraph_becomes_heading() {
    assert_eq!(
        convert("<p><span style=\"font-size: 24pt\">Title</span></p>"),
        "<h2>Title</h2>"
    );
    assert_eq!(
        convert("<p><strong><span style=\"font-size: 16pt\">Minor</span></strong></p>"),
        "<h3>Minor</h3>"
    );
    assert_eq!(
        convert("<p style=\"font-size: 14pt\">Sub</p>"),
        "<h4>Sub</h4>"
    );
}

#[test]
fn body_sized_text_stays_a_paragraph() {
    assert_eq!(
        convert("<p><span style=\"font-size: 11pt\">body</span></p>"),
        "<p><span style=\"font-size: 11pt;\">body</span></p>"
    );
}

#[test]
fn image_width_is_bucketed_into_a_percentage() {
    assert_eq!(
        convert("<p><img src=\"pic.png\" width=\"400\" height=\"300\"></p>"),
        "<p><img src=\"pic.png\" style=\"width: 50%;\"></p>"
    );
}

#[test]
fn adjacent_identical_inline_elements_merge() {
    assert_eq!(
        convert("<p><strong>one</strong><strong>two</strong></p>"),
        "<p><strong>onetwo</strong></p>"
    );
}

#[test]
fn inline_elements_with_different_styles_do_not_merge() {
    assert_eq!(
        convert(
            "<p><span style=\"color: red\">a</span><span style=\"color: blue\">b</span></p>"
        ),
        "<p><span style=\"color: red;\">a</span><span style=\"color: blue;\">b</span></p>"
    );
}

#[test]
fn nested_emphasis_is_flattened() {
    assert_eq!(
        convert("<p><em><em>deep</em></em></p>"),
        "<p><em>deep</em></p>"
    );
}

#[test]
fn legacy_tags_are_modernized() {
    assert_eq!(
        convert("<p><b>bold</b> and <i>italic</i></p>"),
        "<p><strong>bold</strong> and <em>italic</em></p>"
    );
}

#[test]
fn script_content_is_dropped_entirely() {
    assert_eq!(
        convert("<p>before</p><script>alert(1)</script><p>after</p>"),
        "<p>before</p><p>after</p>"
    );
}

#[test]
fn office_suite_noise_is_stripped() {
    assert_eq!(
        convert(
            "<p class=\"MsoNormal\" style=\"mso-bidi-font-weight: bold; color: red\">x</p>"
        ),
        "<p style=\"color: red;\">x</p>"
    );
}

#[test]
fn trailing_inline_whitespace_is_hoisted() {
    assert_eq!(
        convert("<p><strong>a </strong>b</p>"),
        "<p><strong>a</strong> b</p>"
    );
}

#[test]
fn text_whitespace_is_collapsed_and_nbsp_normalized() {
    assert_eq!(convert("<p>a\u{a0}  b</p>"), "<p>a b</p>");
}

#[test]
fn space_between_inline_siblings_survives() {
    assert_eq!(
        convert("<p><em>a</em> <em>b</em></p>"),
        "<p><em>a</em> <em>b</em></p>"
    );
}

#[test]
fn whitespace_between_blocks_is_dropped() {
    assert_eq!(convert("<p>a</p> <p>b</p>"), "<p>a</p><p>b</p>");
}

#[test]
fn adjacent_lists_merge() {
    assert_eq!(
        convert("<ul><li>a</li></ul><ul><li>b</li></ul>"),
        "<ul><li>a</li><li>b</li></ul>"
    );
}

#[test]
fn sole_paragraph_inside_list_item_is_unwrapped() {
    assert_eq!(
        convert("<ul><li><p>a</p></li></ul>"),
        "<ul><li>a</li></ul>"
    );
}

#[test]
fn anchor_without_target_is_unwrapped() {
    assert_eq!(convert("<p><a>label</a></p>"), "<p>label</p>");
}

#[test]
fn insecure_anchor_urls_are_upgraded() {
    assert_eq!(
        convert("<p><a href=\"http://example.com/x\">t</a></p>"),
        "<p><a href=\"https://example.com/x\">t</a></p>"
    );
}

#[test]
fn exact_style_set_becomes_a_class() {
    assert_eq!(
        convert("<p><span style=\"color: #ff0000\">red</span></p>"),
        "<p><span class=\"important\">red</span></p>"
    );
}

#[test]
fn user_rule_shadows_builtin_under_first_match_wins() {
    assert_eq!(
        convert_with("[ELEMENTS]\nREPLACE b WITH em\n", "<p><b>x</b></p>"),
        "<p><em>x</em></p>"
    );
}

#[test]
fn system_rules_can_be_suppressed() {
    let engine = Engine::new(
        None,
        EngineOptions {
            ignore_system_rules: true,
        },
    )
    .unwrap();
    // structural cleanup still runs, but the built-in b -> strong rule is off
    assert_eq!(
        engine.run("<p><b>x</b></p>").unwrap().serialize().unwrap(),
        "<p><b>x</b></p>"
    );
}

#[test]
fn style_declaration_moves_to_wrapper_element() {
    assert_eq!(
        convert_with(
            "[STYLES]\nMOVE font-weight: bold TO ELEMENT strong\n",
            "<p><span style=\"color: red; font-weight: bold\">x</span></p>"
        ),
        "<p><span style=\"color: red;\"><strong>x</strong></span></p>"
    );
}

#[test]
fn style_declaration_moves_to_attribute() {
    assert_eq!(
        convert_with(
            "[STYLES]\nMOVE width: 50% TO ATTRIBUTE\n",
            "<div id=\"box\" style=\"width: 50%\"><p>x</p></div>"
        ),
        "<div id=\"box\" width=\"50%\"><p>x</p></div>"
    );
}

#[test]
fn attribute_moves_into_style() {
    assert_eq!(
        convert("<p color=\"red\">x</p>"),
        "<p style=\"color: red;\">x</p>"
    );
}

#[test]
fn empty_blocks_vanish() {
    assert_eq!(convert("<p>a</p><p>   </p><p>b</p>"), "<p>a</p><p>b</p>");
}

#[test]
fn line_markers_do_not_break_inline_merging() {
    assert_eq!(
        convert("<p><strong>a</strong><line number=\"3\"></line><strong>b</strong></p>"),
        "<p><strong>ab</strong><line number=\"3\"></line></p>"
    );
}
