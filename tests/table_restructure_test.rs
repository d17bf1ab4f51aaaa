use wikiprep::dom::{Document, node_util};
use wikiprep::table::restructure_table;
use wikiprep::{Engine, EngineError, EngineOptions};

fn convert(html: &str) -> String {
    let engine = Engine::new(None, EngineOptions::default()).unwrap();
    engine.run(html).unwrap().serialize().unwrap()
}

fn convert_err(html: &str) -> EngineError {
    let engine = Engine::new(None, EngineOptions::default()).unwrap();
    engine.run(html).unwrap_err()
}

#[test]
fn headerless_table_gets_a_synthesized_header() {
    assert_eq!(
        convert(
            "<table><tbody>\
             <tr><td>Name</td><td>Role</td></tr>\
             <tr><td>ada</td><td>admin</td></tr>\
             </tbody></table>"
        ),
        "<table>\
         <colgroup><col style=\"width: 50%;\"><col style=\"width: 50%;\"></colgroup>\
         <thead><tr><th>Name</th><th>Role</th></tr></thead>\
         <tbody><tr><td>ada</td><td>admin</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn shared_cell_styles_are_hoisted_onto_columns() {
    assert_eq!(
        convert(
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody>\
             <tr><td style=\"color: red; padding: 1px\">a</td><td style=\"color: blue\">b</td></tr>\
             <tr><td style=\"color: red\">c</td><td style=\"color: blue\">d</td></tr>\
             </tbody></table>"
        ),
        "<table>\
         <colgroup>\
         <col style=\"color: red; width: 50%;\">\
         <col style=\"color: blue; width: 50%;\">\
         </colgroup>\
         <thead><tr><th>A</th><th>B</th></tr></thead>\
         <tbody>\
         <tr><td style=\"padding: 1px;\">a</td><td>b</td></tr>\
         <tr><td>c</td><td>d</td></tr>\
         </tbody></table>"
    );
}

#[test]
fn rowspan_cell_occupies_its_column_in_later_rows() {
    assert_eq!(
        convert(
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody>\
             <tr><td rowspan=\"2\" style=\"color: red\">x</td><td style=\"color: green\">a</td></tr>\
             <tr><td style=\"color: green\">b</td></tr>\
             <tr><td style=\"color: blue\">c</td><td style=\"color: green\">d</td></tr>\
             </tbody></table>"
        ),
        "<table>\
         <colgroup>\
         <col style=\"width: 50%;\">\
         <col style=\"color: green; width: 50%;\">\
         </colgroup>\
         <thead><tr><th>A</th><th>B</th></tr></thead>\
         <tbody>\
         <tr><td rowspan=\"2\" style=\"color: red;\">x</td><td>a</td></tr>\
         <tr><td>b</td></tr>\
         <tr><td style=\"color: blue;\">c</td><td>d</td></tr>\
         </tbody></table>"
    );
}

#[test]
fn spanning_cells_keep_their_styling() {
    assert_eq!(
        convert(
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody>\
             <tr><td style=\"color: red\">a</td><td style=\"color: red\">b</td></tr>\
             <tr><td colspan=\"2\" style=\"color: red\">wide</td></tr>\
             </tbody></table>"
        ),
        "<table>\
         <colgroup>\
         <col style=\"color: red; width: 50%;\">\
         <col style=\"color: red; width: 50%;\">\
         </colgroup>\
         <thead><tr><th>A</th><th>B</th></tr></thead>\
         <tbody>\
         <tr><td>a</td><td>b</td></tr>\
         <tr><td colspan=\"2\" style=\"color: red;\">wide</td></tr>\
         </tbody></table>"
    );
}

#[test]
fn caption_moves_ahead_of_the_sections() {
    assert_eq!(
        convert(
            "<table>\
             <tbody><tr><td>h</td></tr><tr><td>a</td></tr></tbody>\
             <caption>Totals</caption>\
             </table>"
        ),
        "<table>\
         <colgroup><col style=\"width: 100%;\"></colgroup>\
         <caption>Totals</caption>\
         <thead><tr><th>h</th></tr></thead>\
         <tbody><tr><td>a</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn empty_table_is_a_structural_error() {
    assert!(matches!(
        convert_err("<p>x</p><table></table>"),
        EngineError::TableStructure(_)
    ));
}

#[test]
fn duplicate_body_sections_are_a_structural_error() {
    let err = convert_err(
        "<table>\
         <tbody><tr><td>a</td></tr></tbody>\
         <tbody><tr><td>b</td></tr></tbody>\
         </table>",
    );
    match err {
        EngineError::TableStructure(reason) => assert!(reason.contains("tbody")),
        other => panic!("expected TableStructure, got {other:?}"),
    }
}

#[test]
fn rowspan_overflow_is_a_structural_error() {
    // Row two still has two cells, but the rowspan from row one blocks the
    // first column, pushing the second cell past the table width.
    let err = convert_err(
        "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody>\
         <tr><td rowspan=\"2\">x</td><td>a</td></tr>\
         <tr><td>b</td><td>c</td></tr>\
         </tbody></table>",
    );
    assert!(matches!(err, EngineError::TableStructure(_)));
}

// The HTML parser foster-parents stray content out of a table, so the
// misplaced-content errors only arise on programmatically built trees.

fn table_with_bad_section_child() -> (Document, markup5ever_rcdom::Handle) {
    let doc = Document::parse("<table><tbody><tr><td>a</td></tr></tbody></table>");
    let body = doc.body().unwrap();
    let table = node_util::find_child(&body, "table").unwrap();
    (doc, table)
}

#[test]
fn non_row_content_in_a_section_is_a_structural_error() {
    let (_doc, table) = table_with_bad_section_child();
    let tbody = node_util::find_child(&table, "tbody").unwrap();
    node_util::append_child(&tbody, &node_util::new_element("div"));
    assert!(matches!(
        restructure_table(&table),
        Err(EngineError::TableStructure(_))
    ));
}

#[test]
fn text_directly_inside_the_table_is_a_structural_error() {
    let (_doc, table) = table_with_bad_section_child();
    node_util::append_child(&table, &node_util::new_text("stray"));
    match restructure_table(&table) {
        Err(EngineError::TableStructure(reason)) => assert!(reason.contains("text")),
        other => panic!("expected TableStructure, got {other:?}"),
    }
}
