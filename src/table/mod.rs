//! Table canonicalization and per-column style factoring.
//!
//! A restructured table has exactly one `<colgroup>` as its first child (one
//! `<col>` per logical column), then the caption if one survived
//! consolidation, at most one `<thead>`, at most one `<tfoot>`, and exactly
//! one `<tbody>` with all data rows. When the source table has no header,
//! the first body row is promoted and its data cells become header cells.
//!
//! Style declarations shared by every single-column cell of a logical column
//! are hoisted onto that column's `<col>` and removed from the cells.
//! Rowspan occupancy is tracked per column so a spanning cell is counted
//! once and correctly blocks the rows below it; cells spanning multiple
//! columns keep their styling and are excluded from the intersection.

use markup5ever_rcdom::Handle;
use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::dom::node_util;
use crate::error::{EngineError, Result};
use crate::style::StyleDecls;

type Occupancy = SmallVec<[u32; 16]>;

struct TableParts {
    caption: Option<Handle>,
    thead: Option<Handle>,
    tfoot: Option<Handle>,
    tbody: Option<Handle>,
    line_markers: Vec<Handle>,
}

/// Rewrite one `<table>` into canonical form. Structural violations are
/// fatal for the conversion run.
pub fn restructure_table(table: &Handle) -> Result<()> {
    let parts = classify_children(table)?;
    let tbody = parts
        .tbody
        .ok_or_else(|| EngineError::TableStructure("table has no body rows".to_string()))?;

    let thead = match parts.thead {
        Some(thead) => thead,
        None => synthesize_thead(&tbody)?,
    };

    let head_rows = rows_of(&thead, "thead")?;
    let body_rows = rows_of(&tbody, "tbody")?;

    let column_count = head_rows
        .iter()
        .chain(body_rows.iter())
        .map(|row| row_width(row))
        .max()
        .unwrap_or(0);
    if column_count == 0 {
        return Err(EngineError::TableStructure(
            "table has no cells".to_string(),
        ));
    }

    let common = column_common_styles(&body_rows, column_count)?;
    let colgroup = build_colgroup(column_count, &common);
    strip_hoisted(&head_rows, &common, column_count)?;
    strip_hoisted(&body_rows, &common, column_count)?;

    // Reassemble in canonical order. Whitespace between sections is dropped;
    // line markers are kept for diagnostics, after the skeleton.
    let children: Vec<Handle> = table.children.borrow().clone();
    for child in children {
        node_util::detach(&child);
    }
    node_util::append_child(table, &colgroup);
    if let Some(caption) = &parts.caption {
        node_util::append_child(table, caption);
    }
    node_util::append_child(table, &thead);
    if let Some(tfoot) = &parts.tfoot {
        node_util::append_child(table, tfoot);
    }
    node_util::append_child(table, &tbody);
    for marker in &parts.line_markers {
        node_util::append_child(table, marker);
    }

    debug!(
        columns = column_count,
        header_rows = head_rows.len(),
        body_rows = body_rows.len(),
        "table canonicalized"
    );
    Ok(())
}

/// Sort the table's direct children into the recognized sections. Any
/// unexpected element or non-blank text is a structural error.
fn classify_children(table: &Handle) -> Result<TableParts> {
    let mut parts = TableParts {
        caption: None,
        thead: None,
        tfoot: None,
        tbody: None,
        line_markers: Vec::new(),
    };
    let children: Vec<Handle> = table.children.borrow().clone();
    let mut significant = 0usize;
    for child in &children {
        if node_util::is_line_marker(child) {
            parts.line_markers.push(child.clone());
            continue;
        }
        if node_util::is_whitespace_text(child) {
            continue;
        }
        significant += 1;
        match node_util::tag_name(child) {
            Some("caption") => assign_unique(&mut parts.caption, child, "caption")?,
            Some("thead") => assign_unique(&mut parts.thead, child, "thead")?,
            Some("tfoot") => assign_unique(&mut parts.tfoot, child, "tfoot")?,
            Some("tbody") => assign_unique(&mut parts.tbody, child, "tbody")?,
            // Rebuilt from scratch below.
            Some("colgroup") => {}
            Some(other) => {
                return Err(EngineError::TableStructure(format!(
                    "unexpected <{other}> directly inside <table>"
                )));
            }
            None => {
                return Err(EngineError::TableStructure(
                    "unexpected text directly inside <table>".to_string(),
                ));
            }
        }
    }
    if significant == 0 {
        return Err(EngineError::TableStructure("table is empty".to_string()));
    }
    Ok(parts)
}

fn assign_unique(slot: &mut Option<Handle>, child: &Handle, what: &str) -> Result<()> {
    if slot.is_some() {
        return Err(EngineError::TableStructure(format!(
            "more than one <{what}> section"
        )));
    }
    *slot = Some(child.clone());
    Ok(())
}

/// Promote the first body row into a fresh `<thead>`, converting its data
/// cells to header cells.
fn synthesize_thead(tbody: &Handle) -> Result<Handle> {
    let first_row = rows_of(tbody, "tbody")?
        .into_iter()
        .next()
        .ok_or_else(|| {
            EngineError::TableStructure(
                "cannot locate a first body row to synthesize the header from".to_string(),
            )
        })?;
    node_util::detach(&first_row);
    for cell in node_util::significant_children(&first_row) {
        if node_util::is_element(&cell, "td") {
            node_util::rename_element(&cell, "th");
        }
    }
    let thead = node_util::new_element("thead");
    node_util::append_child(&thead, &first_row);
    Ok(thead)
}

/// Rows of a section; anything significant that is not a `<tr>` is fatal.
fn rows_of(section: &Handle, what: &str) -> Result<Vec<Handle>> {
    let mut rows = Vec::new();
    for child in node_util::significant_children(section) {
        if node_util::is_element(&child, "tr") {
            rows.push(child);
        } else {
            return Err(EngineError::TableStructure(format!(
                "non-row content inside <{what}>"
            )));
        }
    }
    Ok(rows)
}

/// Cells of a row; anything significant that is not `<td>`/`<th>` is fatal.
fn cells_of(row: &Handle) -> Result<Vec<Handle>> {
    let mut cells = Vec::new();
    for child in node_util::significant_children(row) {
        match node_util::tag_name(&child) {
            Some("td") | Some("th") => cells.push(child),
            _ => {
                return Err(EngineError::TableStructure(
                    "non-cell content inside <tr>".to_string(),
                ));
            }
        }
    }
    Ok(cells)
}

fn span_attr(cell: &Handle, name: &str) -> usize {
    node_util::get_attr(cell, name)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&span| span >= 1)
        .unwrap_or(1)
}

/// Logical width of one row, counting colspans.
fn row_width(row: &Handle) -> usize {
    node_util::significant_children(row)
        .iter()
        .map(|cell| span_attr(cell, "colspan"))
        .sum()
}

/// For each logical column, the intersection of style declarations present
/// on every single-column cell occupying it across all body rows. `None`
/// means no such cell exists for the column.
fn column_common_styles(
    body_rows: &[Handle],
    column_count: usize,
) -> Result<Vec<Option<StyleDecls>>> {
    let mut occupancy: Occupancy = smallvec![0; column_count];
    let mut common: Vec<Option<StyleDecls>> = vec![None; column_count];

    for row in body_rows {
        let mut column = 0usize;
        for cell in cells_of(row)? {
            while column < column_count && occupancy[column] > 0 {
                column += 1;
            }
            if column >= column_count {
                return Err(EngineError::TableStructure(
                    "row is wider than the computed column count".to_string(),
                ));
            }
            let colspan = span_attr(&cell, "colspan");
            let rowspan = span_attr(&cell, "rowspan");
            if colspan == 1 {
                let decls = StyleDecls::from_element(&cell)?;
                match &mut common[column] {
                    None => common[column] = Some(decls),
                    Some(existing) => existing.retain_common(&decls),
                }
            }
            if rowspan > 1 {
                // Stored as rowspan, decremented once per row including this
                // one, so the cell blocks exactly rowspan-1 later rows.
                for occupied in occupancy
                    .iter_mut()
                    .skip(column)
                    .take(colspan.min(column_count - column))
                {
                    *occupied = rowspan as u32;
                }
            }
            column += colspan;
        }
        for occupied in occupancy.iter_mut() {
            *occupied = occupied.saturating_sub(1);
        }
    }
    Ok(common)
}

/// Build the `<colgroup>`: each `<col>` gets the even width split plus the
/// common style computed for its column.
fn build_colgroup(column_count: usize, common: &[Option<StyleDecls>]) -> Handle {
    let colgroup = node_util::new_element("colgroup");
    let width = 100 / column_count;
    for column_common in common {
        let col = node_util::new_element("col");
        let mut decls = StyleDecls::default();
        decls.insert("width", &format!("{width}%"));
        if let Some(extra) = column_common {
            for (name, value) in extra.iter() {
                decls.insert(name, value);
            }
        }
        decls.write_to(&col);
        node_util::append_child(&colgroup, &col);
    }
    colgroup
}

/// Remove hoisted declarations from every single-column cell; spanning cells
/// keep their styling unchanged.
fn strip_hoisted(
    rows: &[Handle],
    common: &[Option<StyleDecls>],
    column_count: usize,
) -> Result<()> {
    let mut occupancy: Occupancy = smallvec![0; column_count];
    for row in rows {
        let mut column = 0usize;
        for cell in cells_of(row)? {
            while column < column_count && occupancy[column] > 0 {
                column += 1;
            }
            if column >= column_count {
                return Err(EngineError::TableStructure(
                    "row is wider than the computed column count".to_string(),
                ));
            }
            let colspan = span_attr(&cell, "colspan");
            let rowspan = span_attr(&cell, "rowspan");
            if colspan == 1
                && let Some(hoisted) = &common[column]
                && !hoisted.is_empty()
            {
                let mut decls = StyleDecls::from_element(&cell)?;
                decls.remove_present_in(hoisted);
                decls.write_to(&cell);
            }
            if rowspan > 1 {
                for occupied in occupancy
                    .iter_mut()
                    .skip(column)
                    .take(colspan.min(column_count - column))
                {
                    *occupied = rowspan as u32;
                }
            }
            column += colspan;
        }
        for occupied in occupancy.iter_mut() {
            *occupied = occupied.saturating_sub(1);
        }
    }
    Ok(())
}
