//! Column layout of struct bodies
//!
//! Re-aligns the field lines of a struct the way gofmt lays them out. Each
//! field line is split into cells (names, type, tag, trailing comment) and
//! a run of adjacent lines that all have a cell in some column pads that
//! column to its widest cell plus one space. Blank lines, comment lines and
//! the inner lines of multi-line fields end every run.

use std::ops::Range;

use crate::parser::{FieldDecl, StructDecl};
use crate::rewriter::Edit;

/// Spaces between a cell and the next column
const PADDING: usize = 1;

/// One body line; a line without cells breaks every column
#[derive(Debug)]
struct Row<'a> {
    start: usize,
    content: &'a str,
    indent: &'a str,
    cells: Vec<&'a str>,
}

/// Edits that re-align the body lines of `decl`
///
/// Only lines strictly between the `{` and `}` lines are considered, so a
/// struct written on one line is never touched. A line ending in `\r\n`
/// keeps its `\r`.
pub(crate) fn align_struct(source: &str, decl: &StructDecl) -> Vec<Edit> {
    let Some(newline) = source[decl.open..].find('\n') else {
        return Vec::new();
    };
    let body_start = decl.open + newline + 1;
    let body_end = source[..decl.close].rfind('\n').map_or(0, |i| i + 1);
    if body_start >= body_end {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut offset = body_start;
    for line in source[body_start..body_end].split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        rows.push(row(source, offset, content, &decl.fields));
        offset += line.len();
    }

    let widths = column_widths(&rows);
    rows.iter()
        .zip(widths)
        .filter(|(row, _)| !row.cells.is_empty())
        .filter_map(|(row, widths)| {
            let text = render(row, &widths);
            (text != row.content).then(|| Edit {
                start: row.start,
                end: row.start + row.content.len(),
                text,
            })
        })
        .collect()
}

fn row<'a>(source: &'a str, start: usize, content: &'a str, fields: &[FieldDecl]) -> Row<'a> {
    let line = start..start + content.len();
    let mut on_line = fields.iter().filter(|f| line.contains(&f.start));
    let cells = match (on_line.next(), on_line.next()) {
        (Some(field), None) => field_cells(source, field, line.clone()).unwrap_or_default(),
        _ => Vec::new(),
    };
    Row {
        start,
        content,
        indent: &content[..content.len() - content.trim_start().len()],
        cells,
    }
}

/// Cells of the one field starting on `line`, or `None` when anything but
/// whitespace sits between them
fn field_cells<'a>(source: &'a str, field: &FieldDecl, line: Range<usize>) -> Option<Vec<&'a str>> {
    let blank = |from: usize, to: usize| source[from..to].trim().is_empty();
    if !blank(line.start, field.start) {
        return None;
    }

    let mut cells = Vec::with_capacity(4);
    if !field.is_embedded() {
        if !blank(field.names_end, field.type_start) {
            return None;
        }
        cells.push(&source[field.start..field.names_end]);
    }

    let field_end = field.tag.as_ref().map_or(field.type_end, |tag| tag.end);
    if field_end > line.end {
        // type continues on the following lines
        if field.is_embedded() {
            return None;
        }
        cells.push(source[field.type_start..line.end].trim_end());
        return Some(cells);
    }

    cells.push(&source[field.type_start..field.type_end]);
    if let Some(tag) = &field.tag {
        if !blank(field.type_end, tag.start) {
            return None;
        }
        cells.push(&source[tag.start..tag.end]);
    }

    let trailing = source[field_end..line.end].trim();
    if trailing.is_empty() {
        return Some(cells);
    }
    if !trailing.starts_with("//") {
        return None;
    }
    if field.is_embedded() && field.tag.is_none() {
        cells.push("");
    }
    cells.push(trailing);
    Some(cells)
}

/// Widths of each row's padded cells; every cell but the last is padded
fn column_widths(rows: &[Row<'_>]) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new(); rows.len()];
    format_block(rows, 0..rows.len(), &mut Vec::new(), &mut out);
    out
}

/// Size column `widths.len()` for each run of rows in `block` that has a
/// cell there, then the columns right of it within that run
fn format_block(
    rows: &[Row<'_>],
    block: Range<usize>,
    widths: &mut Vec<usize>,
    out: &mut [Vec<usize>],
) {
    let column = widths.len();
    let has_column = |row: &Row<'_>| row.cells.len() > column + 1;

    let mut first = block.start;
    let mut i = block.start;
    while i < block.end {
        if !has_column(&rows[i]) {
            i += 1;
            continue;
        }
        assign(out, first..i, widths);
        first = i;

        let mut width = 0;
        let mut empty = true;
        while i < block.end && has_column(&rows[i]) {
            let cell = rows[i].cells[column].chars().count();
            width = width.max(cell + PADDING);
            empty &= cell == 0;
            i += 1;
        }

        widths.push(if empty { 0 } else { width });
        format_block(rows, first..i, widths, out);
        widths.pop();
        first = i;
    }
    assign(out, first..block.end, widths);
}

fn assign(out: &mut [Vec<usize>], rows: Range<usize>, widths: &[usize]) {
    for row in &mut out[rows] {
        row.clear();
        row.extend_from_slice(widths);
    }
}

fn render(row: &Row<'_>, widths: &[usize]) -> String {
    let mut text = String::with_capacity(row.content.len());
    text.push_str(row.indent);
    let Some((last, padded)) = row.cells.split_last() else {
        return text;
    };
    for (cell, width) in padded.iter().zip(widths) {
        text.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        text.extend(std::iter::repeat_n(' ', pad));
    }
    text.push_str(last);
    text
}
