//! Column-aligned plain text tables.
//!
//! Tables are laid out by `comfy_table` with every border and separator
//! removed. Every column except the last is padded to the display width of
//! its widest cell plus [`COLUMN_GAP`] spaces, so wide characters still line
//! up in a fixed-width font. Trailing whitespace is stripped from each line.

use comfy_table::{presets::NOTHING, Cell, ContentArrangement, Table};

/// Spaces between columns.
pub const COLUMN_GAP: u16 = 4;

/// Borderless table with the header (when shown) and rows loaded.
///
/// Rows are cut or filled with empty cells to the header count.
pub fn new_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>], show_header: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled);

    if show_header {
        table.set_header(headers.iter().map(|h| Cell::new(h.as_ref())));
    }
    for row in rows {
        table.add_row(
            (0..headers.len()).map(|i| Cell::new(row.get(i).map(String::as_str).unwrap_or(""))),
        );
    }

    let last = headers.len().saturating_sub(1);
    for (i, column) in table.column_iter_mut().enumerate() {
        let right = if i < last { COLUMN_GAP } else { 0 };
        column.set_padding((0, right));
    }

    table
}

/// Render `rows` under `headers`, one line per row, each ending in `\n`.
///
/// Rows keep their order. Cells beyond the header count are ignored and
/// missing cells render empty.
pub fn render_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>], show_header: bool) -> String {
    if headers.is_empty() || (!show_header && rows.is_empty()) {
        return String::new();
    }

    new_table(headers, rows, show_header)
        .lines()
        .fold(String::new(), |mut out, line| {
            out.push_str(line.trim_end());
            out.push('\n');
            out
        })
}
