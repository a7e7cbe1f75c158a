//! Pipe-table pass.
//!
//! A row is the span from the first to the last `|` on a line. Rows whose
//! cells are all dash runs (the markdown header separator) are dropped.
//! Rows separated only by whitespace form one table; the whitespace between
//! them is removed so no line breaks end up inside the container.

use std::sync::OnceLock;

use regex::{Captures, Regex};

pub(super) const ROW_PATTERN: &str = r"(?R)\|(.+)\|";

const TABLE_OPEN: &str = r#"<div class="chat-table">"#;
const ROW_OPEN: &str = r#"<div class="table-row">"#;
const CELL_OPEN: &str = r#"<div class="table-cell">"#;
const CLOSE: &str = "</div>";

static ROW_REGEX: OnceLock<Regex> = OnceLock::new();

fn row_regex() -> &'static Regex {
    ROW_REGEX.get_or_init(|| Regex::new(ROW_PATTERN).expect("Failed to compile table row regex"))
}

enum Row {
    Cells(String),
    Separator,
}

fn build_row(caps: &Captures<'_>) -> Row {
    let content = caps.get(1).map_or("", |m| m.as_str());
    let cells: Vec<&str> = content.split('|').map(str::trim).collect();

    if cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-'))
    {
        return Row::Separator;
    }

    let mut row = String::from(ROW_OPEN);
    for cell in cells {
        row.push_str(CELL_OPEN);
        row.push_str(cell);
        row.push_str(CLOSE);
    }
    row.push_str(CLOSE);
    Row::Cells(row)
}

pub(super) fn rewrite_tables(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_table = false;
    let mut last = 0;

    for caps in row_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let between = &text[last..whole.start()];
        last = whole.end();

        let contiguous = in_table && between.trim().is_empty();
        if !contiguous {
            if in_table {
                out.push_str(CLOSE);
                in_table = false;
            }
            out.push_str(between);
        }

        match build_row(&caps) {
            Row::Cells(row) => {
                if !in_table {
                    out.push_str(TABLE_OPEN);
                    in_table = true;
                }
                out.push_str(&row);
            }
            // Inside a table the separator is transparent; outside one it
            // simply disappears.
            Row::Separator => {}
        }
    }

    if in_table {
        out.push_str(CLOSE);
    }
    out.push_str(&text[last..]);
    out
}
