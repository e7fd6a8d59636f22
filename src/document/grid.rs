// src/document/grid.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::TableGrid;

// Cell boundaries inside one text line: a tab, or a run of two or more
// spaces. Single spaces stay inside a cell so multi-word fund names hold
// together.
static CELL_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+| {2,}").expect("cell split pattern must compile"));

fn split_cells(line: &str) -> Vec<String> {
    CELL_SPLIT_RE
        .split(line.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Recovers table grids from a page's raw text. Consecutive lines that
/// split into two or more cells form a block; blocks of at least two lines
/// (header plus data) are returned as grids. Everything else is left to the
/// line-based fallback.
pub fn tables_from_text(text: &str) -> Vec<TableGrid> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        let cells = split_cells(line);
        if cells.len() >= 2 {
            block.push(cells);
        } else {
            flush_block(&mut block, &mut tables);
        }
    }
    flush_block(&mut block, &mut tables);

    tables
}

fn flush_block(block: &mut Vec<Vec<String>>, tables: &mut Vec<TableGrid>) {
    if block.len() >= 2 {
        tables.push(std::mem::take(block));
    } else {
        block.clear();
    }
}
