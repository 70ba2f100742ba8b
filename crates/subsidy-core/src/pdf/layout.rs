//! Rebuilding a cell grid from laid-out page text.
//!
//! Text extraction loses table structure, but column gaps survive as runs
//! of whitespace. Each block of non-blank lines becomes one table, and each
//! line is split into cells on gaps of two or more spaces or a tab.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::grid::{Cell, PageGrid, Table};

lazy_static! {
    static ref COLUMN_GAP: Regex = Regex::new(r"[ \u{3000}]{2,}|\t+").unwrap();
}

fn split_line(line: &str) -> Vec<Cell> {
    COLUMN_GAP
        .split(line.trim())
        .map(|cell| {
            let cell = cell.trim();
            (!cell.is_empty()).then(|| cell.to_string())
        })
        .collect()
}

/// Build a [`PageGrid`] from one page of extracted text.
pub fn grid_from_text(text: &str) -> PageGrid {
    let mut tables = Vec::new();
    let mut rows = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !rows.is_empty() {
                tables.push(Table::new(std::mem::take(&mut rows)));
            }
            continue;
        }
        rows.push(split_line(line));
    }
    if !rows.is_empty() {
        tables.push(Table::new(rows));
    }

    PageGrid::new(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_on_gaps() {
        assert_eq!(
            split_line("2025/07/05   10:00  12:00  山田 花子"),
            vec![
                Some("2025/07/05".to_string()),
                Some("10:00".to_string()),
                Some("12:00".to_string()),
                Some("山田 花子".to_string()),
            ]
        );
    }

    #[test]
    fn test_blocks_become_tables() {
        let text = "ご請求書\n\nご利用日  開始時間\n2025/07/05  10:00\n\n\nお問い合わせ";
        let grid = grid_from_text(text);
        assert_eq!(grid.tables.len(), 3);
        assert_eq!(grid.tables[1].len(), 2);
        assert_eq!(grid.tables[1].column_count(), 2);
    }

    #[test]
    fn test_empty_text() {
        assert!(grid_from_text("\n\n").tables.is_empty());
    }
}
