//! In-memory grid model for tables extracted from a document page.

use serde::{Deserialize, Serialize};

/// A single table cell. `None` means the extractor saw no content.
pub type Cell = Option<String>;

/// A row of cells. Rows need not be rectangular.
pub type Row = Vec<Cell>;

/// A table extracted from one page region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from borrowed string cells; empty strings become `None`.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| if c.is_empty() { None } else { Some((*c).to_string()) })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// All tables extracted from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageGrid {
    pub tables: Vec<Table>,
}

impl PageGrid {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Parse a grid from JSON of shape `[[[cell|null, ...], ...], ...]`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Comparison form of a cell: newlines, carriage returns and all
/// half-width or full-width spaces removed.
pub fn normalize_for_match(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\u{3000}' | '\n' | '\r' | '\t'))
        .collect()
}

/// Display form of a cell: newlines folded to spaces and runs of
/// whitespace collapsed to one space.
pub fn clean_for_display(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display form of an optional cell; absent cells become empty strings.
pub fn cell_text(cell: &Cell) -> String {
    cell.as_deref().map(clean_for_display).unwrap_or_default()
}

/// True when the cell has no visible content.
pub fn is_blank(cell: &Cell) -> bool {
    cell.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true)
}
