//! Locating the usage table on a page and trimming it to the data region.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::TableError;
use crate::models::config::LocatorConfig;
use crate::models::grid::{cell_text, is_blank, normalize_for_match, PageGrid, Row, Table};

/// Where the usage-date marker was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerLocation {
    /// Index of the table within the page.
    pub table: usize,
    /// Row index of the marker cell.
    pub row: usize,
    /// Column index of the marker cell.
    pub col: usize,
    /// Length of the marker cell's normalized text, in characters.
    pub text_len: usize,
}

/// A table trimmed to start at the marker cell, with display-cleaned cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimmedTable {
    pub rows: Vec<Vec<String>>,
    pub location: MarkerLocation,
}

impl TrimmedTable {
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}

/// Finds the usage table among all tables of a page.
#[derive(Debug, Clone)]
pub struct TableLocator {
    markers: Vec<String>,
    total_markers: Vec<String>,
}

impl TableLocator {
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            markers: config.markers.iter().map(|m| normalize_for_match(m)).collect(),
            total_markers: config
                .total_markers
                .iter()
                .map(|m| normalize_for_match(m))
                .collect(),
        }
    }

    fn is_marker(&self, normalized: &str) -> bool {
        self.markers.iter().any(|m| normalized.contains(m.as_str()))
    }

    fn is_total_row(&self, row: &Row) -> bool {
        let joined: String = row
            .iter()
            .filter_map(|c| c.as_deref())
            .map(normalize_for_match)
            .collect();
        self.total_markers.iter().any(|m| joined.contains(m.as_str()))
    }

    /// Find the marker cell with the shortest normalized text across all
    /// tables. Ties keep the first cell in table, row, column order.
    pub fn locate(&self, tables: &[Table]) -> Result<MarkerLocation, TableError> {
        let mut best: Option<MarkerLocation> = None;
        let mut candidates = 0usize;

        for (table_idx, table) in tables.iter().enumerate() {
            for (row_idx, row) in table.rows.iter().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    let Some(text) = cell.as_deref() else {
                        continue;
                    };
                    let normalized = normalize_for_match(text);
                    if !self.is_marker(&normalized) {
                        continue;
                    }

                    candidates += 1;
                    let text_len = normalized.chars().count();
                    trace!(
                        "Marker candidate table={} row={} col={} len={}",
                        table_idx, row_idx, col_idx, text_len
                    );

                    if best.is_none_or(|b| text_len < b.text_len) {
                        best = Some(MarkerLocation {
                            table: table_idx,
                            row: row_idx,
                            col: col_idx,
                            text_len,
                        });
                    }
                }
            }
        }

        match best {
            Some(location) => {
                debug!(
                    "Selected marker at table {} ({},{}) out of {} candidates",
                    location.table, location.row, location.col, candidates
                );
                Ok(location)
            }
            None => Err(TableError::NotFound {
                tables_scanned: tables.len(),
            }),
        }
    }

    /// Slice `table` from the marker down and to the right, dropping blank
    /// rows and total/subtotal rows, then check the header survived.
    pub fn trim(&self, table: &Table, location: MarkerLocation) -> Result<TrimmedTable, TableError> {
        let rows: Vec<Row> = table
            .rows
            .iter()
            .skip(location.row)
            .filter_map(|row| row.get(location.col..).map(<[_]>::to_vec))
            .filter(|row| !row.iter().all(is_blank))
            .filter(|row| !self.is_total_row(row))
            .collect();

        if rows.is_empty() {
            return Err(TableError::TrimFailed);
        }

        let first_cell = rows[0].first().and_then(|c| c.as_deref()).unwrap_or("");
        if !self.is_marker(&normalize_for_match(first_cell)) {
            return Err(TableError::HeaderValidation {
                first_cell: first_cell.to_string(),
            });
        }

        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        info!(
            "Trimmed table {} to {} rows x {} columns",
            location.table,
            rows.len(),
            rows[0].len()
        );

        Ok(TrimmedTable { rows, location })
    }

    /// Locate and trim in one step.
    pub fn extract(&self, grid: &PageGrid) -> Result<TrimmedTable, TableError> {
        let location = self.locate(&grid.tables)?;
        self.trim(&grid.tables[location.table], location)
    }
}

impl Default for TableLocator {
    fn default() -> Self {
        Self::new(&LocatorConfig::default())
    }
}
