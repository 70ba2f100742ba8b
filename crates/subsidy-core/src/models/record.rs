//! Canonical usage records shared by the table and receipt paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fields in a canonical record.
pub const COLUMN_COUNT: usize = 14;

/// Fixed canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalColumn {
    UsageDate,
    StartTime,
    EndTime,
    ProviderName,
    RecipientName,
    BaseFeeUntaxed,
    BaseFeeTaxed,
    OptionFee,
    TransportFee,
    SpecialFee,
    CancellationFee,
    Discount,
    TotalPaid,
    EligibleAmount,
}

impl CanonicalColumn {
    /// All columns in canonical order.
    pub const ALL: [CanonicalColumn; COLUMN_COUNT] = [
        CanonicalColumn::UsageDate,
        CanonicalColumn::StartTime,
        CanonicalColumn::EndTime,
        CanonicalColumn::ProviderName,
        CanonicalColumn::RecipientName,
        CanonicalColumn::BaseFeeUntaxed,
        CanonicalColumn::BaseFeeTaxed,
        CanonicalColumn::OptionFee,
        CanonicalColumn::TransportFee,
        CanonicalColumn::SpecialFee,
        CanonicalColumn::CancellationFee,
        CanonicalColumn::Discount,
        CanonicalColumn::TotalPaid,
        CanonicalColumn::EligibleAmount,
    ];

    /// Position of this column in a canonical row.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Header label written to canonical CSV output.
    pub fn default_label(self) -> &'static str {
        match self {
            CanonicalColumn::UsageDate => "ご利用日",
            CanonicalColumn::StartTime => "開始時刻",
            CanonicalColumn::EndTime => "終了時刻",
            CanonicalColumn::ProviderName => "シッター名",
            CanonicalColumn::RecipientName => "お子さま",
            CanonicalColumn::BaseFeeUntaxed => "保育料 (非課税)",
            CanonicalColumn::BaseFeeTaxed => "保育料 (税込10%)",
            CanonicalColumn::OptionFee => "オプション料 (税込10%)",
            CanonicalColumn::TransportFee => "交通費 (税込10%)",
            CanonicalColumn::SpecialFee => "特別費用 (税込10%)",
            CanonicalColumn::CancellationFee => "キャンセル料 (不課税)",
            CanonicalColumn::Discount => "割引額",
            CanonicalColumn::TotalPaid => "お支払い額",
            CanonicalColumn::EligibleAmount => "(一時預かりのみ) 助成対象金額",
        }
    }

    /// True for the nine fee and amount columns.
    pub fn is_amount(self) -> bool {
        self.index() >= CanonicalColumn::BaseFeeUntaxed.index()
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        f.write_str(&name)
    }
}

/// One usage session in the canonical 14-field shape.
///
/// Missing values are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    fields: [String; COLUMN_COUNT],
}

impl CanonicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a row of arbitrary width: extra cells are
    /// dropped, missing cells become empty strings.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let mut record = Self::default();
        for (slot, cell) in record.fields.iter_mut().zip(cells) {
            *slot = cell.as_ref().to_string();
        }
        record
    }

    pub fn get(&self, column: CanonicalColumn) -> &str {
        &self.fields[column.index()]
    }

    pub fn set(&mut self, column: CanonicalColumn, value: impl Into<String>) {
        self.fields[column.index()] = value.into();
    }

    pub fn with(mut self, column: CanonicalColumn, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// A canonical table: one header row plus data rows, all 14 wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub header: Vec<String>,
    pub rows: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    /// Create a table whose header uses the given labels.
    pub fn new(header: Vec<String>, rows: Vec<CanonicalRecord>) -> Self {
        Self { header, rows }
    }

    /// Create a table with the built-in header labels.
    pub fn with_default_header(rows: Vec<CanonicalRecord>) -> Self {
        let header = CanonicalColumn::ALL
            .iter()
            .map(|c| c.default_label().to_string())
            .collect();
        Self { header, rows }
    }

    /// Header plus data rows as plain string rows.
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().map(|r| r.fields().to_vec()))
            .collect()
    }
}
