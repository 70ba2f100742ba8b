//! Mapping arbitrary header labels onto the canonical schema.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::config::{HeaderAlias, SchemaConfig};
use crate::models::grid::normalize_for_match;
use crate::models::record::{CanonicalColumn, CanonicalRecord, CanonicalTable};

/// Canonical column → source column index.
pub type ColumnMapping = BTreeMap<CanonicalColumn, usize>;

/// Resolves header labels against the alias table.
#[derive(Debug, Clone)]
pub struct HeaderMapper {
    headers: Vec<String>,
    /// Aliases with normalized labels, in declaration order.
    aliases: Vec<HeaderAlias>,
}

impl HeaderMapper {
    pub fn new(schema: &SchemaConfig) -> Self {
        Self {
            headers: schema.headers.clone(),
            aliases: schema
                .aliases
                .iter()
                .map(|a| HeaderAlias::new(normalize_for_match(&a.label), a.column))
                .filter(|a| !a.label.is_empty())
                .collect(),
        }
    }

    /// Resolve one header label.
    ///
    /// An exact alias match wins. Otherwise the longest alias that contains
    /// or is contained in the label is taken; equal lengths keep the alias
    /// declared first.
    pub fn resolve(&self, label: &str) -> Option<CanonicalColumn> {
        let normalized = normalize_for_match(label);
        if normalized.is_empty() {
            return None;
        }

        if let Some(alias) = self.aliases.iter().find(|a| a.label == normalized) {
            return Some(alias.column);
        }

        let mut best: Option<&HeaderAlias> = None;
        for alias in &self.aliases {
            let related = normalized.contains(alias.label.as_str())
                || alias.label.contains(normalized.as_str());
            if !related {
                continue;
            }
            let longer = best.is_none_or(|b| alias.label.chars().count() > b.label.chars().count());
            if longer {
                best = Some(alias);
            }
        }

        best.map(|a| a.column)
    }

    /// Build the canonical → source column mapping for a header row.
    /// The first source column resolved to a canonical slot keeps it.
    pub fn map_header<S: AsRef<str>>(&self, header: &[S]) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();

        for (idx, label) in header.iter().enumerate() {
            let label = label.as_ref();
            match self.resolve(label) {
                Some(column) => {
                    if let Some(existing) = mapping.get(&column) {
                        debug!(
                            "Header {:?} (col {}) also maps to {}, keeping col {}",
                            label, idx, column, existing
                        );
                    } else {
                        mapping.insert(column, idx);
                    }
                }
                None => debug!("Header {:?} (col {}) has no canonical column", label, idx),
            }
        }

        let missing: Vec<String> = CanonicalColumn::ALL
            .iter()
            .filter(|c| !mapping.contains_key(c))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            warn!("Columns not found in source header: {}", missing.join(", "));
        }

        mapping
    }

    /// Project one source row into canonical shape.
    pub fn project_row<S: AsRef<str>>(&self, mapping: &ColumnMapping, row: &[S]) -> CanonicalRecord {
        let mut record = CanonicalRecord::new();
        for (column, &source) in mapping {
            let value = row.get(source).map(|s| s.as_ref().trim()).unwrap_or("");
            record.set(*column, value);
        }
        record
    }

    /// Project a header row plus data rows into a canonical table.
    pub fn project<S: AsRef<str>>(&self, header: &[S], rows: &[Vec<S>]) -> CanonicalTable {
        let mapping = self.map_header(header);
        let rows = rows
            .iter()
            .map(|row| self.project_row(&mapping, row))
            .collect();
        CanonicalTable::new(self.headers.clone(), rows)
    }
}

impl Default for HeaderMapper {
    fn default() -> Self {
        Self::new(&SchemaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::COLUMN_COUNT;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_exact() {
        let mapper = HeaderMapper::default();
        assert_eq!(mapper.resolve("ご利用日"), Some(CanonicalColumn::UsageDate));
        assert_eq!(mapper.resolve("お支払い額"), Some(CanonicalColumn::TotalPaid));
        assert_eq!(mapper.resolve("保育料 (非課税)"), Some(CanonicalColumn::BaseFeeUntaxed));
        assert_eq!(mapper.resolve("保育料（税込10%）"), Some(CanonicalColumn::BaseFeeTaxed));
    }

    #[test]
    fn test_resolve_substring_prefers_longest_alias() {
        let mapper = HeaderMapper::default();
        // Contains both "助成対象" and "助成対象金額"; the longer alias wins.
        assert_eq!(
            mapper.resolve("※助成対象金額(円)"),
            Some(CanonicalColumn::EligibleAmount)
        );
        // "開始" is a substring of the label.
        assert_eq!(mapper.resolve("開始 予定"), Some(CanonicalColumn::StartTime));
        assert_eq!(mapper.resolve("交通費※1"), Some(CanonicalColumn::TransportFee));
    }

    #[test]
    fn test_resolve_longest_beats_declaration_order() {
        let schema = SchemaConfig {
            headers: SchemaConfig::default().headers,
            aliases: vec![
                HeaderAlias::new("料", CanonicalColumn::OptionFee),
                HeaderAlias::new("キャンセル料", CanonicalColumn::CancellationFee),
            ],
        };
        let mapper = HeaderMapper::new(&schema);
        assert_eq!(
            mapper.resolve("キャンセル料※"),
            Some(CanonicalColumn::CancellationFee)
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let mapper = HeaderMapper::default();
        assert_eq!(mapper.resolve("備考"), None);
        assert_eq!(mapper.resolve("  "), None);
    }

    #[test]
    fn test_first_match_keeps_slot() {
        let mapper = HeaderMapper::default();
        let mapping = mapper.map_header(&["ご利用日", "利用日", "開始時刻"]);
        assert_eq!(mapping.get(&CanonicalColumn::UsageDate), Some(&0));
        assert_eq!(mapping.get(&CanonicalColumn::StartTime), Some(&2));
    }

    #[test]
    fn test_projection_is_total() {
        let mapper = HeaderMapper::default();
        let header = vec!["ご利用日", "備考", "お支払い額", "開始時刻"];
        let rows = vec![
            vec!["2025/07/05", "メモ", "12,000", "10:00"],
            vec!["2025/07/06"],
        ];

        let table = mapper.project(&header, &rows);
        assert_eq!(table.header.len(), COLUMN_COUNT);
        assert_eq!(table.rows.len(), 2);
        for row in &table.rows {
            assert_eq!(row.fields().len(), COLUMN_COUNT);
        }

        let first = &table.rows[0];
        assert_eq!(first.get(CanonicalColumn::UsageDate), "2025/07/05");
        assert_eq!(first.get(CanonicalColumn::StartTime), "10:00");
        assert_eq!(first.get(CanonicalColumn::TotalPaid), "12,000");
        assert_eq!(first.get(CanonicalColumn::EndTime), "");

        let second = &table.rows[1];
        assert_eq!(second.get(CanonicalColumn::TotalPaid), "");
    }
}
