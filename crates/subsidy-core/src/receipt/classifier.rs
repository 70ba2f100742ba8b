//! Receipt vs. invoice-table classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::config::ClassifierConfig;
use crate::models::grid::normalize_for_match;

/// Layout of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Free-text receipt for a single session.
    Receipt,
    /// Multi-row invoice with a usage table.
    InvoiceTable,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Receipt => write!(f, "receipt"),
            DocumentFormat::InvoiceTable => write!(f, "invoice_table"),
        }
    }
}

/// Decides the document format from its text.
#[derive(Debug, Clone)]
pub struct FormatClassifier {
    provider_literals: Vec<String>,
    receipt_phrases: Vec<String>,
    competitor_literals: Vec<String>,
}

impl FormatClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let normalize = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| normalize_for_match(s))
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            provider_literals: normalize(&config.provider_literals),
            receipt_phrases: normalize(&config.receipt_phrases),
            competitor_literals: normalize(&config.competitor_literals),
        }
    }

    /// Classify a document by its concatenated text.
    ///
    /// A provider literal makes it a receipt. So does a receipt phrase, as
    /// long as no competing provider is named.
    pub fn classify(&self, text: &str) -> DocumentFormat {
        let normalized = normalize_for_match(text);
        let contains_any = |list: &[String]| list.iter().any(|s| normalized.contains(s.as_str()));

        if contains_any(&self.provider_literals) {
            return DocumentFormat::Receipt;
        }
        if contains_any(&self.receipt_phrases) && !contains_any(&self.competitor_literals) {
            return DocumentFormat::Receipt;
        }
        DocumentFormat::InvoiceTable
    }
}

impl Default for FormatClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_literal_is_receipt() {
        let classifier = FormatClassifier::default();
        let text = "ご利用明細\n株式会社キッズライン\n東京都港区";
        assert_eq!(classifier.classify(text), DocumentFormat::Receipt);
    }

    #[test]
    fn test_receipt_phrase_without_competitor() {
        let classifier = FormatClassifier::default();
        assert_eq!(
            classifier.classify("領収書 兼 利用明細書\nご利用日時 7月5日"),
            DocumentFormat::Receipt
        );
    }

    #[test]
    fn test_receipt_phrase_with_competitor() {
        let classifier = FormatClassifier::default();
        assert_eq!(
            classifier.classify("領収書兼利用明細書\n株式会社ポピンズ"),
            DocumentFormat::InvoiceTable
        );
    }

    #[test]
    fn test_invoice_grid_header() {
        let classifier = FormatClassifier::default();
        let text = "ご利用日 開始時刻 終了時刻 シッター名 お子さま お支払い額";
        assert_eq!(classifier.classify(text), DocumentFormat::InvoiceTable);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = FormatClassifier::default();
        let text = "株式会社ポピンズ 領収書兼利用明細書 株式会社キッズライン";
        let first = classifier.classify(text);
        assert_eq!(first, DocumentFormat::Receipt);
        assert_eq!(classifier.classify(text), first);
    }

    #[test]
    fn test_display() {
        assert_eq!(DocumentFormat::InvoiceTable.to_string(), "invoice_table");
        assert_eq!(DocumentFormat::Receipt.to_string(), "receipt");
    }
}
