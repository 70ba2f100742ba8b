//! Configuration structures for the conversion engine.
//!
//! Every constant table the engine consults (header aliases, marker
//! spellings, provider literals, rates) lives here so callers can inject
//! alternate values.

use serde::{Deserialize, Serialize};

use crate::error::SubsidyError;
use crate::models::record::{CanonicalColumn, COLUMN_COUNT};

/// Main configuration for the conversion engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Canonical schema and header aliases.
    pub schema: SchemaConfig,

    /// Table locator markers.
    pub locator: LocatorConfig,

    /// Document format classifier literals.
    pub classifier: ClassifierConfig,

    /// Subsidy rates and the night window.
    pub rates: RateConfig,

    /// Report defaults.
    pub report: ReportConfig,
}

/// One observed header label mapped to a canonical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderAlias {
    pub label: String,
    pub column: CanonicalColumn,
}

impl HeaderAlias {
    pub fn new(label: impl Into<String>, column: CanonicalColumn) -> Self {
        Self {
            label: label.into(),
            column,
        }
    }
}

/// Canonical schema configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Header labels written for the 14 canonical columns.
    pub headers: Vec<String>,

    /// Alias table in priority order.
    pub aliases: Vec<HeaderAlias>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        use CanonicalColumn::*;

        let table: &[(&str, CanonicalColumn)] = &[
            ("ご利用日", UsageDate),
            ("ご利\u{2F64}\u{2F47}", UsageDate),
            ("利用日", UsageDate),
            ("利\u{2F64}\u{2F47}", UsageDate),
            ("開始時刻", StartTime),
            ("開始時間", StartTime),
            ("開始", StartTime),
            ("終了時刻", EndTime),
            ("終了時間", EndTime),
            ("終了", EndTime),
            ("シッター名", ProviderName),
            ("担当シッター", ProviderName),
            ("シッター", ProviderName),
            ("お子さま", RecipientName),
            ("お子様", RecipientName),
            ("お子さま名", RecipientName),
            ("保育料(非課税)", BaseFeeUntaxed),
            ("保育料（非課税）", BaseFeeUntaxed),
            ("保育料(税込10%)", BaseFeeTaxed),
            ("保育料（税込10%）", BaseFeeTaxed),
            ("保育料(税込10％)", BaseFeeTaxed),
            ("保育料（税込10％）", BaseFeeTaxed),
            ("オプション料(税込10%)", OptionFee),
            ("オプション料（税込10%）", OptionFee),
            ("オプション料", OptionFee),
            ("交通費(税込10%)", TransportFee),
            ("交通費（税込10%）", TransportFee),
            ("交通費", TransportFee),
            ("特別費用(税込10%)", SpecialFee),
            ("特別費用（税込10%）", SpecialFee),
            ("特別費用", SpecialFee),
            ("キャンセル料(不課税)", CancellationFee),
            ("キャンセル料（不課税）", CancellationFee),
            ("キャンセル料", CancellationFee),
            ("割引額", Discount),
            ("割引", Discount),
            ("お支払い額", TotalPaid),
            ("お支払額", TotalPaid),
            ("支払額", TotalPaid),
            ("(一時預かりのみ)助成対象金額", EligibleAmount),
            ("（一時預かりのみ）助成対象金額", EligibleAmount),
            ("助成対象金額", EligibleAmount),
            ("助成対象", EligibleAmount),
        ];

        Self {
            headers: CanonicalColumn::ALL
                .iter()
                .map(|c| c.default_label().to_string())
                .collect(),
            aliases: table
                .iter()
                .map(|(label, column)| HeaderAlias::new(*label, *column))
                .collect(),
        }
    }
}

impl SchemaConfig {
    /// Check that the header list is 14 wide and every column has an alias.
    pub fn validate(&self) -> Result<(), SubsidyError> {
        if self.headers.len() != COLUMN_COUNT {
            return Err(SubsidyError::Config(format!(
                "schema.headers must have {} entries, found {}",
                COLUMN_COUNT,
                self.headers.len()
            )));
        }

        for column in CanonicalColumn::ALL {
            if !self.aliases.iter().any(|a| a.column == column) {
                return Err(SubsidyError::Config(format!(
                    "schema.aliases has no alias for column {}",
                    column
                )));
            }
        }

        if let Some(alias) = self.aliases.iter().find(|a| a.label.trim().is_empty()) {
            return Err(SubsidyError::Config(format!(
                "schema.aliases has an empty label for column {}",
                alias.column
            )));
        }

        Ok(())
    }
}

/// Table locator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Accepted spellings of the usage-date header.
    pub markers: Vec<String>,

    /// Markers that identify total or subtotal rows.
    pub total_markers: Vec<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            markers: vec![
                "ご利用日".to_string(),
                // Kangxi radical forms emitted by some PDF fonts
                "ご利\u{2F64}\u{2F47}".to_string(),
                "利用日".to_string(),
                "利\u{2F64}\u{2F47}".to_string(),
            ],
            total_markers: vec![
                "合計".to_string(),
                "小計".to_string(),
                "\u{2F29}計".to_string(),
            ],
        }
    }
}

/// Document format classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Literals that identify the receipt-issuing provider.
    pub provider_literals: Vec<String>,

    /// Title phrases used on receipts.
    pub receipt_phrases: Vec<String>,

    /// Literals of other providers that share the receipt phrase.
    pub competitor_literals: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider_literals: vec![
                "株式会社キッズライン".to_string(),
                "KIDSLINE".to_string(),
                "kidsline.me".to_string(),
            ],
            receipt_phrases: vec![
                "領収書兼利用明細書".to_string(),
                "領収書兼ご利用明細書".to_string(),
                "Receipt/UsageStatement".to_string(),
            ],
            competitor_literals: vec![
                "株式会社ポピンズ".to_string(),
                "ポピンズシッター".to_string(),
                "スマートシッター".to_string(),
                "株式会社アルファスタッフ".to_string(),
            ],
        }
    }
}

/// Subsidy rates and the night window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Subsidy per full daytime hour.
    pub day_rate: u64,

    /// Subsidy per full night hour.
    pub night_rate: u64,

    /// Hour at which the night window opens.
    pub night_start_hour: u32,

    /// Hour at which the night window closes (next morning).
    pub night_end_hour: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            day_rate: 2500,
            night_rate: 3500,
            night_start_hour: 22,
            night_end_hour: 6,
        }
    }
}

/// Report defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Applicant name printed on the form.
    pub applicant_name: String,

    /// Child name used when the records carry none.
    pub default_child_name: String,

    /// Offset between the calendar year and the era year.
    pub era_offset: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            applicant_name: "杉並 太郎".to_string(),
            default_child_name: "杉並 花子".to_string(),
            era_offset: 2018,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, SubsidyError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), SubsidyError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), SubsidyError> {
        self.schema.validate()?;

        if self.locator.markers.is_empty() {
            return Err(SubsidyError::Config("locator.markers is empty".to_string()));
        }

        let rates = &self.rates;
        if rates.night_start_hour > 23 || rates.night_end_hour > 23 {
            return Err(SubsidyError::Config(
                "night window hours must be within 0..=23".to_string(),
            ));
        }
        if rates.night_end_hour >= rates.night_start_hour {
            return Err(SubsidyError::Config(
                "night window must wrap past midnight".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_every_column_has_alias() {
        let schema = SchemaConfig::default();
        for column in CanonicalColumn::ALL {
            assert!(schema.aliases.iter().any(|a| a.column == column), "{column}");
        }
    }

    #[test]
    fn test_missing_alias_rejected() {
        let mut schema = SchemaConfig::default();
        schema.aliases.retain(|a| a.column != CanonicalColumn::Discount);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = EngineConfig::default();
        config.report.applicant_name = "山田 一郎".to_string();
        config.save(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.report.applicant_name, "山田 一郎");
        assert_eq!(loaded.rates, RateConfig::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"rates": {"day_rate": 3000}}"#).unwrap();
        assert_eq!(config.rates.day_rate, 3000);
        assert_eq!(config.rates.night_rate, 3500);
        assert_eq!(config.schema.headers.len(), COLUMN_COUNT);
    }
}
