//! Receipt field extraction.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::patterns::*;
use crate::error::ExtractionError;
use crate::models::record::{CanonicalColumn, CanonicalRecord};
use crate::records::{clean_person_name, format_amount, parse_amount, parse_time};

/// Fields read from one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptFields {
    pub date: NaiveDate,
    /// Start time, `HH:MM`.
    pub start_time: String,
    /// End time, `HH:MM`; empty when not found.
    pub end_time: String,
    /// Total duration printed on the receipt, in minutes.
    pub printed_minutes: Option<u32>,
    pub provider_name: String,
    pub recipient_name: String,
    pub base_fee: u64,
    pub option_fee: u64,
    pub transport_fee: u64,
    pub total_paid: u64,
}

impl ReceiptFields {
    /// Project into the canonical shape shared with the table path.
    ///
    /// The base fee fills both the untaxed fee and the eligible amount;
    /// columns a receipt has no notion of are `"0"`.
    pub fn to_record(&self) -> CanonicalRecord {
        use CanonicalColumn::*;

        CanonicalRecord::new()
            .with(UsageDate, self.date.format("%Y/%m/%d").to_string())
            .with(StartTime, self.start_time.as_str())
            .with(EndTime, self.end_time.as_str())
            .with(ProviderName, self.provider_name.as_str())
            .with(RecipientName, self.recipient_name.as_str())
            .with(BaseFeeUntaxed, format_amount(self.base_fee))
            .with(BaseFeeTaxed, "0")
            .with(OptionFee, format_amount(self.option_fee))
            .with(TransportFee, format_amount(self.transport_fee))
            .with(SpecialFee, "0")
            .with(CancellationFee, "0")
            .with(Discount, "0")
            .with(TotalPaid, format_amount(self.total_paid))
            .with(EligibleAmount, format_amount(self.base_fee))
    }
}

/// Result of receipt extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptExtraction {
    pub fields: ReceiptFields,
    pub record: CanonicalRecord,
    /// Non-fatal problems noticed while extracting.
    pub warnings: Vec<String>,
}

/// Regex-based receipt extractor.
#[derive(Debug, Clone, Default)]
pub struct ReceiptExtractor {
    /// Year used when the receipt prints none; defaults to the current year.
    fallback_year: Option<i32>,
}

impl ReceiptExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the year used when the document carries none.
    pub fn with_fallback_year(mut self, year: i32) -> Self {
        self.fallback_year = Some(year);
        self
    }

    fn fallback_year(&self) -> i32 {
        self.fallback_year.unwrap_or_else(|| Local::now().year())
    }

    fn extract_provider(&self, text: &str) -> Result<String, ExtractionError> {
        let mut candidates: Vec<String> = Vec::new();

        for caps in PROVIDER_LINE.captures_iter(text) {
            let value = caps[1].trim().trim_start_matches([':', '：']).trim();
            if value.is_empty() {
                continue;
            }
            if PROVIDER_HEADING_PREFIXES.iter().any(|p| value.starts_with(p)) {
                debug!("Skipping provider heading line: {:?}", value);
                continue;
            }
            let name = clean_person_name(value);
            if !name.is_empty() && !candidates.contains(&name) {
                candidates.push(name);
            }
        }

        match candidates.len() {
            0 | 1 => Ok(candidates.pop().unwrap_or_default()),
            _ => Err(ExtractionError::Ambiguous {
                field: "provider_name".to_string(),
                candidates,
            }),
        }
    }

    fn extract_recipient(&self, text: &str) -> String {
        RECIPIENT_LINE
            .captures(text)
            .map(|caps| clean_person_name(&caps[1]))
            .unwrap_or_default()
    }

    fn extract_amount(&self, pattern: &regex::Regex, text: &str) -> Option<u64> {
        pattern.captures(text).and_then(|caps| parse_amount(&caps[1]))
    }

    /// Extract the receipt fields from text.
    ///
    /// The usage date and start time are required; everything else
    /// defaults to empty or zero.
    pub fn extract(&self, text: &str) -> Result<ReceiptExtraction, ExtractionError> {
        let mut warnings = Vec::new();

        let Some(usage) = USAGE_DATETIME.captures(text) else {
            return Err(if USAGE_DATE_ONLY.is_match(text) {
                ExtractionError::MissingField("start_time".to_string())
            } else {
                ExtractionError::MissingField("usage_date".to_string())
            });
        };

        let receipt_year = RECEIPT_DATE
            .captures(text)
            .and_then(|caps| caps[1].parse::<i32>().ok());
        let year = match (usage.get(1), receipt_year) {
            (Some(y), _) => y.as_str().parse::<i32>().unwrap_or_else(|_| self.fallback_year()),
            (None, Some(y)) => y,
            (None, None) => {
                warnings.push("no year on receipt, using current year".to_string());
                self.fallback_year()
            }
        };

        let month: u32 = usage[2].parse().unwrap_or(0);
        let day: u32 = usage[3].parse().unwrap_or(0);
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ExtractionError::Parse {
            field: "usage_date".to_string(),
            value: format!("{}/{}/{}", year, &usage[2], &usage[3]),
        })?;

        let start = parse_time(&usage[4]).ok_or_else(|| ExtractionError::Parse {
            field: "start_time".to_string(),
            value: usage[4].to_string(),
        })?;
        let start_time = start.format("%H:%M").to_string();

        let end_time = match parse_time(&usage[5]) {
            Some(end) => end.format("%H:%M").to_string(),
            None => {
                warnings.push(format!("unreadable end time {:?}", &usage[5]));
                String::new()
            }
        };

        let printed_minutes = usage.get(6).and_then(|h| {
            let hours: u32 = h.as_str().parse().ok()?;
            let minutes: u32 = usage.get(7).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
            Some(hours.saturating_mul(60).saturating_add(minutes))
        });

        let provider_name = self.extract_provider(text)?;
        if provider_name.is_empty() {
            warnings.push("provider name not found".to_string());
        }

        let recipient_name = self.extract_recipient(text);
        if recipient_name.is_empty() {
            warnings.push("recipient name not found".to_string());
        }

        let base_fee = self.extract_amount(&BASE_FEE, text).unwrap_or(0);
        let option_fee = self.extract_amount(&OPTION_FEE, text).unwrap_or(0);
        let transport_fee = self.extract_amount(&TRANSPORT_FEE, text).unwrap_or(0);
        let total_paid = self.extract_amount(&TOTAL_PAID, text).unwrap_or_else(|| {
            warnings.push("total paid not found".to_string());
            0
        });

        let fields = ReceiptFields {
            date,
            start_time,
            end_time,
            printed_minutes,
            provider_name,
            recipient_name,
            base_fee,
            option_fee,
            transport_fee,
            total_paid,
        };

        for warning in &warnings {
            warn!("Receipt {}: {}", fields.date, warning);
        }
        info!(
            "Extracted receipt for {} {}-{} total {}",
            fields.date, fields.start_time, fields.end_time, fields.total_paid
        );

        let record = fields.to_record();
        Ok(ReceiptExtraction {
            fields,
            record,
            warnings,
        })
    }
}
