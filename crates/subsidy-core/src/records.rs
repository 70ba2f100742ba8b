//! Parsing and validation of canonical record values.

use chrono::{NaiveDate, NaiveTime};

use crate::error::ConvertError;
use crate::models::record::{CanonicalColumn, CanonicalRecord};

const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%Y.%m.%d"];

/// Parse a usage date such as `2025/07/05` (also `-` or `.` separated).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a clock time such as `10:00` or `9:05`. Full-width colons are
/// accepted.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim().replace('：', ":");
    NaiveTime::parse_from_str(&s, "%H:%M").ok()
}

/// Parse an integer amount, ignoring thousands separators, currency
/// symbols and a trailing `円`. Blank input yields `None`.
pub fn parse_amount(s: &str) -> Option<u64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(['¥', '￥'])
        .trim_end_matches('円')
        .chars()
        .filter(|c| !matches!(c, ',' | '，' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Format an amount with thousands separators (`12345` → `12,345`).
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }

    formatted
}

/// Strip the honorific and any parenthesized reading from a recipient
/// field: `杉並 すけ様（すぎなみ すけ）` → `杉並 すけ`.
pub fn clean_person_name(field: &str) -> String {
    let head = field
        .split(['（', '('])
        .next()
        .unwrap_or("")
        .trim();
    head.trim_end_matches("さま")
        .replace('様', "")
        .trim()
        .to_string()
}

/// A canonical record with its date and times parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Subsidy-eligible amount; falls back to the paid amount when blank.
    pub eligible_amount: u64,
    pub paid_amount: u64,
    pub recipient: String,
}

/// Parse the fields aggregation needs. `row` is the 1-based data row
/// number used in error messages.
pub fn parse_record(row: usize, record: &CanonicalRecord) -> Result<ParsedRecord, ConvertError> {
    let malformed = |column: CanonicalColumn| ConvertError::MalformedInput {
        row,
        field: column.to_string(),
        value: record.get(column).to_string(),
    };

    let date = parse_date(record.get(CanonicalColumn::UsageDate))
        .ok_or_else(|| malformed(CanonicalColumn::UsageDate))?;
    let start = parse_time(record.get(CanonicalColumn::StartTime))
        .ok_or_else(|| malformed(CanonicalColumn::StartTime))?;
    let end = parse_time(record.get(CanonicalColumn::EndTime))
        .ok_or_else(|| malformed(CanonicalColumn::EndTime))?;

    let amount = |column: CanonicalColumn| -> Result<Option<u64>, ConvertError> {
        let raw = record.get(column);
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_amount(raw).map(Some).ok_or_else(|| malformed(column))
    };

    let paid_amount = amount(CanonicalColumn::TotalPaid)?.unwrap_or(0);
    let eligible_amount = amount(CanonicalColumn::EligibleAmount)?.unwrap_or(paid_amount);

    Ok(ParsedRecord {
        date,
        start,
        end,
        eligible_amount,
        paid_amount,
        recipient: record.get(CanonicalColumn::RecipientName).to_string(),
    })
}

/// Validate records before they are stored.
///
/// Usage date, provider and recipient are required; the date must be
/// `YYYY/MM/DD` and times, when present, `HH:MM`. Rows are numbered from 1.
pub fn validate_records(records: &[CanonicalRecord]) -> Result<(), ConvertError> {
    for (i, record) in records.iter().enumerate() {
        let row = i + 1;

        for column in [
            CanonicalColumn::UsageDate,
            CanonicalColumn::ProviderName,
            CanonicalColumn::RecipientName,
        ] {
            if record.get(column).trim().is_empty() {
                return Err(ConvertError::Invalid {
                    row,
                    reason: format!("{} is required", column),
                });
            }
        }

        let date = record.get(CanonicalColumn::UsageDate).trim();
        if NaiveDate::parse_from_str(date, "%Y/%m/%d").is_err() {
            return Err(ConvertError::Invalid {
                row,
                reason: format!("usage_date must be YYYY/MM/DD, got {:?}", date),
            });
        }

        for column in [CanonicalColumn::StartTime, CanonicalColumn::EndTime] {
            let value = record.get(column).trim();
            if !value.is_empty() && NaiveTime::parse_from_str(value, "%H:%M").is_err() {
                return Err(ConvertError::Invalid {
                    row,
                    reason: format!("{} must be HH:MM, got {:?}", column, value),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(date: &str, start: &str, end: &str) -> CanonicalRecord {
        CanonicalRecord::new()
            .with(CanonicalColumn::UsageDate, date)
            .with(CanonicalColumn::StartTime, start)
            .with(CanonicalColumn::EndTime, end)
            .with(CanonicalColumn::ProviderName, "山田 花子")
            .with(CanonicalColumn::RecipientName, "杉並 すけ様")
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12,000"), Some(12000));
        assert_eq!(parse_amount("¥1,234,567"), Some(1234567));
        assert_eq!(parse_amount("800円"), Some(800));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(12345678), "12,345,678");
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(parse_date("2025/07/05"), NaiveDate::from_ymd_opt(2025, 7, 5));
        assert_eq!(parse_date("2025-7-5"), NaiveDate::from_ymd_opt(2025, 7, 5));
        assert_eq!(parse_date("7/5"), None);
        assert_eq!(parse_time("9:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_time("10：30"), NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn test_clean_person_name() {
        assert_eq!(clean_person_name("杉並 すけ様"), "杉並 すけ");
        assert_eq!(clean_person_name("杉並 すけ 様（すぎなみ すけ）"), "杉並 すけ");
        assert_eq!(clean_person_name("杉並 すけ さま"), "杉並 すけ");
        assert_eq!(clean_person_name(""), "");
    }

    #[test]
    fn test_parse_record_eligible_fallback() {
        let r = record("2025/07/05", "10:00", "12:00").with(CanonicalColumn::TotalPaid, "6,000");
        let parsed = parse_record(1, &r).unwrap();
        assert_eq!(parsed.paid_amount, 6000);
        assert_eq!(parsed.eligible_amount, 6000);

        let r = r.with(CanonicalColumn::EligibleAmount, "5,000");
        assert_eq!(parse_record(1, &r).unwrap().eligible_amount, 5000);
    }

    #[test]
    fn test_parse_record_malformed() {
        let r = record("2025/07/05", "10:00", "").with(CanonicalColumn::TotalPaid, "1,000");
        assert_eq!(
            parse_record(4, &r),
            Err(ConvertError::MalformedInput {
                row: 4,
                field: "end_time".into(),
                value: String::new(),
            })
        );

        let r = record("2025/07/05", "10:00", "11:00").with(CanonicalColumn::TotalPaid, "n/a");
        assert!(matches!(
            parse_record(1, &r),
            Err(ConvertError::MalformedInput { field, .. }) if field == "total_paid"
        ));
    }

    #[test]
    fn test_validate_records() {
        let ok = vec![record("2025/07/05", "10:00", "12:00"), record("2025/07/06", "", "")];
        assert!(validate_records(&ok).is_ok());

        let bad_date = vec![record("2025-07-05", "10:00", "12:00")];
        assert!(matches!(
            validate_records(&bad_date),
            Err(ConvertError::Invalid { row: 1, .. })
        ));

        let missing = vec![
            record("2025/07/05", "10:00", "12:00"),
            record("2025/07/06", "10:00", "12:00").with(CanonicalColumn::ProviderName, ""),
        ];
        assert_eq!(
            validate_records(&missing),
            Err(ConvertError::Invalid {
                row: 2,
                reason: "provider_name is required".into()
            })
        );

        let bad_time = vec![record("2025/07/05", "1000", "12:00")];
        assert!(validate_records(&bad_time).is_err());
    }
}
