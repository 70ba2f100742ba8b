//! Subsidy claim report models.
//!
//! Field names serialize in the camelCase layout the claim form expects.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A complete monthly subsidy report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Era year of the first reported month.
    pub year: String,

    /// Applicant name.
    pub applicant_name: String,

    /// Child name.
    pub child_name: String,

    /// First reported month (1-12).
    pub month: String,

    /// First page: earliest month plus claim totals.
    pub page1: Page1,

    /// Second page: remaining months, present only when there are any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page2: Option<Page2>,
}

/// One usage session as it appears in a month table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    /// Day of month.
    pub date: String,

    /// Daytime range, e.g. `"10:00 ～ 15:30"`.
    pub day_time: String,

    /// Daytime duration, e.g. `"5時間30分"`.
    pub day_duration: String,

    /// Night range.
    pub night_time: String,

    /// Night duration.
    pub night_duration: String,

    /// Subsidy-eligible amount, thousands-separated.
    pub amount: String,

    #[serde(rename = "subsidy_amount")]
    pub subsidy_amount: u64,

    #[serde(rename = "paid_amount")]
    pub paid_amount: u64,

    #[serde(rename = "day_minutes")]
    pub day_minutes: u32,

    #[serde(rename = "night_minutes")]
    pub night_minutes: u32,
}

/// Totals and entries for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTable {
    pub rows: Vec<UsageEntry>,
    pub day_total_time: String,
    pub night_total_time: String,
    pub total_amount: String,
    pub day_hours: String,
    pub night_hours: String,
    pub subsidy_amount: String,
    pub request_amount: String,
    pub usage_hours: String,
}

/// First page of the report.
///
/// `rows` and the `*TotalTime`/`totalAmount` fields describe the first
/// month; the hour, subsidy and request fields carry the claim totals over
/// every month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page1 {
    pub rows: Vec<UsageEntry>,
    pub day_total_time: String,
    pub night_total_time: String,
    pub total_amount: String,
    pub day_hours: String,
    pub night_hours: String,
    pub subsidy_amount: String,
    pub request_amount: String,
    pub usage_hours: String,
    pub grand_total_day_time: String,
    pub grand_total_night_time: String,
    pub grand_total_amount: String,
}

/// Grand total across every month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotal {
    pub total_day_hours: String,
    pub total_night_hours: String,
    pub total_subsidy_amount: String,
    pub total_request_amount: String,
    pub total_usage_hours: String,
}

/// Second page of the report.
///
/// Serializes as `{grandTotal, month1, table1, month2, table2, ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page2 {
    pub grand_total: GrandTotal,
    /// Remaining months in ascending order with their tables.
    pub months: Vec<(u32, MonthTable)>,
}

impl Serialize for Page2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.months.len() * 2))?;
        map.serialize_entry("grandTotal", &self.grand_total)?;
        for (i, (month, table)) in self.months.iter().enumerate() {
            map.serialize_entry(&format!("month{}", i + 1), &month.to_string())?;
            map.serialize_entry(&format!("table{}", i + 1), table)?;
        }
        map.end()
    }
}

/// A row skipped during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based data row number.
    pub row: usize,
    pub reason: String,
}

/// A report together with the rows that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub report: Report,
    pub skipped: Vec<RowIssue>,
}
