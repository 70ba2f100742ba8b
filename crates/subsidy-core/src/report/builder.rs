//! Assembling the claim report from monthly buckets.

use chrono::Datelike;
use tracing::{debug, info};

use super::aggregate::{BucketEntry, MonthlyBuckets};
use super::subsidy::{SubsidyCalculator, Totals};
use crate::error::ConvertError;
use crate::models::config::{RateConfig, ReportConfig};
use crate::models::record::CanonicalRecord;
use crate::models::report::{
    ConversionResult, GrandTotal, MonthTable, Page1, Page2, Report, UsageEntry,
};
use crate::records::{clean_person_name, format_amount};
use crate::usage::NightWindow;
use crate::usage::format::{day_night_ranges, duration_string, duration_string_always};

/// Builds [`Report`]s from canonical records.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    window: NightWindow,
    calculator: SubsidyCalculator,
    config: ReportConfig,
}

impl ReportBuilder {
    pub fn new(rates: &RateConfig, config: &ReportConfig) -> Self {
        Self {
            window: NightWindow::from_rates(rates),
            calculator: SubsidyCalculator::new(rates),
            config: config.clone(),
        }
    }

    fn usage_entry(&self, entry: &BucketEntry) -> UsageEntry {
        let (day_time, night_time) = day_night_ranges(&self.window, entry.start, entry.end);
        UsageEntry {
            date: entry.date.day().to_string(),
            day_time,
            day_duration: duration_string(entry.split.day_minutes),
            night_time,
            night_duration: duration_string(entry.split.night_minutes),
            amount: format_amount(entry.eligible_amount),
            subsidy_amount: entry.eligible_amount,
            paid_amount: entry.paid_amount,
            day_minutes: entry.split.day_minutes,
            night_minutes: entry.split.night_minutes,
        }
    }

    fn month_table(&self, entries: &[BucketEntry]) -> MonthTable {
        let totals = Totals::from_entries(entries);
        MonthTable {
            rows: entries.iter().map(|e| self.usage_entry(e)).collect(),
            day_total_time: duration_string_always(totals.split.day_minutes),
            night_total_time: duration_string(totals.split.night_minutes),
            total_amount: format_amount(totals.eligible_amount),
            day_hours: totals.day_hours().to_string(),
            night_hours: totals.night_hours().to_string(),
            subsidy_amount: format_amount(self.calculator.subsidy(&totals)),
            request_amount: format_amount(self.calculator.request(&totals)),
            usage_hours: totals.usage_hours().to_string(),
        }
    }

    fn grand_total(&self, totals: &Totals) -> GrandTotal {
        GrandTotal {
            total_day_hours: totals.day_hours().to_string(),
            total_night_hours: totals.night_hours().to_string(),
            total_subsidy_amount: format_amount(self.calculator.subsidy(totals)),
            total_request_amount: format_amount(self.calculator.request(totals)),
            total_usage_hours: totals.usage_hours().to_string(),
        }
    }

    fn page1(&self, first: &[BucketEntry], grand: &Totals) -> Page1 {
        let month = self.month_table(first);
        Page1 {
            rows: month.rows,
            day_total_time: month.day_total_time,
            night_total_time: month.night_total_time,
            total_amount: month.total_amount,
            day_hours: grand.day_hours().to_string(),
            night_hours: grand.night_hours().to_string(),
            subsidy_amount: format_amount(self.calculator.subsidy(grand)),
            request_amount: format_amount(self.calculator.request(grand)),
            usage_hours: grand.usage_hours().to_string(),
            grand_total_day_time: duration_string_always(grand.split.day_minutes),
            grand_total_night_time: duration_string(grand.split.night_minutes),
            grand_total_amount: format_amount(grand.eligible_amount),
        }
    }

    /// Build a report from already-grouped buckets.
    pub fn build_from_buckets(&self, buckets: MonthlyBuckets) -> Result<ConversionResult, ConvertError> {
        let mut months = buckets.iter();
        let Some((first_month, first_entries)) = months.next() else {
            return Err(ConvertError::EmptyResult);
        };

        let grand = Totals::from_entries(buckets.entries());
        let page1 = self.page1(first_entries, &grand);

        let rest: Vec<(u32, MonthTable)> = months
            .map(|(month, entries)| (month, self.month_table(entries)))
            .collect();
        let page2 = (!rest.is_empty()).then(|| Page2 {
            grand_total: self.grand_total(&grand),
            months: rest,
        });

        let calendar_year = first_entries.first().map(|e| e.date.year()).unwrap_or_default();
        let child_name = buckets
            .first_recipient
            .as_deref()
            .map(clean_person_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.config.default_child_name.clone());

        debug!(
            "Report spans {} month(s), {} day / {} night minutes",
            buckets.len(),
            grand.split.day_minutes,
            grand.split.night_minutes
        );
        info!(
            "Built report for month {} ({} skipped rows), request {}",
            first_month,
            buckets.skipped.len(),
            page1.request_amount
        );

        Ok(ConversionResult {
            report: Report {
                year: (calendar_year - self.config.era_offset).to_string(),
                applicant_name: self.config.applicant_name.clone(),
                child_name,
                month: first_month.to_string(),
                page1,
                page2,
            },
            skipped: buckets.skipped,
        })
    }

    /// Group `records` by month and build the report.
    ///
    /// Malformed rows are skipped and reported; an input with no usable
    /// rows is [`ConvertError::EmptyResult`].
    pub fn build(&self, records: &[CanonicalRecord]) -> Result<ConversionResult, ConvertError> {
        let buckets = MonthlyBuckets::from_records(records, &self.window);
        self.build_from_buckets(buckets)
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(&RateConfig::default(), &ReportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::CanonicalColumn;
    use pretty_assertions::assert_eq;

    fn record(date: &str, start: &str, end: &str, eligible: &str, paid: &str) -> CanonicalRecord {
        CanonicalRecord::new()
            .with(CanonicalColumn::UsageDate, date)
            .with(CanonicalColumn::StartTime, start)
            .with(CanonicalColumn::EndTime, end)
            .with(CanonicalColumn::ProviderName, "山田 花子")
            .with(CanonicalColumn::RecipientName, "杉並 すけ 様")
            .with(CanonicalColumn::TotalPaid, paid)
            .with(CanonicalColumn::EligibleAmount, eligible)
    }

    #[test]
    fn test_single_month_report() {
        let records = vec![record("2025/07/05", "10:00", "12:10", "6,500", "6,500")];
        let result = ReportBuilder::default().build(&records).unwrap();
        let report = result.report;

        assert_eq!(report.year, "7");
        assert_eq!(report.month, "7");
        assert_eq!(report.child_name, "杉並 すけ");
        assert!(report.page2.is_none());

        let p1 = &report.page1;
        assert_eq!(p1.rows.len(), 1);
        assert_eq!(p1.rows[0].date, "5");
        assert_eq!(p1.rows[0].day_time, "10:00 ～ 12:10");
        assert_eq!(p1.rows[0].day_duration, "2時間10分");
        assert_eq!(p1.rows[0].night_time, "");
        assert_eq!(p1.rows[0].amount, "6,500");
        assert_eq!(p1.day_total_time, "2時間10分");
        assert_eq!(p1.night_total_time, "");
        assert_eq!(p1.day_hours, "2");
        assert_eq!(p1.subsidy_amount, "5,000");
        assert_eq!(p1.request_amount, "5,000");
        assert_eq!(p1.usage_hours, "2");
    }

    #[test]
    fn test_request_capped_by_paid() {
        // 4 day hours -> 10,000 subsidy, only 7,000 paid
        let records = vec![record("2025/07/05", "09:00", "13:00", "7,000", "7,000")];
        let result = ReportBuilder::default().build(&records).unwrap();
        assert_eq!(result.report.page1.subsidy_amount, "10,000");
        assert_eq!(result.report.page1.request_amount, "7,000");
    }

    #[test]
    fn test_two_months() {
        let records = vec![
            record("2025/08/02", "20:00", "23:00", "9,000", "9,000"),
            record("2025/07/05", "10:00", "12:00", "6,000", "6,000"),
        ];
        let result = ReportBuilder::default().build(&records).unwrap();
        let report = result.report;

        assert_eq!(report.month, "7");
        let p1 = &report.page1;
        // First-month detail.
        assert_eq!(p1.rows.len(), 1);
        assert_eq!(p1.total_amount, "6,000");
        // Claim totals: 4h day, 1h night.
        assert_eq!(p1.day_hours, "4");
        assert_eq!(p1.night_hours, "1");
        assert_eq!(p1.subsidy_amount, "13,500");
        assert_eq!(p1.request_amount, "13,500");
        assert_eq!(p1.grand_total_day_time, "4時間00分");
        assert_eq!(p1.grand_total_night_time, "1時間00分");
        assert_eq!(p1.grand_total_amount, "15,000");

        let page2 = report.page2.unwrap();
        assert_eq!(page2.months.len(), 1);
        let (month, table) = &page2.months[0];
        assert_eq!(*month, 8);
        assert_eq!(table.rows[0].day_time, "20:00 ～ 22:00");
        assert_eq!(table.rows[0].night_time, "22:00 ～ 23:00");
        assert_eq!(table.subsidy_amount, "8,500");
        assert_eq!(page2.grand_total.total_subsidy_amount, "13,500");
        assert_eq!(page2.grand_total.total_usage_hours, "5");
    }

    #[test]
    fn test_skipped_rows_reported() {
        let records = vec![
            record("2025/07/05", "10:00", "11:00", "3,000", "3,000"),
            record("2025/13/01", "10:00", "11:00", "3,000", "3,000"),
        ];
        let result = ReportBuilder::default().build(&records).unwrap();
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].row, 2);
    }

    #[test]
    fn test_empty_result() {
        let records = vec![record("bad", "10:00", "11:00", "0", "0")];
        let err = ReportBuilder::default().build(&records).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyResult));
        assert!(matches!(
            ReportBuilder::default().build(&[]),
            Err(ConvertError::EmptyResult)
        ));
    }

    #[test]
    fn test_default_child_name() {
        let records = vec![CanonicalRecord::new()
            .with(CanonicalColumn::UsageDate, "2025/07/05")
            .with(CanonicalColumn::StartTime, "10:00")
            .with(CanonicalColumn::EndTime, "11:00")
            .with(CanonicalColumn::RecipientName, "様")
            .with(CanonicalColumn::TotalPaid, "3,000")];
        let report = ReportBuilder::default().build(&records).unwrap().report;
        assert_eq!(report.child_name, ReportConfig::default().default_child_name);
    }
}
