//! Grouping canonical records into monthly buckets.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::models::record::CanonicalRecord;
use crate::models::report::RowIssue;
use crate::records::parse_record;
use crate::usage::{DurationSplit, NightWindow};

/// One usable record inside a monthly bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub split: DurationSplit,
    pub eligible_amount: u64,
    pub paid_amount: u64,
}

/// Records grouped by month number (1-12).
///
/// Entries keep record order within a bucket.
#[derive(Debug, Clone, Default)]
pub struct MonthlyBuckets {
    buckets: BTreeMap<u32, Vec<BucketEntry>>,
    /// Recipient of the first usable record.
    pub first_recipient: Option<String>,
    /// Rows that could not be used.
    pub skipped: Vec<RowIssue>,
}

impl MonthlyBuckets {
    /// Group records by month, splitting each span with `window`.
    ///
    /// Blank records are ignored; malformed ones are skipped and listed in
    /// [`MonthlyBuckets::skipped`].
    pub fn from_records(records: &[CanonicalRecord], window: &NightWindow) -> Self {
        let mut result = Self::default();

        for (i, record) in records.iter().enumerate() {
            let row = i + 1;
            if record.is_empty() {
                continue;
            }

            let parsed = match parse_record(row, record) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Skipping row: {}", e);
                    result.skipped.push(RowIssue {
                        row,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if result.first_recipient.is_none() && !parsed.recipient.trim().is_empty() {
                result.first_recipient = Some(parsed.recipient.clone());
            }

            let entry = BucketEntry {
                date: parsed.date,
                start: parsed.start,
                end: parsed.end,
                split: window.split(parsed.start, parsed.end),
                eligible_amount: parsed.eligible_amount,
                paid_amount: parsed.paid_amount,
            };
            debug!("Row {} -> month {} {:?}", row, entry.date.month(), entry.split);
            result.buckets.entry(parsed.date.month()).or_default().push(entry);
        }

        result
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Month numbers in ascending order.
    pub fn months(&self) -> Vec<u32> {
        self.buckets.keys().copied().collect()
    }

    pub fn get(&self, month: u32) -> Option<&[BucketEntry]> {
        self.buckets.get(&month).map(Vec::as_slice)
    }

    /// Buckets in ascending month order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[BucketEntry])> {
        self.buckets.iter().map(|(m, e)| (*m, e.as_slice()))
    }

    /// Every entry across all months.
    pub fn entries(&self) -> impl Iterator<Item = &BucketEntry> {
        self.buckets.values().flatten()
    }
}
