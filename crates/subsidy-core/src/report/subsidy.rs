//! Subsidy formula and request cap.

use crate::models::config::RateConfig;
use crate::usage::DurationSplit;

use super::aggregate::BucketEntry;

/// Summed minutes and amounts for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub split: DurationSplit,
    pub eligible_amount: u64,
    pub paid_amount: u64,
}

impl Totals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a BucketEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, e| {
            acc.split = acc.split + e.split;
            acc.eligible_amount = acc.eligible_amount.saturating_add(e.eligible_amount);
            acc.paid_amount = acc.paid_amount.saturating_add(e.paid_amount);
            acc
        })
    }

    /// Whole daytime hours; remainder minutes are dropped.
    pub fn day_hours(&self) -> u64 {
        u64::from(self.split.day_minutes / 60)
    }

    /// Whole night hours; remainder minutes are dropped.
    pub fn night_hours(&self) -> u64 {
        u64::from(self.split.night_minutes / 60)
    }

    /// Compensated hours: whole day hours plus whole night hours.
    pub fn usage_hours(&self) -> u64 {
        self.day_hours().saturating_add(self.night_hours())
    }
}

/// Applies fixed hourly rates and the request cap.
#[derive(Debug, Clone, Copy)]
pub struct SubsidyCalculator {
    day_rate: u64,
    night_rate: u64,
}

impl SubsidyCalculator {
    pub fn new(rates: &RateConfig) -> Self {
        Self {
            day_rate: rates.day_rate,
            night_rate: rates.night_rate,
        }
    }

    /// `floor(day/60) * day_rate + floor(night/60) * night_rate`.
    pub fn subsidy(&self, totals: &Totals) -> u64 {
        let day = totals.day_hours().saturating_mul(self.day_rate);
        let night = totals.night_hours().saturating_mul(self.night_rate);
        day.saturating_add(night)
    }

    /// The lesser of the computed subsidy and the amount actually paid.
    pub fn request(&self, totals: &Totals) -> u64 {
        self.subsidy(totals).min(totals.paid_amount)
    }
}

impl Default for SubsidyCalculator {
    fn default() -> Self {
        Self::new(&RateConfig::default())
    }
}
