//! Splitting usage spans into day and night minutes.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::models::config::RateConfig;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Day and night minutes of one span. Always sums to the span length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationSplit {
    pub day_minutes: u32,
    pub night_minutes: u32,
}

impl DurationSplit {
    pub fn total(&self) -> u32 {
        self.day_minutes.saturating_add(self.night_minutes)
    }
}

impl std::ops::Add for DurationSplit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            day_minutes: self.day_minutes.saturating_add(rhs.day_minutes),
            night_minutes: self.night_minutes.saturating_add(rhs.night_minutes),
        }
    }
}

impl std::iter::Sum for DurationSplit {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc + s)
    }
}

/// A contiguous piece of a span, in minutes from the span's start day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: u32,
    pub to: u32,
    pub night: bool,
}

/// The night window, e.g. `[22:00, 06:00)`, wrapping past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    /// Minute of day at which night starts.
    start: u32,
    /// Minute of day at which night ends (next morning).
    end: u32,
}

impl NightWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start: start_hour * 60,
            end: end_hour * 60,
        }
    }

    pub fn from_rates(rates: &RateConfig) -> Self {
        Self::new(rates.night_start_hour, rates.night_end_hour)
    }

    /// True when the minute of day falls in the night window.
    pub fn is_night_minute(&self, minute_of_day: u32) -> bool {
        let m = minute_of_day % MINUTES_PER_DAY;
        m >= self.start || m < self.end
    }

    /// Span bounds in minutes. An end at or before the start is taken on
    /// the following day; equal times give an empty span.
    fn bounds(start: NaiveTime, end: NaiveTime) -> (u32, u32) {
        let s = start.hour() * 60 + start.minute();
        let mut e = end.hour() * 60 + end.minute();
        if e < s {
            e += MINUTES_PER_DAY;
        }
        (s, e)
    }

    /// Day windows covering the two calendar days a span can touch.
    fn day_windows(&self) -> [(u32, u32); 2] {
        [
            (self.end, self.start),
            (self.end + MINUTES_PER_DAY, self.start + MINUTES_PER_DAY),
        ]
    }

    /// Split a span into day and night minutes by interval intersection.
    pub fn split(&self, start: NaiveTime, end: NaiveTime) -> DurationSplit {
        let (s, e) = Self::bounds(start, end);
        let day_minutes: u32 = self
            .day_windows()
            .iter()
            .map(|&(ws, we)| overlap(s, e, ws, we))
            .sum();

        DurationSplit {
            day_minutes,
            night_minutes: (e - s) - day_minutes,
        }
    }

    /// Contiguous day and night pieces of a span, in order.
    pub fn segments(&self, start: NaiveTime, end: NaiveTime) -> Vec<Segment> {
        let (s, e) = Self::bounds(start, end);
        let mut cuts: Vec<u32> = self
            .day_windows()
            .iter()
            .flat_map(|&(ws, we)| [ws, we])
            .filter(|&c| c > s && c < e)
            .collect();
        cuts.sort_unstable();

        let mut segments = Vec::new();
        let mut from = s;
        for to in cuts.into_iter().chain(std::iter::once(e)) {
            if to > from {
                segments.push(Segment {
                    from,
                    to,
                    night: self.is_night_minute(from),
                });
            }
            from = to;
        }
        segments
    }
}

impl Default for NightWindow {
    fn default() -> Self {
        Self::from_rates(&RateConfig::default())
    }
}

fn overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> u32 {
    a_end.min(b_end).saturating_sub(a_start.max(b_start))
}
