//! Human-readable duration and time-range strings for the claim form.

use chrono::NaiveTime;

use super::duration::NightWindow;

/// Separator between the two ends of a time range.
pub const RANGE_SEPARATOR: &str = " ～ ";

/// `150` → `"2時間30分"`. Zero minutes render as an empty string.
pub fn duration_string(minutes: u32) -> String {
    if minutes == 0 {
        return String::new();
    }
    format!("{}時間{:02}分", minutes / 60, minutes % 60)
}

/// Like [`duration_string`] but renders zero as `"0時間00分"`.
pub fn duration_string_always(minutes: u32) -> String {
    format!("{}時間{:02}分", minutes / 60, minutes % 60)
}

fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", (minute / 60) % 24, minute % 60)
}

/// `"HH:MM ～ HH:MM"` for a span given in minutes.
pub fn time_range(from: u32, to: u32) -> String {
    format!("{}{}{}", clock(from), RANGE_SEPARATOR, clock(to))
}

/// Day and night range strings of a span. A side with several disjoint
/// pieces lists them joined by `", "`; a side with none is empty.
pub fn day_night_ranges(window: &NightWindow, start: NaiveTime, end: NaiveTime) -> (String, String) {
    let mut day = Vec::new();
    let mut night = Vec::new();

    for segment in window.segments(start, end) {
        let range = time_range(segment.from, segment.to);
        if segment.night {
            night.push(range);
        } else {
            day.push(range);
        }
    }

    (day.join(", "), night.join(", "))
}
