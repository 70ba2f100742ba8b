//! Usage durations: day/night splitting and form strings.

mod duration;
pub mod format;

pub use duration::{DurationSplit, NightWindow, Segment};
