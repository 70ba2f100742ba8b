//! Monthly aggregation and subsidy calculation.

mod aggregate;
mod builder;
mod subsidy;

pub use aggregate::{BucketEntry, MonthlyBuckets};
pub use builder::ReportBuilder;
pub use subsidy::{SubsidyCalculator, Totals};
