//! Table path: locate the usage table on a page and map it to the
//! canonical schema.

mod columns;
mod locator;

pub use columns::{ColumnMapping, HeaderMapper};
pub use locator::{MarkerLocation, TableLocator, TrimmedTable};
