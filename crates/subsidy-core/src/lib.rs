//! Core library for babysitter subsidy claims.
//!
//! This crate provides:
//! - Table location and header mapping for invoice-style usage tables
//! - Document format classification and receipt field extraction
//! - Day/night duration splitting
//! - Monthly aggregation and subsidy calculation
//! - PDF text extraction (feature `pdf`)
//!
//! Both the table path and the receipt path produce [`CanonicalRecord`]s,
//! which [`Converter::build_report`] turns into a claim [`Report`].

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod receipt;
pub mod records;
pub mod report;
pub mod table;
pub mod usage;

pub use error::{ConvertError, ErrorKind, ExtractionError, Result, SubsidyError, TableError};
pub use models::config::EngineConfig;
pub use models::grid::{PageGrid, Table};
pub use models::record::{CanonicalColumn, CanonicalRecord, CanonicalTable, COLUMN_COUNT};
pub use models::report::{ConversionResult, Report, RowIssue};
pub use receipt::{DocumentFormat, FormatClassifier, ReceiptExtraction, ReceiptExtractor};
pub use report::ReportBuilder;
pub use table::{HeaderMapper, TableLocator};
pub use usage::{DurationSplit, NightWindow};

use tracing::{debug, info};

/// The conversion engine.
///
/// Holds an [`EngineConfig`] and the components built from it. Every call
/// is independent; the converter keeps no state between documents.
#[derive(Debug, Clone)]
pub struct Converter {
    config: EngineConfig,
    locator: TableLocator,
    mapper: HeaderMapper,
    classifier: FormatClassifier,
    receipts: ReceiptExtractor,
    reports: ReportBuilder,
}

impl Converter {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            locator: TableLocator::new(&config.locator),
            mapper: HeaderMapper::new(&config.schema),
            classifier: FormatClassifier::new(&config.classifier),
            receipts: ReceiptExtractor::new(),
            reports: ReportBuilder::new(&config.rates, &config.report),
            config,
        }
    }

    /// Year assumed for receipts that print none.
    pub fn with_fallback_year(mut self, year: i32) -> Self {
        self.receipts = self.receipts.with_fallback_year(year);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Locate the usage table in a page grid and project it into the
    /// canonical schema.
    pub fn extract_table(&self, grid: &PageGrid) -> Result<CanonicalTable> {
        let trimmed = self.locator.extract(grid)?;
        let table = self.mapper.project(trimmed.header(), trimmed.data_rows());
        info!("Extracted {} canonical rows", table.rows.len());
        Ok(table)
    }

    /// Project an arbitrary header and rows (e.g. a stored CSV) into the
    /// canonical schema.
    pub fn canonicalize<S: AsRef<str>>(&self, header: &[S], rows: &[Vec<S>]) -> CanonicalTable {
        self.mapper.project(header, rows)
    }

    pub fn classify(&self, text: &str) -> DocumentFormat {
        self.classifier.classify(text)
    }

    /// Extract a receipt, rejecting text that does not classify as one.
    pub fn extract_receipt(&self, text: &str) -> Result<ReceiptExtraction> {
        let format = self.classify(text);
        if format != DocumentFormat::Receipt {
            return Err(ConvertError::FormatMismatch {
                expected: DocumentFormat::Receipt.to_string(),
                found: format.to_string(),
            }
            .into());
        }
        Ok(self.receipts.extract(text)?)
    }

    /// Aggregate canonical records into a claim report.
    pub fn build_report(&self, records: &[CanonicalRecord]) -> Result<ConversionResult> {
        debug!("Building report from {} records", records.len());
        Ok(self.reports.build(records)?)
    }

    /// Text of a PDF document, pages separated by blank lines.
    #[cfg(feature = "pdf")]
    pub fn pdf_text(&self, data: &[u8]) -> Result<String> {
        Ok(pdf::PdfExtractor::open(data)?.text)
    }

    /// Extract the usage table from a PDF without a supplied grid.
    #[cfg(feature = "pdf")]
    pub fn extract_pdf_table(&self, data: &[u8]) -> Result<CanonicalTable> {
        let content = pdf::PdfExtractor::open(data)?;
        self.first_page_table(&content)
    }

    /// The usage table is read from the first page's layout only.
    #[cfg(feature = "pdf")]
    fn first_page_table(&self, content: &pdf::PdfContent) -> Result<CanonicalTable> {
        let page = content.pages.first().ok_or(error::PdfError::NoPages)?;
        debug!("Reading usage table from page {}", page.number);
        self.extract_table(&pdf::grid_from_text(&page.text))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
