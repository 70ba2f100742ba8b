//! Error types for the subsidy-core library.

use std::fmt;

use thiserror::Error;

/// Main error type for the subsidy library.
#[derive(Error, Debug)]
pub enum SubsidyError {
    /// Table location or trimming error.
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Receipt field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Conversion or aggregation error.
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SubsidyError {
    /// User-facing category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubsidyError::Table(TableError::NotFound { .. }) => ErrorKind::NotFound,
            SubsidyError::Table(_) => ErrorKind::ValidationFailed,
            SubsidyError::Extraction(_) => ErrorKind::ExtractionFailed,
            SubsidyError::Convert(ConvertError::FormatMismatch { .. }) => ErrorKind::FormatMismatch,
            SubsidyError::Convert(ConvertError::MalformedInput { .. }) => ErrorKind::MalformedInput,
            SubsidyError::Convert(ConvertError::EmptyResult) => ErrorKind::EmptyResult,
            SubsidyError::Convert(ConvertError::Invalid { .. }) => ErrorKind::ValidationFailed,
            SubsidyError::Pdf(_) => ErrorKind::ExtractionFailed,
            SubsidyError::Io(_) | SubsidyError::Json(_) => ErrorKind::Io,
            SubsidyError::Config(_) => ErrorKind::ValidationFailed,
        }
    }
}

/// Coarse error categories reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    ExtractionFailed,
    FormatMismatch,
    MalformedInput,
    EmptyResult,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::ExtractionFailed => "extraction_failed",
            ErrorKind::FormatMismatch => "format_mismatch",
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::EmptyResult => "empty_result",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

/// Errors raised while locating and trimming the usage table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// No cell on the page contains a usage-date marker.
    #[error("table not found: no usage-date header in {tables_scanned} table(s)")]
    NotFound { tables_scanned: usize },

    /// Trimming removed every row.
    #[error("trim failed: no rows left after trimming")]
    TrimFailed,

    /// The trimmed table does not start with a usage-date header.
    #[error("header validation failed: first cell is {first_cell:?}")]
    HeaderValidation { first_cell: String },
}

/// Errors related to receipt field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// More than one distinct value was found for a field.
    #[error("ambiguous {field}: {candidates:?}")]
    Ambiguous {
        field: String,
        candidates: Vec<String>,
    },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Errors raised while converting canonical records into a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The document is not of the kind the operation expects.
    #[error("document is a {found}, expected a {expected}")]
    FormatMismatch { expected: String, found: String },

    /// A row carries an unparseable value.
    #[error("row {row}: malformed {field}: {value:?}")]
    MalformedInput {
        row: usize,
        field: String,
        value: String,
    },

    /// A row fails record validation.
    #[error("row {row}: {reason}")]
    Invalid { row: usize, reason: String },

    /// Nothing remained after filtering.
    #[error("no usable rows")]
    EmptyResult,
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the subsidy library.
pub type Result<T> = std::result::Result<T, SubsidyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err: SubsidyError = TableError::NotFound { tables_scanned: 2 }.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: SubsidyError = TableError::TrimFailed.into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let err: SubsidyError = ExtractionError::MissingField("date".into()).into();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailed);

        let err: SubsidyError = ConvertError::EmptyResult.into();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ConvertError::MalformedInput {
            row: 3,
            field: "start_time".into(),
            value: "25:00".into(),
        };
        assert_eq!(err.to_string(), "row 3: malformed start_time: \"25:00\"");
    }
}
