//! PDF processing module.

mod extractor;
mod layout;

pub use extractor::{PdfContent, PdfExtractor, PdfPage};
pub use layout::grid_from_text;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;
}
