//! Receipt path: classify free-text documents and extract single-session
//! receipts.

mod classifier;
mod parser;
pub mod patterns;

pub use classifier::{DocumentFormat, FormatClassifier};
pub use parser::{ReceiptExtraction, ReceiptExtractor, ReceiptFields};
