pub(crate) mod assemble;
mod document;

pub use assemble::PageAccumulator;
pub use document::PdfDocument;
