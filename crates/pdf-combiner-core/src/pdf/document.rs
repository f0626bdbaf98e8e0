use std::path::Path;

use lopdf::Document;

use crate::error::{Error, Result};

/// A parsed source document, ready to have its pages appended to a
/// [`super::PageAccumulator`].
pub struct PdfDocument {
    /// Display name (file name or upload name), used in errors and logs
    name: String,
    /// Parsed object graph
    inner: Document,
    /// Number of pages
    page_count: usize,
    /// Size of the encoded input
    byte_len: usize,
}

impl PdfDocument {
    /// Open a PDF from bytes
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();

        let inner = Document::load_mem(bytes).map_err(|e| Error::PdfOpen {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        let page_count = inner.get_pages().len();

        Ok(Self {
            name,
            inner,
            page_count,
            byte_len: bytes.len(),
        })
    }

    /// Open a PDF from a file path, named after its file name
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let bytes = std::fs::read(path).map_err(|e| Error::PdfOpen {
            name: name.clone(),
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_bytes(name, &bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get number of pages
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size of the encoded input in bytes
    pub const fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub(crate) fn into_inner(self) -> Document {
        self.inner
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("name", &self.name)
            .field("page_count", &self.page_count)
            .field("bytes_len", &self.byte_len)
            .finish()
    }
}
