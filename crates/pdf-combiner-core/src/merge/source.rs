use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::Result;
use crate::pdf::PdfDocument;

/// Something the merge engine can read a document from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A file on disk, named after its file name
    Path(PathBuf),
    /// An in-memory upload
    Memory { name: String, bytes: Bytes },
}

impl DocumentSource {
    pub fn memory(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Name used for ordering and for matching explicit merge orders.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            Self::Memory { name, .. } => name.clone(),
        }
    }

    /// Why this source cannot take part in a merge, if it cannot.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Path(path) if !path.is_file() => Some(SkipReason::NotFound),
            Self::Path(path) if !has_pdf_extension(path) => Some(SkipReason::NotPdf),
            Self::Memory { name, .. } if !has_pdf_extension(Path::new(name)) => {
                Some(SkipReason::NotPdf)
            }
            _ => None,
        }
    }

    /// Read and parse the document.
    pub fn load(&self) -> Result<PdfDocument> {
        match self {
            Self::Path(path) => PdfDocument::from_file(path),
            Self::Memory { name, bytes } => PdfDocument::from_bytes(name.clone(), bytes),
        }
    }
}

/// Whether `path` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Why an entry of the merge order was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Named in the order but absent from the sources, or not a file
    NotFound,
    /// Present but not a PDF
    NotPdf,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::NotPdf => write!(f, "not a PDF"),
        }
    }
}

/// A merge order entry that was skipped. Not fatal; the merge carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.reason)
    }
}
