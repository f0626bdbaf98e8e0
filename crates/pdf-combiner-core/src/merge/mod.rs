//! The merge engine: resolve an order, append every page of every source,
//! serialize once.

mod order;
mod source;

pub use order::{ResolvedOrder, resolve_order};
pub use source::{DocumentSource, SkipReason, SkippedEntry, has_pdf_extension};

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::config::MergeOptions;
use crate::error::{Error, Result};
use crate::pdf::PageAccumulator;

/// Progress callback, called with (sources done, sources total).
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Output of a successful combine.
#[derive(Debug, Clone)]
pub struct CombinedDocument {
    /// The encoded PDF
    pub bytes: Bytes,
    /// Pages in the output
    pub page_count: usize,
    /// Sources whose pages were appended
    pub files_merged: usize,
    /// Order entries left out
    pub skipped: Vec<SkippedEntry>,
}

/// Merge engine with its output options.
#[derive(Default)]
pub struct Combiner {
    options: MergeOptions,
    progress: Option<ProgressCallback>,
}

impl Combiner {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    /// Report progress after each source
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Combine `sources` in `order` (or alphabetically when `order` is empty).
    ///
    /// Missing and non-PDF entries are skipped. A source that fails to parse
    /// aborts the whole combine; so does ending up with no pages.
    pub fn combine(&self, sources: &[DocumentSource], order: &[String]) -> Result<CombinedDocument> {
        let resolved = resolve_order(sources, order);
        self.combine_resolved(resolved)
    }

    /// Combine PDFs from `folder`.
    ///
    /// With an empty `order`, every `*.pdf` file in the folder is used in
    /// case-insensitive name order. Otherwise each name is taken as a path
    /// relative to `folder`, in the given order.
    pub fn combine_folder(&self, folder: &Path, order: &[String]) -> Result<CombinedDocument> {
        let input_folder_error = |e: std::io::Error| Error::InputFolder {
            path: folder.to_path_buf(),
            reason: e.to_string(),
        };

        if order.is_empty() {
            let mut sources = Vec::new();
            for entry in std::fs::read_dir(folder).map_err(input_folder_error)? {
                let path = entry.map_err(input_folder_error)?.path();
                if path.is_file() && has_pdf_extension(&path) {
                    sources.push(DocumentSource::Path(path));
                }
            }
            debug!("Found {} PDFs in {}", sources.len(), folder.display());
            return self.combine(&sources, &[]);
        }

        if !folder.is_dir() {
            return Err(Error::InputFolder {
                path: folder.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let sources: Vec<DocumentSource> = order
            .iter()
            .map(|name| DocumentSource::Path(folder.join(name)))
            .collect();

        self.combine_resolved(ResolvedOrder {
            sources: sources.iter().collect(),
            skipped: Vec::new(),
        })
    }

    fn combine_resolved(&self, resolved: ResolvedOrder<'_>) -> Result<CombinedDocument> {
        let ResolvedOrder { sources, mut skipped } = resolved;
        let total = sources.len();
        let mut accumulator = PageAccumulator::new();
        let mut files_merged = 0;

        for (done, source) in sources.into_iter().enumerate() {
            if let Some(reason) = source.skip_reason() {
                let name = source.name();
                warn!("Skipping '{}': {}", name, reason);
                skipped.push(SkippedEntry { name, reason });
            } else {
                let document = source.load()?;
                debug!(
                    "Loaded '{}' ({} pages, {} bytes)",
                    document.name(),
                    document.page_count(),
                    document.byte_len()
                );
                if accumulator.append_document(document)? > 0 {
                    files_merged += 1;
                }
            }

            if let Some(ref callback) = self.progress {
                callback(done + 1, total);
            }
        }

        let page_count = accumulator.page_count();
        let bytes = accumulator.finish(&self.options)?;

        info!(
            "Combined {} files into {} pages ({} bytes, {} skipped)",
            files_merged,
            page_count,
            bytes.len(),
            skipped.len()
        );

        Ok(CombinedDocument {
            bytes: Bytes::from(bytes),
            page_count,
            files_merged,
            skipped,
        })
    }
}

/// Combine with default options.
pub fn combine(sources: &[DocumentSource], order: &[String]) -> Result<CombinedDocument> {
    Combiner::default().combine(sources, order)
}
