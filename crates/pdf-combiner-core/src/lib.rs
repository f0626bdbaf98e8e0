//! PDF Combiner Core Library
//!
//! This library provides the core functionality for combining PDF documents:
//! - Merge engine: order resolution and page concatenation (lopdf)
//! - Pending-file list for interactive sessions
//! - Saving the result to the user's Downloads folder
//! - Configuration loading

pub mod config;
pub mod error;
pub mod merge;
pub mod pdf;
pub mod session;
pub mod util;

pub use config::{AppConfig, MergeOptions, WebConfig, DEFAULT_OUTPUT_FILENAME};
pub use error::{Error, Result};
pub use merge::{
    CombinedDocument, Combiner, DocumentSource, ProgressCallback, SkipReason, SkippedEntry,
    combine,
};
pub use pdf::PdfDocument;
pub use session::{Action, Direction, IdentityKey, Outcome, PendingFile, PendingList, Upload};
pub use util::{downloads_dir, save_combined};

use std::path::{Path, PathBuf};

/// Combine the PDFs of `folder` and save the result as `output_filename` in
/// `save_dir` (or the Downloads folder when `None`).
///
/// An empty `order` means every PDF of the folder, alphabetically. Returns the
/// saved path together with the combine report.
pub fn combine_folder_to_disk(
    combiner: &Combiner,
    folder: &Path,
    order: &[String],
    output_filename: &str,
    save_dir: Option<&Path>,
) -> Result<(PathBuf, CombinedDocument)> {
    let combined = combiner.combine_folder(folder, order)?;

    let dir = match save_dir {
        Some(dir) => dir.to_path_buf(),
        None => downloads_dir()?,
    };
    let path = save_combined(&dir, output_filename, &combined.bytes)?;

    Ok((path, combined))
}
