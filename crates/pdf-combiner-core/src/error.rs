use thiserror::Error;

/// Unified error type for pdf-combiner-core
///
/// This enum encompasses all error cases that can abort a combine:
/// - PDF operations (opening, parsing, saving)
/// - Save location resolution
/// - Configuration operations (loading, validation)
/// - General I/O operations
///
/// Per-entry problems (a listed file that is missing or is not a PDF) are not
/// errors; they are reported as [`crate::merge::SkippedEntry`] values and the
/// combine carries on without them.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Merge Errors
    // ==========================================================================
    /// The resolved merge order produced no pages at all
    #[error("no valid PDFs found to merge")]
    NoValidSources,

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a source PDF
    #[error("failed to open PDF '{name}': {reason}")]
    PdfOpen { name: String, reason: String },

    /// Failed to serialize the combined PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// Error from the lopdf library while assembling the page tree
    #[error("lopdf error: {0}")]
    Lopdf(String),

    // ==========================================================================
    // Input / Output Errors
    // ==========================================================================
    /// The folder to read PDFs from cannot be listed
    #[error("cannot read input folder {}: {reason}", path.display())]
    InputFolder {
        path: std::path::PathBuf,
        reason: String,
    },

    /// Could not determine or prepare the directory to save into
    #[error("cannot resolve save location: {0}")]
    SaveLocation(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the combine had nothing to work with, as
    /// opposed to a codec or I/O failure.
    pub const fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoValidSources)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
