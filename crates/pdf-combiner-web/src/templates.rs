//! Askama templates for HTMX responses.
//!
//! ## Template Structure
//!
//! - `base.html` - Common layout with CSS/JS
//! - `index.html` - Upload form, pending list and combine button
//! - `partials/file_list.html` - The pending list, swapped after every action
//! - `partials/combine_result.html` - Toast after a combine, with an OOB list refresh

use askama::Template;
use askama_web::WebTemplate;
use pdf_combiner_core::PendingList;

/// One row of the pending list as displayed.
pub struct FileRow {
    pub name: String,
    /// Identity key, percent-encoded for use in a route path
    pub key_path: String,
    pub size: String,
}

impl FileRow {
    fn rows(list: &PendingList) -> Vec<Self> {
        list.iter()
            .map(|f| Self {
                name: f.name().to_string(),
                key_path: urlencoding::encode(f.key().as_str()).into_owned(),
                size: human_size(f.size()),
            })
            .collect()
    }
}

/// Format a byte count as B / KB / MB.
#[allow(clippy::cast_precision_loss)] // display only
pub fn human_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

// =============================================================================
// Full Page Templates
// =============================================================================

/// Landing page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub files: Vec<FileRow>,
    pub output_filename: String,
    /// Whether the list fragment is sent as an OOB swap (never on a full page)
    pub is_oob: bool,
}

impl IndexTemplate {
    pub fn new(list: &PendingList, output_filename: &str) -> Self {
        Self {
            files: FileRow::rows(list),
            output_filename: output_filename.to_string(),
            is_oob: false,
        }
    }
}

// =============================================================================
// Fragment Templates (HTMX partial responses)
// =============================================================================

/// The pending list after an upload, move or remove.
#[derive(Template, WebTemplate)]
#[template(path = "partials/file_list.html")]
pub struct FileListTemplate {
    pub files: Vec<FileRow>,
    pub is_oob: bool,
}

impl FileListTemplate {
    pub fn new(list: &PendingList) -> Self {
        Self {
            files: FileRow::rows(list),
            is_oob: false,
        }
    }
}

/// Toast kinds, mapped to CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Result of `POST /api/combine`.
///
/// Always re-renders the list out of band so a cleared list shows up at once.
#[derive(Template, WebTemplate)]
#[template(path = "partials/combine_result.html")]
pub struct CombineResultTemplate {
    pub kind: ToastKind,
    pub message: String,
    pub download_name: Option<String>,
    pub files: Vec<FileRow>,
    pub is_oob: bool,
}

impl CombineResultTemplate {
    pub fn success(
        combined_files: usize,
        page_count: usize,
        download_name: &str,
        list: &PendingList,
    ) -> Self {
        Self {
            kind: ToastKind::Success,
            message: format!("Combined {combined_files} files ({page_count} pages)"),
            download_name: Some(download_name.to_string()),
            files: FileRow::rows(list),
            is_oob: true,
        }
    }

    pub fn warning(message: impl Into<String>, list: &PendingList) -> Self {
        Self {
            kind: ToastKind::Warning,
            message: message.into(),
            download_name: None,
            files: FileRow::rows(list),
            is_oob: true,
        }
    }

    pub fn error(message: impl Into<String>, list: &PendingList) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            download_name: None,
            files: FileRow::rows(list),
            is_oob: true,
        }
    }

    pub const fn toast_type(&self) -> &'static str {
        self.kind.css_class()
    }
}
