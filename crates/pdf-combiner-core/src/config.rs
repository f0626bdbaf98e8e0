use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the combined document
pub const DEFAULT_OUTPUT_FILENAME: &str = "combined.pdf";

/// Default PDF header version of the combined document
pub const DEFAULT_PDF_VERSION: &str = "1.5";

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

fn default_pdf_version() -> String {
    DEFAULT_PDF_VERSION.to_string()
}

/// `1.0` through `1.7`, or `2.0`
fn is_known_pdf_version(version: &str) -> bool {
    match version.split_once('.') {
        Some(("1", minor)) => matches!(minor.as_bytes(), [b'0'..=b'7']),
        Some(("2", "0")) => true,
        _ => false,
    }
}

const fn default_true() -> bool {
    true
}

/// Options for assembling the combined document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Compress content streams of the output
    #[serde(default = "default_true")]
    pub compress: bool,

    /// PDF header version written to the output
    #[serde(default = "default_pdf_version")]
    pub pdf_version: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            compress: true,
            pdf_version: default_pdf_version(),
        }
    }
}

/// Web front end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Maximum request body size for uploads, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// Sessions idle for longer than this are dropped (seconds)
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

const fn default_max_upload_mb() -> usize {
    300
}

const fn default_session_ttl_secs() -> u64 {
    3600
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: default_max_upload_mb(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl WebConfig {
    /// Upload limit in bytes
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// File name of the combined document
    #[serde(default = "default_output_filename")]
    pub output_filename: String,

    /// Directory the CLI saves into (defaults to the user's Downloads folder)
    #[serde(default)]
    pub save_dir: Option<PathBuf>,

    /// Output assembly options
    #[serde(default)]
    pub merge: MergeOptions,

    /// Web front end settings
    #[serde(default)]
    pub web: WebConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_filename: default_output_filename(),
            save_dir: None,
            merge: MergeOptions::default(),
            web: WebConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, crate::error::Error> {
        let config: Self = toml::from_str(content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every combine fail later on.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.output_filename.trim().is_empty()
            || self.output_filename.contains(['/', '\\'])
        {
            return Err(crate::error::Error::ConfigInvalid {
                field: "output_filename".to_string(),
                reason: "must be a plain, non-empty file name".to_string(),
            });
        }

        if !is_known_pdf_version(&self.merge.pdf_version) {
            return Err(crate::error::Error::ConfigInvalid {
                field: "merge.pdf_version".to_string(),
                reason: format!(
                    "'{}' is not a PDF version (expected 1.0 to 1.7 or 2.0)",
                    self.merge.pdf_version
                ),
            });
        }

        if self.web.max_upload_mb == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "web.max_upload_mb".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Load from default locations (~/.config/pdf-combiner/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("pdf-combiner").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.output_filename, "combined.pdf");
        assert!(config.save_dir.is_none());
        assert!(config.merge.compress);
        assert_eq!(config.web.max_upload_bytes(), 300 * 1024 * 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            output_filename = "handouts.pdf"

            [merge]
            compress = false

            [web]
            session_ttl_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.output_filename, "handouts.pdf");
        assert!(!config.merge.compress);
        assert_eq!(config.merge.pdf_version, "1.5");
        assert_eq!(config.web.session_ttl_secs, 60);
        assert_eq!(config.web.max_upload_mb, 300);
    }

    #[test]
    fn test_rejects_output_filename_with_separator() {
        let err = AppConfig::from_toml(r#"output_filename = "../out.pdf""#).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::ConfigInvalid { ref field, .. } if field == "output_filename"
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = AppConfig::from_toml("output_filename = ").unwrap_err();
        assert!(matches!(err, crate::error::Error::ConfigLoad(_)));
    }

    #[test]
    fn test_pdf_version_must_be_known() {
        for version in ["1.0", "1.4", "1.7", "2.0"] {
            let toml = format!("[merge]\npdf_version = \"{version}\"");
            let config = AppConfig::from_toml(&toml).unwrap();
            assert_eq!(config.merge.pdf_version, version);
        }

        for version in ["abc", "", "1", "1.8", "1.10", "2.1", "3.0", " 1.5"] {
            let toml = format!("[merge]\npdf_version = \"{version}\"");
            let err = AppConfig::from_toml(&toml).unwrap_err();
            assert!(
                matches!(
                    err,
                    crate::error::Error::ConfigInvalid { ref field, .. } if field == "merge.pdf_version"
                ),
                "{version:?} accepted"
            );
        }
    }
}
