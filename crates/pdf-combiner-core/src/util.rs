//! Utility functions shared across the crate.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Get the user's config directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".config")))
}

/// Get the user's home directory.
///
/// On Windows `%USERPROFILE%` wins over `$HOME`.
pub fn home_dir() -> Option<PathBuf> {
    let vars: &[&str] = if cfg!(windows) {
        &["USERPROFILE", "HOME"]
    } else {
        &["HOME"]
    };

    vars.iter()
        .filter_map(std::env::var_os)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Default directory combined documents are saved into: `<home>/Downloads`.
pub fn downloads_dir() -> Result<PathBuf> {
    home_dir()
        .map(|home| home.join("Downloads"))
        .ok_or_else(|| Error::SaveLocation("home directory is not set".to_string()))
}

/// Write a combined document to `dir/filename`, creating `dir` if needed.
///
/// The bytes go to a temporary file in `dir` first and are renamed into
/// place, so a reader never sees a half-written document. Returns the final
/// path.
pub fn save_combined(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    if filename.is_empty() || Path::new(filename).file_name() != Some(std::ffi::OsStr::new(filename)) {
        return Err(Error::SaveLocation(format!(
            "'{filename}' is not a plain file name"
        )));
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        Error::SaveLocation(format!("failed to create {}: {e}", dir.display()))
    })?;

    let output_path = dir.join(filename);

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    debug!("Wrote {} bytes to {}", bytes.len(), tmp.path().display());

    tmp.persist(&output_path).map_err(|e| Error::Io(e.error))?;
    info!("Saved combined PDF to {}", output_path.display());

    Ok(output_path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("Downloads");

        let path = save_combined(&dir, "combined.pdf", b"%PDF-1.5").unwrap();

        assert_eq!(path, dir.join("combined.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        save_combined(tmp.path(), "out.pdf", b"old").unwrap();
        let path = save_combined(tmp.path(), "out.pdf", b"new").unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"new");
        // Only the final file remains, no stray temp files
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_rejects_path_like_filename() {
        let tmp = tempfile::tempdir().unwrap();
        let err = save_combined(tmp.path(), "../escape.pdf", b"x").unwrap_err();
        assert!(matches!(err, Error::SaveLocation(_)));

        let err = save_combined(tmp.path(), "", b"x").unwrap_err();
        assert!(matches!(err, Error::SaveLocation(_)));
    }
}
