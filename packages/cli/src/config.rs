//! Configuration constants and format selection for the condoc driver.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{CliError, Result};

/// Suffix appended to the input file stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_parsed";

/// WordprocessingML main namespace.
pub const WORDML_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Main document part inside a `.docx` package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Package entries under this prefix are stored uncompressed on save.
pub const MEDIA_PREFIX: &str = "word/media/";

/// Maximum input document size in bytes (50 MB).
///
/// A template beyond this is either not a template or will not fit the
/// in-memory model comfortably.
pub const MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

/// On-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    /// serde JSON rendering of the document model.
    Json,
    /// WordprocessingML `document.xml`.
    Xml,
    /// Word package: a zip archive holding `word/document.xml`.
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownFormat`] for any extension other than
    /// `.json`, `.xml` or `.docx`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("xml") => Ok(Self::Xml),
            Some("docx") => Ok(Self::Docx),
            _ => Err(CliError::UnknownFormat(path.display().to_string())),
        }
    }

    /// Use `explicit` if given, otherwise detect from `path`.
    ///
    /// # Errors
    /// See [`DocumentFormat::from_path`].
    pub fn resolve(explicit: Option<Self>, path: &Path) -> Result<Self> {
        explicit.map_or_else(|| Self::from_path(path), Ok)
    }
}

/// Default output path: `<stem>_parsed.<ext>` next to the input.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use condoc::config::default_output_path;
///
/// let out = default_output_path(Path::new("templates/report.docx"));
/// assert_eq!(out, Path::new("templates/report_parsed.docx"));
/// ```
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}{OUTPUT_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{OUTPUT_SUFFIX}"),
    };
    input.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.json")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("word/document.XML")).unwrap(),
            DocumentFormat::Xml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("template.docx")).unwrap(),
            DocumentFormat::Docx
        );
        assert!(DocumentFormat::from_path(Path::new("report.odt")).is_err());
        assert!(DocumentFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_explicit_format_wins() {
        let format =
            DocumentFormat::resolve(Some(DocumentFormat::Xml), Path::new("body.txt")).unwrap();
        assert_eq!(format, DocumentFormat::Xml);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/template.json")),
            PathBuf::from("/tmp/template_parsed.json")
        );
        assert_eq!(
            default_output_path(Path::new("template")),
            PathBuf::from("template_parsed")
        );
    }

    #[test]
    fn test_constants_are_reasonable() {
        assert!(MAX_DOCUMENT_SIZE >= 1024 * 1024, "Should allow at least 1MB");
        assert!(WORDML_NAMESPACE.starts_with("http://"));
        assert!(DOCUMENT_PART.starts_with("word/"));
        assert!(MEDIA_PREFIX.ends_with('/'));
    }
}
