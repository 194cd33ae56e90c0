//! Error types for the condoc command-line driver.

use thiserror::Error;

/// Main error type for loading, rendering and saving documents.
#[derive(Debug, Error)]
pub enum CliError {
    /// Data context could not be loaded.
    #[error(transparent)]
    Engine(#[from] condoc_engine::EngineError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document (de)serialization failed.
    #[error("JSON document error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// `document.xml` is not UTF-8.
    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// `.docx` archive could not be read or written.
    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// `.docx` archive lacks a required part.
    #[error("DOCX archive has no {0} part")]
    MissingPart(String),

    /// Only documents read from a `.docx` can be saved as one.
    #[error("Cannot save as .docx: document was not read from a .docx package")]
    MissingPackage,

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Document format could not be determined.
    #[error("Cannot determine document format of '{0}'. Use --format json|xml|docx")]
    UnknownFormat(String),

    /// Input document does not exist.
    #[error("Input document does not exist: {0}")]
    MissingInput(String),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
