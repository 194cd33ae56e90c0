//! Document rendering service that ties loading, the tag pass and saving
//! together.

use std::fs;
use std::path::Path;

use condoc_engine::{DataContext, Document, PassSummary, TagParser};

use crate::config::{DocumentFormat, DOCUMENT_PART, MAX_DOCUMENT_SIZE};
use crate::error::{CliError, Result};
use crate::wordml::{generate_document_xml, parse_document_xml, DocxPackage, XmlDocument};

/// Result of rendering one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub summary: PassSummary,
    /// Elements left in the body after the pass.
    pub remaining: usize,
}

/// Load a document from disk.
///
/// # Errors
/// Returns an error if the file is missing, too large, or not a valid
/// document in the given format.
pub fn load_document(path: &Path, format: DocumentFormat) -> Result<XmlDocument> {
    if !path.is_file() {
        return Err(CliError::MissingInput(path.display().to_string()));
    }
    let size = fs::metadata(path)?.len();
    if size > MAX_DOCUMENT_SIZE {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is {size} bytes (max {MAX_DOCUMENT_SIZE})", path.display()),
        )));
    }

    tracing::debug!(path = %path.display(), ?format, "Loading document");
    let bytes = fs::read(path)?;
    parse_document(&bytes, format)
}

/// Parse a document in the given format.
///
/// A `.docx` package is kept on the returned document so that saving it
/// can write the other entries back unchanged.
///
/// # Errors
/// Returns [`CliError::Json`], [`CliError::Encoding`], [`CliError::XmlParse`]
/// or [`CliError::Zip`] for malformed input.
pub fn parse_document(input: &[u8], format: DocumentFormat) -> Result<XmlDocument> {
    match format {
        DocumentFormat::Json => {
            let body: Document = serde_json::from_slice(input)?;
            Ok(XmlDocument::from_document(body))
        }
        DocumentFormat::Xml => parse_document_xml(std::str::from_utf8(input)?),
        DocumentFormat::Docx => {
            let package = DocxPackage::from_bytes(input)?;
            let mut document = parse_document_xml(package.document_xml()?)?;
            document.package = Some(package);
            Ok(document)
        }
    }
}

/// Serialize a document in the given format.
///
/// # Errors
/// Returns [`CliError::Json`] if JSON serialization fails and
/// [`CliError::MissingPackage`] when asked for `.docx` output of a document
/// that was not read from a package.
pub fn serialize_document(document: &XmlDocument, format: DocumentFormat) -> Result<Vec<u8>> {
    match format {
        DocumentFormat::Json => {
            let mut json = serde_json::to_vec_pretty(&document.body)?;
            json.push(b'\n');
            Ok(json)
        }
        DocumentFormat::Xml => Ok(generate_document_xml(document)?.into_bytes()),
        DocumentFormat::Docx => {
            let mut package = document.package.clone().ok_or(CliError::MissingPackage)?;
            package.set_part(DOCUMENT_PART, generate_document_xml(document)?.into_bytes());
            package.to_bytes()
        }
    }
}

/// Save a document to disk.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn save_document(document: &XmlDocument, path: &Path, format: DocumentFormat) -> Result<()> {
    let bytes = serialize_document(document, format)?;
    fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), ?format, "Saved document");
    Ok(())
}

/// Run one tag pass over a loaded document.
pub fn render_document(data: &DataContext, document: &mut XmlDocument) -> RenderReport {
    let summary = TagParser::new(data).process_document(&mut document.body);
    RenderReport {
        summary,
        remaining: document.body.len(),
    }
}

/// Load `input`, render it against `data` and save the result to `output`.
///
/// # Errors
/// Returns an error if loading or saving fails. The pass itself cannot fail.
pub fn render_file(
    data: &DataContext,
    input: &Path,
    output: &Path,
    format: DocumentFormat,
) -> Result<RenderReport> {
    let mut document = load_document(input, format)?;
    let report = render_document(data, &mut document);
    save_document(&document, output, format)?;
    Ok(report)
}
