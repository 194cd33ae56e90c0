//! `.docx` packages: zip archives around `word/document.xml`.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::config::{DOCUMENT_PART, MEDIA_PREFIX};
use crate::error::{CliError, Result};

/// The entries of a `.docx` archive, in archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxPackage {
    entries: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file entry of a zip archive.
    ///
    /// # Errors
    /// Returns [`CliError::Zip`] if `bytes` is not a readable zip archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }

        tracing::debug!(entries = entries.len(), "Read docx package");
        Ok(Self { entries })
    }

    /// Write the entries back to a zip archive.
    ///
    /// Media entries are stored, everything else is deflated.
    ///
    /// # Errors
    /// Returns [`CliError::Zip`] or [`CliError::Io`] if writing fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, data) in &self.entries {
            let options = if name.starts_with(MEDIA_PREFIX) {
                stored
            } else {
                deflated
            };
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
        Ok(zip.finish()?.into_inner())
    }

    /// Names of all entries, in archive order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Contents of the entry called `name`.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Replace the entry called `name`, or append it if there is none.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, existing)) => *existing = data,
            None => self.entries.push((name.to_string(), data)),
        }
    }

    /// The main document part as text.
    ///
    /// # Errors
    /// Returns [`CliError::MissingPart`] if the package has no
    /// `word/document.xml` and [`CliError::Encoding`] if it is not UTF-8.
    pub fn document_xml(&self) -> Result<&str> {
        let data = self
            .part(DOCUMENT_PART)
            .ok_or_else(|| CliError::MissingPart(DOCUMENT_PART.to_string()))?;
        Ok(std::str::from_utf8(data)?)
    }
}
