//! WordprocessingML (`word/document.xml`) reading and writing.
//!
//! Only the body's block structure is modelled: paragraphs become
//! [`Paragraph`](condoc_engine::Paragraph)s with styled runs, every other
//! body child is carried verbatim as an
//! [`OpaqueBlock`](condoc_engine::OpaqueBlock). Paragraphs keep their source
//! markup and are only rebuilt once the tag pass rewrites them.

mod package;
mod reader;
mod utils;
mod writer;

pub use package::DocxPackage;
pub use reader::parse_document_xml;
pub use utils::{element_children, find_child, get_tag_name, get_val, has_tag};
pub use writer::generate_document_xml;

use condoc_engine::Document;

/// Source text around the body's children, re-emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Everything before the first body child, including the `w:body` start tag.
    pub head: String,
    /// Everything after the last body child, including the `w:body` end tag.
    pub tail: String,
}

/// A parsed `document.xml`: the block model, the source envelope and, for
/// `.docx` input, the package it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub body: Document,
    pub envelope: Option<Envelope>,
    pub package: Option<DocxPackage>,
}

impl XmlDocument {
    /// Wrap a document that did not come from XML.
    #[must_use]
    pub fn from_document(body: Document) -> Self {
        Self {
            body,
            envelope: None,
            package: None,
        }
    }
}
