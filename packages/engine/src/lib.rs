//! condoc Engine
//!
//! Conditional templating for block-structured documents. This library
//! provides:
//! - A JSON-backed data context with a `Sharing` fallback namespace
//! - An in-memory document model of paragraphs (styled runs) and opaque blocks
//! - A single-pass `<IF>`/`<ELSE>`/`</IF>` tag parser that removes content
//!   outside the satisfied branch and substitutes inline tags
//!
//! # Example
//!
//! ```
//! use condoc_engine::{DataContext, Document, Element, Paragraph, TagParser};
//!
//! let data = DataContext::new(r#"{"region": "EU"}"#).unwrap();
//! let mut doc: Document = [
//!     "<IF=region=EU>",
//!     "EU specific clause.",
//!     "<ELSE>",
//!     "Non-EU clause.",
//!     "</IF>",
//! ]
//! .into_iter()
//! .map(|t| Element::from(Paragraph::from_text(t)))
//! .collect();
//!
//! TagParser::new(&data).process_document(&mut doc);
//! assert_eq!(doc.paragraph_texts(), vec!["EU specific clause."]);
//! ```

pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod mutator;
pub mod parser;

// Re-export commonly used items
pub use data::{is_truthy, value_to_string, DataContext};
pub use document::{Document, Element, ElementId, OpaqueBlock, Paragraph, Run, RunStyle};
pub use error::{EngineError, Result};
pub use mutator::{remove_element, replace_text};
pub use parser::{
    Condition, Decision, ElementClass, ParserState, PassSummary, ProcessOutcome, SearchStatus,
    TagParser,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
