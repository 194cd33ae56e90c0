//! condoc - Render conditional document templates.
//!
//! This crate is the command-line driver around [`condoc_engine`]: it loads
//! a template document (`.docx`, `document.xml` or JSON) and a JSON data
//! context, runs the `<IF>`/`<ELSE>` tag pass and writes the resulting
//! document.
//!
//! # Example
//!
//! ```
//! use condoc::config::DocumentFormat;
//! use condoc::render::{parse_document, render_document};
//! use condoc_engine::DataContext;
//!
//! let template = r#"{"elements": [
//!     {"type": "paragraph", "runs": [{"text": "Hi<IF=vip> VIP</IF>!"}]}
//! ]}"#;
//! let mut document = parse_document(template.as_bytes(), DocumentFormat::Json).unwrap();
//! let data = DataContext::new(r#"{"vip": "yes"}"#).unwrap();
//!
//! render_document(&data, &mut document);
//! assert_eq!(document.body.paragraph_texts(), vec!["Hi VIP!"]);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, format detection and output naming
//! - [`error`]: Error types and Result alias
//! - [`wordml`]: WordprocessingML `document.xml` reader and writer, `.docx` packages
//! - [`render`]: Load, render and save documents
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod wordml;

// Re-export commonly used items
pub use config::{default_output_path, DocumentFormat};
pub use error::{CliError, Result};
pub use render::{render_document, render_file, RenderReport};
