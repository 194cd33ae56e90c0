//! In-memory document model
//!
//! A [`Document`] is an ordered sequence of block elements attached to a
//! single body. Elements live in an arena and are addressed by
//! [`ElementId`]; detaching an element removes it from the body but keeps
//! the id valid, so a driver can iterate a snapshot of ids while the tag
//! parser removes elements underneath it.
//!
//! Only paragraphs are inspected by the tag parser. Every other block
//! (tables, section properties, drawings) is carried as an [`OpaqueBlock`].

use serde::{Deserialize, Serialize};

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Position of the element in the document arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Character formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Text colour as hex RGB (`"FF0000"`), `None` for automatic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A span of uniformly styled text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,

    #[serde(default, skip_serializing_if = "is_default_style")]
    pub style: RunStyle,

    /// Format-specific formatting not covered by `style`, carried through
    /// untouched (e.g. raw `w:sz` or `w:rFonts` elements).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,

    /// Non-text inline content carried through untouched (e.g. a raw
    /// `w:drawing`). Written after the run's text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<String>,
}

fn is_default_style(style: &RunStyle) -> bool {
    *style == RunStyle::default()
}

impl Run {
    /// Create an unstyled run.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the run style.
    #[must_use]
    pub fn with_style(mut self, style: RunStyle) -> Self {
        self.style = style;
        self
    }
}

/// A paragraph: an ordered sequence of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,

    /// Format-specific paragraph properties carried through untouched
    /// (e.g. a raw `w:pPr` element).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,

    /// Raw source markup of the whole paragraph. Writers re-emit it verbatim
    /// while it is set; rewriting the text clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl Paragraph {
    /// Create a paragraph from runs.
    #[must_use]
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Self::default()
        }
    }

    /// Create a paragraph holding `text` in a single unstyled run.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Run::new(text)])
    }

    /// Full text of the paragraph: all run texts concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A block the tag parser never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueBlock {
    /// Short label for the block type (`"tbl"`, `"sectPr"`, ...).
    pub kind: String,

    /// Raw source markup, re-emitted verbatim on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl OpaqueBlock {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            markup: None,
        }
    }

    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }
}

/// A block element of a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Paragraph(Paragraph),
    Opaque(OpaqueBlock),
}

impl Element {
    #[must_use]
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            Self::Opaque(_) => None,
        }
    }
}

impl From<Paragraph> for Element {
    fn from(paragraph: Paragraph) -> Self {
        Self::Paragraph(paragraph)
    }
}

impl From<OpaqueBlock> for Element {
    fn from(block: OpaqueBlock) -> Self {
        Self::Opaque(block)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    element: Element,
    attached: bool,
}

/// An ordered, mutable sequence of block elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRepr", into = "DocumentRepr")]
pub struct Document {
    nodes: Vec<Node>,
    body: Vec<ElementId>,
}

/// Serialized form: only the attached elements, in body order.
#[derive(Serialize, Deserialize)]
struct DocumentRepr {
    #[serde(default)]
    elements: Vec<Element>,
}

impl From<DocumentRepr> for Document {
    fn from(repr: DocumentRepr) -> Self {
        repr.elements.into_iter().collect()
    }
}

impl From<Document> for DocumentRepr {
    fn from(document: Document) -> Self {
        let Document { nodes, body } = document;
        let mut slots: Vec<Option<Element>> = nodes.into_iter().map(|n| Some(n.element)).collect();
        let elements = body
            .into_iter()
            .filter_map(|id| slots.get_mut(id.0).and_then(Option::take))
            .collect();
        Self { elements }
    }
}

impl FromIterator<Element> for Document {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut document = Self::new();
        for element in iter {
            document.push(element);
        }
        document
    }
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the end of the body.
    pub fn push(&mut self, element: impl Into<Element>) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            element: element.into(),
            attached: true,
        });
        self.body.push(id);
        id
    }

    /// Snapshot of the ids currently attached to the body, in order.
    #[must_use]
    pub fn body_ids(&self) -> Vec<ElementId> {
        self.body.clone()
    }

    /// Number of attached elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Get an element by id, attached or not.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0).map(|n| &n.element)
    }

    /// Get a mutable element by id, attached or not.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).map(|n| &mut n.element)
    }

    /// Get a mutable paragraph by id; `None` for opaque blocks.
    pub fn paragraph_mut(&mut self, id: ElementId) -> Option<&mut Paragraph> {
        self.element_mut(id).and_then(Element::as_paragraph_mut)
    }

    /// Whether the element still has a parent.
    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.attached)
    }

    /// Detach an element from the body.
    ///
    /// Returns `false` without doing anything if the element is unknown or
    /// already detached.
    pub fn detach(&mut self, id: ElementId) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.attached => {
                node.attached = false;
                self.body.retain(|b| *b != id);
                true
            }
            _ => false,
        }
    }

    /// Iterate over the attached elements in body order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.body.iter().map(|id| &self.nodes[id.0].element)
    }

    /// Texts of the attached paragraphs in body order.
    #[must_use]
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.elements()
            .filter_map(Element::as_paragraph)
            .map(Paragraph::text)
            .collect()
    }
}
