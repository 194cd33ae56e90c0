//! `<IF>` / `<ELSE>` / `</IF>` tag parser
//!
//! The parser makes a single forward pass over the block elements of a
//! document. Marker paragraphs open, split and close a region; content
//! inside a region is kept or removed depending on the region's condition,
//! and kept paragraphs get their inline tags substituted.
//!
//! # Region decisions
//!
//! | status      | satisfied | content                       |
//! |-------------|-----------|-------------------------------|
//! | `FoundIf`   | true      | keep, substitute inline tags  |
//! | `FoundIf`   | false     | remove                        |
//! | `FoundElse` | true      | remove                        |
//! | `FoundElse` | false     | keep, substitute inline tags  |
//! | otherwise   | -         | keep, substitute inline tags  |
//!
//! Regions do not nest. An `<IF>` seen inside an open region replaces the
//! active condition.
//!
//! # Inline tags
//!
//! The two-branch form `<IF=c>a<ELSE>b</IF>` is tried first. Only when it
//! does not occur anywhere in the paragraph is the single-branch form
//! `<IF=c>a</IF>` applied, otherwise its lazy body would stop at the first
//! `</IF>` and leave `<ELSE>` behind as text.

use crate::config::{
    BLOCK_ELSE_PATTERN, BLOCK_END_PATTERN, BLOCK_IF_PATTERN, INLINE_IF_ELSE_PATTERN,
    INLINE_IF_PATTERN,
};
use crate::data::{is_truthy, DataContext};
use crate::document::{Document, Element, ElementId, Paragraph};
use crate::mutator::{remove_element, replace_text};

/// Where the parser is relative to a block region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No marker seen yet.
    #[default]
    None,
    /// Inside the `<IF>` branch of a region.
    FoundIf,
    /// Inside the `<ELSE>` branch of a region.
    FoundElse,
    /// A region was closed; content is unconditional again.
    FoundEnd,
}

/// Parser state threaded from one element to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserState {
    pub status: SearchStatus,
    /// Whether the condition of the last `<IF>` marker held.
    pub if_satisfied: bool,
    /// Whether the last processed element was removed.
    pub element_discard: bool,
}

/// What an element is, as far as the state machine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    /// `<IF=cond>` marker paragraph, with its evaluated condition.
    IfMarker { satisfied: bool },
    ElseMarker,
    EndMarker,
    /// Any other paragraph.
    Paragraph,
    /// Any non-paragraph block.
    Other,
}

/// What to do with the element that was just classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Marker paragraph: always removed.
    RemoveMarker,
    /// Content outside the active branch.
    Discard,
    /// Content to keep; `inline` says whether to substitute inline tags.
    Keep { inline: bool },
}

impl ParserState {
    /// Compute the next state and the decision for one element.
    #[must_use]
    pub fn transition(self, class: ElementClass) -> (Self, Decision) {
        let marker = |status, if_satisfied| {
            (
                Self {
                    status,
                    if_satisfied,
                    element_discard: true,
                },
                Decision::RemoveMarker,
            )
        };

        match class {
            ElementClass::IfMarker { satisfied } => marker(SearchStatus::FoundIf, satisfied),
            ElementClass::ElseMarker => marker(SearchStatus::FoundElse, self.if_satisfied),
            ElementClass::EndMarker => marker(SearchStatus::FoundEnd, self.if_satisfied),
            ElementClass::Paragraph | ElementClass::Other => {
                let discard = matches!(
                    (self.status, self.if_satisfied),
                    (SearchStatus::FoundIf, false) | (SearchStatus::FoundElse, true)
                );
                let next = Self {
                    element_discard: discard,
                    ..self
                };
                let decision = if discard {
                    Decision::Discard
                } else {
                    Decision::Keep {
                        inline: class == ElementClass::Paragraph,
                    }
                };
                (next, decision)
            }
        }
    }

    /// Whether content is currently inside an open region.
    #[must_use]
    pub fn in_region(self) -> bool {
        matches!(self.status, SearchStatus::FoundIf | SearchStatus::FoundElse)
    }
}

/// A parsed `KEY[=VALUE]` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub expected: Option<String>,
}

impl Condition {
    /// Split condition text on its first `=`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.split_once('=') {
            Some((key, expected)) => Self {
                key: key.to_string(),
                expected: Some(expected.to_string()),
            },
            None => Self {
                key: text.to_string(),
                expected: None,
            },
        }
    }

    /// Evaluate against a data context.
    ///
    /// Without an expected value the key's value must be truthy (see
    /// [`is_truthy`]); with one, the key's string form must equal it.
    #[must_use]
    pub fn evaluate(&self, data: &DataContext) -> bool {
        match &self.expected {
            None => data.lookup(&self.key).is_some_and(is_truthy),
            Some(expected) => data.resolve(&self.key) == *expected,
        }
    }
}

/// Outcome of processing one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The element was already detached and was not looked at.
    Skipped,
    MarkerRemoved,
    Discarded,
    /// The element was kept; `substitutions` inline tags were replaced.
    Kept { substitutions: usize },
}

/// Counters for one pass over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassSummary {
    pub elements: usize,
    pub markers_removed: usize,
    pub content_removed: usize,
    pub substitutions: usize,
}

impl PassSummary {
    /// Total number of removed elements.
    #[must_use]
    pub fn removals(&self) -> usize {
        self.markers_removed + self.content_removed
    }

    fn record(&mut self, outcome: ProcessOutcome) {
        match outcome {
            ProcessOutcome::Skipped => return,
            ProcessOutcome::MarkerRemoved => self.markers_removed += 1,
            ProcessOutcome::Discarded => self.content_removed += 1,
            ProcessOutcome::Kept { substitutions } => self.substitutions += substitutions,
        }
        self.elements += 1;
    }
}

/// Stateful tag parser for one document pass.
#[derive(Debug)]
pub struct TagParser<'d> {
    data: &'d DataContext,
    state: ParserState,
    summary: PassSummary,
}

impl<'d> TagParser<'d> {
    #[must_use]
    pub fn new(data: &'d DataContext) -> Self {
        Self {
            data,
            state: ParserState::default(),
            summary: PassSummary::default(),
        }
    }

    /// Current parser state.
    #[must_use]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn summary(&self) -> PassSummary {
        self.summary
    }

    /// Evaluate `KEY[=VALUE]` condition text against the data context.
    #[must_use]
    pub fn evaluate_condition(&self, condition: &str) -> bool {
        Condition::parse(condition).evaluate(self.data)
    }

    /// Run a full pass over every element attached to `document`.
    pub fn process_document(&mut self, document: &mut Document) -> PassSummary {
        for id in document.body_ids() {
            self.process_element(document, id);
        }

        if self.state.in_region() {
            tracing::warn!(
                status = ?self.state.status,
                "Document ended inside an unterminated <IF> region"
            );
        }
        tracing::info!(
            elements = self.summary.elements,
            markers_removed = self.summary.markers_removed,
            content_removed = self.summary.content_removed,
            substitutions = self.summary.substitutions,
            "Tag pass finished"
        );
        self.summary
    }

    /// Process one element in document order.
    pub fn process_element(&mut self, document: &mut Document, id: ElementId) -> ProcessOutcome {
        self.state.element_discard = false;

        if !document.is_attached(id) {
            return ProcessOutcome::Skipped;
        }
        let Some(class) = document.element(id).map(|e| self.classify(e)) else {
            return ProcessOutcome::Skipped;
        };

        match class {
            ElementClass::IfMarker { satisfied } if self.state.in_region() => {
                tracing::warn!(
                    element = id.index(),
                    satisfied,
                    "Nested <IF> marker replaces the open region's condition"
                );
            }
            ElementClass::ElseMarker if !self.state.in_region() => {
                tracing::warn!(element = id.index(), "<ELSE> marker outside an <IF> region");
            }
            _ => {}
        }

        let (next, decision) = self.state.transition(class);
        self.state = next;
        tracing::debug!(
            element = id.index(),
            ?class,
            ?decision,
            status = ?next.status,
            "Processed element"
        );

        let outcome = match decision {
            Decision::RemoveMarker => {
                remove_element(document, id);
                ProcessOutcome::MarkerRemoved
            }
            Decision::Discard => {
                remove_element(document, id);
                ProcessOutcome::Discarded
            }
            Decision::Keep { inline } => {
                let substitutions = match document.paragraph_mut(id) {
                    Some(paragraph) if inline => self.substitute_inline(paragraph),
                    _ => 0,
                };
                ProcessOutcome::Kept { substitutions }
            }
        };

        self.summary.record(outcome);
        outcome
    }

    fn classify(&self, element: &Element) -> ElementClass {
        let Element::Paragraph(paragraph) = element else {
            return ElementClass::Other;
        };
        let text = paragraph.text();

        if let Some(caps) = BLOCK_IF_PATTERN.captures(&text) {
            return ElementClass::IfMarker {
                satisfied: self.evaluate_condition(&caps[1]),
            };
        }
        if BLOCK_ELSE_PATTERN.is_match(&text) {
            return ElementClass::ElseMarker;
        }
        if BLOCK_END_PATTERN.is_match(&text) {
            return ElementClass::EndMarker;
        }
        ElementClass::Paragraph
    }

    /// Replace every inline tag in a kept paragraph, returning how many
    /// spans were substituted.
    fn substitute_inline(&self, paragraph: &mut Paragraph) -> usize {
        let text = paragraph.text();

        let replacements: Vec<(String, String)> = if INLINE_IF_ELSE_PATTERN.is_match(&text) {
            INLINE_IF_ELSE_PATTERN
                .captures_iter(&text)
                .map(|caps| {
                    let branch = if self.evaluate_condition(&caps[1]) {
                        &caps[2]
                    } else {
                        &caps[3]
                    };
                    (caps[0].to_string(), branch.to_string())
                })
                .collect()
        } else {
            INLINE_IF_PATTERN
                .captures_iter(&text)
                .map(|caps| {
                    let body = if self.evaluate_condition(&caps[1]) {
                        &caps[2]
                    } else {
                        ""
                    };
                    (caps[0].to_string(), body.to_string())
                })
                .collect()
        };

        let mut substituted = 0;
        for (span, replacement) in &replacements {
            if replace_text(paragraph, span, replacement) {
                substituted += 1;
            }
        }
        substituted
    }
}
