//! Primitive document mutations used by the tag parser.
//!
//! Text replacement collapses a paragraph into its first run: the first
//! run receives the complete rewritten text and a neutral colour, every
//! other run is emptied. Styling carried by the other runs is lost. Callers
//! that render the result rely on this, so it must not become
//! style-preserving. A rewritten paragraph also loses its source markup and
//! is rebuilt from its runs when saved.

use crate::config::NEUTRAL_COLOR;
use crate::document::{Document, ElementId, Paragraph};

/// Replace every occurrence of `old` with `new` in the paragraph text.
///
/// Returns `false` and leaves the paragraph untouched if it has no runs.
pub fn replace_text(paragraph: &mut Paragraph, old: &str, new: &str) -> bool {
    let replaced = paragraph.text().replace(old, new);

    let Some((first, rest)) = paragraph.runs.split_first_mut() else {
        return false;
    };

    first.text = replaced;
    first.style.color = Some(NEUTRAL_COLOR.to_string());
    for run in rest {
        run.text.clear();
    }
    paragraph.markup = None;
    true
}

/// Detach an element from its parent.
///
/// Elements without a parent (already removed) are ignored.
pub fn remove_element(document: &mut Document, id: ElementId) -> bool {
    let removed = document.detach(id);
    if !removed {
        tracing::trace!(element = id.index(), "Element already detached");
    }
    removed
}
