//! Build the block model from `document.xml`.

use condoc_engine::{Document, OpaqueBlock, Paragraph, Run, RunStyle};
use roxmltree::Node;

use super::utils::{element_children, find_child, get_tag_name, get_val, has_tag};
use super::{Envelope, XmlDocument};
use crate::error::{CliError, Result};

/// Paragraph children whose runs are flattened into the paragraph.
///
/// The wrapper itself (hyperlink target, revision mark) is only kept in the
/// paragraph's source markup.
const RUN_CONTAINERS: &[&str] = &["hyperlink", "ins", "smartTag", "fldSimple"];

/// `w:rPr` children mapped onto [`RunStyle`].
const STYLE_PROPERTIES: &[&str] = &["b", "i", "color", "u"];

/// Parse a WordprocessingML main document part.
///
/// # Errors
/// Returns [`CliError::XmlParse`] for malformed XML and
/// [`CliError::MissingElement`] if there is no `w:body`.
pub fn parse_document_xml(xml: &str) -> Result<XmlDocument> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    let body = find_child(root, "body").ok_or_else(|| CliError::MissingElement {
        element: "w:body".to_string(),
        context: format!("<{}>", get_tag_name(root)),
    })?;

    let mut document = Document::new();
    for child in element_children(body) {
        if has_tag(child, "p") {
            document.push(read_paragraph(child, xml));
        } else {
            let markup = &xml[child.range()];
            document.push(OpaqueBlock::new(get_tag_name(child)).with_markup(markup));
        }
    }

    tracing::debug!(elements = document.len(), "Parsed document.xml body");
    Ok(XmlDocument {
        body: document,
        envelope: Some(read_envelope(body, xml)),
        package: None,
    })
}

/// Split the source around the body's element children.
fn read_envelope(body: Node<'_, '_>, xml: &str) -> Envelope {
    let first = element_children(body).next();
    let last = element_children(body).last();

    if let (Some(first), Some(last)) = (first, last) {
        return Envelope {
            head: xml[..first.range().start].to_string(),
            tail: xml[last.range().end..].to_string(),
        };
    }

    // Empty or self-closing body: re-open it explicitly
    let tag = body
        .tag_name()
        .namespace()
        .and_then(|uri| body.lookup_prefix(uri))
        .map_or_else(|| "body".to_string(), |prefix| format!("{prefix}:body"));
    let range = body.range();
    Envelope {
        head: format!("{}<{tag}>", &xml[..range.start]),
        tail: format!("</{tag}>{}", &xml[range.end..]),
    }
}

fn read_paragraph(node: Node<'_, '_>, xml: &str) -> Paragraph {
    let mut runs = Vec::new();
    collect_runs(node, xml, &mut runs);

    Paragraph {
        runs,
        properties: find_child(node, "pPr").map(|p| xml[p.range()].to_string()),
        markup: Some(xml[node.range()].to_string()),
    }
}

fn collect_runs(node: Node<'_, '_>, xml: &str, runs: &mut Vec<Run>) {
    for child in element_children(node) {
        let tag = get_tag_name(child);
        if tag == "r" {
            runs.push(read_run(child, xml));
        } else if RUN_CONTAINERS.contains(&tag) {
            collect_runs(child, xml, runs);
        }
    }
}

fn read_run(node: Node<'_, '_>, xml: &str) -> Run {
    let mut text = String::new();
    let mut objects = Vec::new();
    for child in element_children(node) {
        match get_tag_name(child) {
            "t" => text.push_str(child.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            "rPr" => {}
            _ => objects.push(xml[child.range()].to_string()),
        }
    }

    let rpr = find_child(node, "rPr");
    let properties = rpr
        .map(|rpr| {
            element_children(rpr)
                .filter(|p| !STYLE_PROPERTIES.contains(&get_tag_name(*p)))
                .map(|p| xml[p.range()].to_string())
                .collect()
        })
        .unwrap_or_default();

    Run {
        text,
        style: rpr.map(read_style).unwrap_or_default(),
        properties,
        objects,
    }
}

fn read_style(rpr: Node<'_, '_>) -> RunStyle {
    let toggle = |tag: &str| {
        find_child(rpr, tag).is_some_and(|n| !matches!(get_val(n), Some("0" | "false" | "off")))
    };

    RunStyle {
        color: find_child(rpr, "color")
            .and_then(get_val)
            .filter(|v| *v != "auto")
            .map(String::from),
        bold: toggle("b"),
        italic: toggle("i"),
        underline: find_child(rpr, "u").is_some_and(|n| get_val(n) != Some("none")),
    }
}
