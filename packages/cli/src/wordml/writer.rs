//! Serialize the block model back to `document.xml`.

use std::io::{self, Write as _};

use condoc_engine::{Element, Paragraph, Run, RunStyle};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::XmlDocument;
use crate::config::WORDML_NAMESPACE;
use crate::error::Result;

/// `w:rPr` children in schema order.
///
/// Children not listed keep their relative order after the listed ones.
const RUN_PROPERTY_ORDER: &[&str] = &[
    "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps", "smallCaps", "strike", "dstrike",
    "outline", "shadow", "emboss", "imprint", "noProof", "snapToGrid", "vanish", "webHidden",
    "color", "spacing", "w", "kern", "position", "sz", "szCs", "highlight", "u", "effect", "bdr",
    "shd", "fitText", "vertAlign", "rtl", "cs", "em", "lang", "eastAsianLayout", "specVanish",
    "oMath",
];

type XmlWriter = Writer<Vec<u8>>;

/// Generate a complete `document.xml` for the attached body elements.
///
/// Paragraphs that still hold their source markup and opaque blocks are
/// written back verbatim; rewritten paragraphs are rebuilt from their runs.
/// Everything outside the body's children comes from the source envelope,
/// or a minimal `w:document` root when there is none.
///
/// # Errors
/// Returns [`CliError::Io`](crate::error::CliError::Io) if the writer fails.
pub fn generate_document_xml(document: &XmlDocument) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    match &document.envelope {
        Some(envelope) => writer.get_mut().write_all(envelope.head.as_bytes())?,
        None => {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
            writer.get_mut().write_all(b"\n")?;
            writer.write_event(Event::Start(
                BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NAMESPACE)]),
            ))?;
            writer.write_event(Event::Start(BytesStart::new("w:body")))?;
        }
    }

    for element in document.body.elements() {
        match element {
            Element::Paragraph(paragraph) => write_paragraph(&mut writer, paragraph)?,
            Element::Opaque(block) => match &block.markup {
                Some(markup) => writer.get_mut().write_all(markup.as_bytes())?,
                None => tracing::warn!(kind = %block.kind, "Dropping opaque block without markup"),
            },
        }
    }

    match &document.envelope {
        Some(envelope) => writer.get_mut().write_all(envelope.tail.as_bytes())?,
        None => {
            writer.write_event(Event::End(BytesEnd::new("w:body")))?;
            writer.write_event(Event::End(BytesEnd::new("w:document")))?;
            writer.get_mut().write_all(b"\n")?;
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn write_paragraph(writer: &mut XmlWriter, paragraph: &Paragraph) -> io::Result<()> {
    if let Some(markup) = &paragraph.markup {
        return writer.get_mut().write_all(markup.as_bytes());
    }

    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    if let Some(properties) = &paragraph.properties {
        writer.get_mut().write_all(properties.as_bytes())?;
    }
    for run in &paragraph.runs {
        write_run(writer, run)?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))
}

fn write_run(writer: &mut XmlWriter, run: &Run) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    write_run_properties(writer, &run.style, &run.properties)?;

    let mut segments = run.text.split(['\t', '\n']);
    let mut breaks = run.text.matches(['\t', '\n']);
    if let Some(first) = segments.next() {
        write_text(writer, first)?;
    }
    for segment in segments {
        let tag = if breaks.next() == Some("\t") { "w:tab" } else { "w:br" };
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        write_text(writer, segment)?;
    }

    for object in &run.objects {
        writer.get_mut().write_all(object.as_bytes())?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:r")))
}

fn write_text(writer: &mut XmlWriter, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(
        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))
}

enum RunProperty<'a> {
    Bold,
    Italic,
    Color(&'a str),
    Underline,
    Raw(&'a str),
}

impl RunProperty<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Color(_) => "color",
            Self::Underline => "u",
            Self::Raw(markup) => local_name(markup),
        }
    }

    fn rank(&self) -> usize {
        let name = self.name();
        RUN_PROPERTY_ORDER
            .iter()
            .position(|known| *known == name)
            .unwrap_or(RUN_PROPERTY_ORDER.len())
    }
}

/// Emit `w:rPr` with the modelled style merged into the carried properties.
fn write_run_properties(
    writer: &mut XmlWriter,
    style: &RunStyle,
    raw: &[String],
) -> io::Result<()> {
    let mut properties: Vec<RunProperty<'_>> =
        raw.iter().map(|m| RunProperty::Raw(m.as_str())).collect();
    if style.bold {
        properties.push(RunProperty::Bold);
    }
    if style.italic {
        properties.push(RunProperty::Italic);
    }
    if let Some(color) = &style.color {
        properties.push(RunProperty::Color(color.as_str()));
    }
    if style.underline {
        properties.push(RunProperty::Underline);
    }
    if properties.is_empty() {
        return Ok(());
    }
    properties.sort_by_key(RunProperty::rank);

    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    for property in &properties {
        let element = match property {
            RunProperty::Raw(markup) => {
                writer.get_mut().write_all(markup.as_bytes())?;
                continue;
            }
            RunProperty::Bold => BytesStart::new("w:b"),
            RunProperty::Italic => BytesStart::new("w:i"),
            RunProperty::Color(color) => {
                BytesStart::new("w:color").with_attributes([("w:val", *color)])
            }
            RunProperty::Underline => {
                BytesStart::new("w:u").with_attributes([("w:val", "single")])
            }
        };
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))
}

/// Local name of the first element in a raw markup fragment.
fn local_name(markup: &str) -> &str {
    let name = markup.trim_start().trim_start_matches('<');
    let end = name
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(name.len());
    let qualified = &name[..end];
    qualified.rsplit(':').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordml::parse_document_xml;
    use condoc_engine::{DataContext, Document, OpaqueBlock, TagParser};
    use pretty_assertions::assert_eq;

    fn body_of(xml: &str) -> &str {
        let start = xml.find("<w:body>").map_or(0, |i| i + "<w:body>".len());
        let end = xml.find("</w:body>").unwrap_or(xml.len());
        &xml[start..end]
    }

    fn source(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WORDML_NAMESPACE}" xmlns:wp="urn:wp" xmlns:mc="urn:mc" mc:Ignorable="wp"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(r#"<w:sz w:val="48"/>"#), "sz");
        assert_eq!(local_name("<w14:ligatures/>"), "ligatures");
        assert_eq!(local_name("<highlight>"), "highlight");
    }

    #[test]
    fn test_writes_styled_run() {
        let mut body = Document::new();
        body.push(Paragraph::new(vec![Run::new("Hi & <bye>").with_style(RunStyle {
            color: Some("000000".to_string()),
            bold: true,
            ..RunStyle::default()
        })]));

        let xml = generate_document_xml(&XmlDocument::from_document(body)).unwrap();

        assert_eq!(
            body_of(&xml),
            r#"<w:p><w:r><w:rPr><w:b/><w:color w:val="000000"/></w:rPr><w:t xml:space="preserve">Hi &amp; &lt;bye&gt;</w:t></w:r></w:p>"#
        );
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains(&format!(r#"xmlns:w="{WORDML_NAMESPACE}""#)));
    }

    #[test]
    fn test_writes_tabs_breaks_and_empty_runs() {
        let mut body = Document::new();
        body.push(Paragraph::new(vec![Run::new("a\tb\n"), Run::new("")]));

        let xml = generate_document_xml(&XmlDocument::from_document(body)).unwrap();

        assert_eq!(
            body_of(&xml),
            r#"<w:p><w:r><w:t xml:space="preserve">a</w:t><w:tab/><w:t xml:space="preserve">b</w:t><w:br/></w:r><w:r></w:r></w:p>"#
        );
    }

    #[test]
    fn test_merges_carried_properties_in_schema_order() {
        let mut run = Run::new("x").with_style(RunStyle {
            color: Some("000000".to_string()),
            bold: true,
            ..RunStyle::default()
        });
        run.properties = vec![
            r#"<w:sz w:val="48"/>"#.to_string(),
            r#"<w:rFonts w:ascii="Arial"/>"#.to_string(),
        ];
        run.objects = vec!["<w:drawing/>".to_string()];
        let mut body = Document::new();
        body.push(Paragraph::new(vec![run]));

        let xml = generate_document_xml(&XmlDocument::from_document(body)).unwrap();

        assert_eq!(
            body_of(&xml),
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:b/><w:color w:val="000000"/><w:sz w:val="48"/></w:rPr><w:t xml:space="preserve">x</w:t><w:drawing/></w:r></w:p>"#
        );
    }

    #[test]
    fn test_opaque_markup_verbatim() {
        let mut body = Document::new();
        body.push(OpaqueBlock::new("tbl").with_markup("<w:tbl><w:tr/></w:tbl>"));
        body.push(OpaqueBlock::new("bare"));

        let xml = generate_document_xml(&XmlDocument::from_document(body)).unwrap();

        assert_eq!(body_of(&xml), "<w:tbl><w:tr/></w:tbl>");
    }

    #[test]
    fn test_untouched_document_is_byte_identical() {
        let xml = source(concat!(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#,
            r#"<w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:sz w:val="48"/><w:highlight w:val="yellow"/></w:rPr><w:t>Big plain heading</w:t></w:r>"#,
            r#"<w:r><w:drawing><wp:inline><wp:extent cx="1" cy="1"/></wp:inline></w:drawing></w:r></w:p>"#,
            r#"<w:p><w:bookmarkStart w:id="0" w:name="b"/><w:r><w:t>1 &lt; 2</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
            r#"<w:tbl/><w:sectPr/>"#,
        ));

        let parsed = parse_document_xml(&xml).unwrap();
        let written = generate_document_xml(&parsed).unwrap();

        assert_eq!(written, xml);
    }

    #[test]
    fn test_substituted_paragraph_keeps_size_and_drawing() {
        let xml = source(concat!(
            r#"<w:p><w:r><w:rPr><w:sz w:val="48"/></w:rPr><w:t>Plain</w:t></w:r><w:r><w:drawing><wp:inline/></w:drawing></w:r></w:p>"#,
            r#"<w:p><w:r><w:rPr><w:sz w:val="48"/><w:color w:val="FF0000"/></w:rPr><w:t>Hi &lt;IF=vip&gt;friend&lt;/IF&gt;</w:t></w:r><w:r><w:drawing><wp:inline/></w:drawing></w:r></w:p>"#,
        ));
        let data = DataContext::new(r#"{"vip": "yes"}"#).unwrap();
        let mut parsed = parse_document_xml(&xml).unwrap();

        TagParser::new(&data).process_document(&mut parsed.body);
        let written = generate_document_xml(&parsed).unwrap();

        assert!(written.contains(
            r#"<w:p><w:r><w:rPr><w:sz w:val="48"/></w:rPr><w:t>Plain</w:t></w:r><w:r><w:drawing><wp:inline/></w:drawing></w:r></w:p>"#
        ));
        assert!(written.contains(
            r#"<w:p><w:r><w:rPr><w:color w:val="000000"/><w:sz w:val="48"/></w:rPr><w:t xml:space="preserve">Hi friend</w:t></w:r><w:r><w:drawing><wp:inline/></w:drawing></w:r></w:p>"#
        ));
        assert!(written.contains(r#"mc:Ignorable="wp""#));
    }

    #[test]
    fn test_reparse_rebuilt_paragraphs() {
        let mut body = Document::new();
        body.push(Paragraph::new(vec![Run::new("1 < 2").with_style(RunStyle {
            italic: true,
            ..RunStyle::default()
        })]));
        body.push(OpaqueBlock::new("tbl").with_markup("<w:tbl/>"));

        let written = generate_document_xml(&XmlDocument::from_document(body)).unwrap();
        let reparsed = parse_document_xml(&written).unwrap();

        assert_eq!(reparsed.body.elements().count(), 2);
        assert_eq!(reparsed.body.paragraph_texts(), vec!["1 < 2"]);
        let Some(Element::Paragraph(paragraph)) = reparsed.body.elements().next() else {
            panic!("expected paragraph");
        };
        assert!(paragraph.runs[0].style.italic);
    }
}
