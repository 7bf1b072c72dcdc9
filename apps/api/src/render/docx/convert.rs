//! XHTML to WordprocessingML.
//!
//! Handles the subset of markup and inline CSS the resume builder emits:
//! block elements become paragraphs, inline elements become runs, and the
//! usual typographic properties map onto `w:pPr` / `w:rPr`.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("malformed markup: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("document has no text content")]
    EmptyDocument,

    #[error("packaging failed: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns an HTML document into a `.docx` package.
pub trait HtmlToDocx: Send + Sync {
    fn convert(&self, html: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Page setup in twentieths of a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for PageSetup {
    /// A4 with 40pt margins.
    fn default() -> Self {
        Self {
            width: 11906,
            height: 16838,
            margin: 800,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OoxmlConverter {
    pub page: PageSetup,
}

impl HtmlToDocx for OoxmlConverter {
    fn convert(&self, html: &str) -> Result<Vec<u8>, ConvertError> {
        let paragraphs = parse_paragraphs(html)?;
        if paragraphs.is_empty() {
            return Err(ConvertError::EmptyDocument);
        }
        let title = paragraphs
            .first()
            .map(Paragraph::plain_text)
            .unwrap_or_default();
        package(&document_xml(&paragraphs, &self.page), &title)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Justify {
    Left,
    Center,
    Right,
    Both,
}

impl Justify {
    fn as_ooxml(self) -> &'static str {
        match self {
            Justify::Left => "left",
            Justify::Center => "center",
            Justify::Right => "right",
            Justify::Both => "both",
        }
    }
}

/// Character formatting. Inherited through the element stack.
#[derive(Debug, Clone, Default, PartialEq)]
struct RunProps {
    font: Option<String>,
    /// Half-points.
    size: Option<u32>,
    bold: bool,
    italic: bool,
    color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BottomBorder {
    /// Eighths of a point.
    size: u32,
    color_hex: [u8; 6],
}

/// Paragraph formatting for one block element.
#[derive(Debug, Clone, Default, PartialEq)]
struct ParaProps {
    align: Option<Justify>,
    /// Twips.
    space_before: Option<u32>,
    space_after: Option<u32>,
    indent_left: Option<u32>,
    hanging: Option<u32>,
    border: Option<BottomBorder>,
}

/// Declarations recognised in a `style` attribute.
#[derive(Debug, Default)]
struct InlineStyle {
    run: RunOverrides,
    para: ParaProps,
}

#[derive(Debug, Default)]
struct RunOverrides {
    font: Option<String>,
    size: Option<u32>,
    bold: Option<bool>,
    italic: Option<bool>,
    color: Option<String>,
}

impl RunProps {
    fn with(&self, overrides: &RunOverrides) -> RunProps {
        RunProps {
            font: overrides.font.clone().or_else(|| self.font.clone()),
            size: overrides.size.or(self.size),
            bold: overrides.bold.unwrap_or(self.bold),
            italic: overrides.italic.unwrap_or(self.italic),
            color: overrides.color.clone().or_else(|| self.color.clone()),
        }
    }
}

fn parse_style(style: &str) -> InlineStyle {
    let mut parsed = InlineStyle::default();
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match property.trim().to_ascii_lowercase().as_str() {
            "font-family" => {
                parsed.run.font = value
                    .split(',')
                    .next()
                    .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
                    .filter(|f| !f.is_empty());
            }
            "font-size" => parsed.run.size = length_pt(value).map(|pt| (pt * 2.0).round() as u32),
            "font-weight" => parsed.run.bold = Some(value == "bold" || value == "700"),
            "font-style" => parsed.run.italic = Some(value == "italic"),
            "color" => parsed.run.color = parse_color(value).map(hex_string),
            "text-align" => {
                parsed.para.align = match value {
                    "center" => Some(Justify::Center),
                    "right" => Some(Justify::Right),
                    "justify" => Some(Justify::Both),
                    "left" => Some(Justify::Left),
                    _ => None,
                }
            }
            "margin-top" => parsed.para.space_before = length_pt(value).map(twips),
            "margin-bottom" => parsed.para.space_after = length_pt(value).map(twips),
            "margin-left" | "padding-left" => parsed.para.indent_left = length_pt(value).map(twips),
            "border-bottom" => parsed.para.border = parse_border(value),
            _ => {}
        }
    }
    parsed
}

/// Points from a `pt` or `px` length. Unitless numbers are points.
fn length_pt(value: &str) -> Option<f32> {
    let value = value.trim();
    let (number, factor) = if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 0.75)
    } else {
        (value, 1.0)
    };
    number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n * factor)
}

fn twips(pt: f32) -> u32 {
    (pt * 20.0).round() as u32
}

fn parse_color(value: &str) -> Option<[u8; 6]> {
    let hex = value.trim().strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let mut out = [0u8; 6];
    for (slot, c) in out.iter_mut().zip(expanded.chars()) {
        if !c.is_ascii_hexdigit() {
            return None;
        }
        *slot = c.to_ascii_uppercase() as u8;
    }
    Some(out)
}

fn hex_string(hex: [u8; 6]) -> String {
    hex.iter().map(|&b| b as char).collect()
}

/// `2px solid #4a6cf7`: width and color in any order; style is ignored.
fn parse_border(value: &str) -> Option<BottomBorder> {
    let mut size = None;
    let mut color = None;
    for part in value.split_whitespace() {
        if let Some(c) = parse_color(part) {
            color = Some(c);
        } else if let Some(pt) = length_pt(part) {
            size = Some(((pt * 8.0).round() as u32).max(2));
        }
    }
    if value.split_whitespace().any(|p| p == "none") {
        return None;
    }
    Some(BottomBorder {
        size: size.unwrap_or(4),
        color_hex: color.unwrap_or(*b"000000"),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section", "header",
    "footer", "table", "tr",
];
const SKIPPED_TAGS: &[&str] = &["head", "style", "script", "title"];

const DEFAULT_SPACE_AFTER: u32 = 40;
const LIST_INDENT: u32 = 360;
const LIST_HANGING: u32 = 180;
const BULLET: &str = "• ";

#[derive(Debug, Clone, PartialEq)]
enum Inline {
    Text(String, RunProps),
    Break,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Paragraph {
    props: ParaProps,
    content: Vec<Inline>,
}

impl Paragraph {
    fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|i| match i {
                Inline::Text(t, _) => t.as_str(),
                Inline::Break => " ",
            })
            .collect()
    }

    fn has_text(&self) -> bool {
        self.content
            .iter()
            .any(|i| matches!(i, Inline::Text(t, _) if !t.trim().is_empty()))
    }

    fn ends_with_space(&self) -> bool {
        match self.content.last() {
            Some(Inline::Text(t, _)) => t.ends_with(' '),
            Some(Inline::Break) | None => true,
        }
    }
}

#[derive(Debug)]
struct Frame {
    tag: String,
    run: RunProps,
    /// Present for block elements only.
    para: Option<ParaProps>,
}

#[derive(Default)]
struct Builder {
    stack: Vec<Frame>,
    current: Option<Paragraph>,
    paragraphs: Vec<Paragraph>,
}

impl Builder {
    fn run_props(&self) -> RunProps {
        self.stack.last().map(|f| f.run.clone()).unwrap_or_default()
    }

    fn push(&mut self, tag: String, element: &BytesStart<'_>) -> Result<(), ConvertError> {
        let style = match attribute(element, b"style")? {
            Some(style) => parse_style(&style),
            None => InlineStyle::default(),
        };
        let mut run = self.run_props().with(&style.run);
        match tag.as_str() {
            "b" | "strong" => run.bold = true,
            "i" | "em" => run.italic = true,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                run.bold = true;
                if style.run.size.is_none() {
                    run.size = Some(match tag.as_str() {
                        "h1" => 36,
                        "h2" => 28,
                        _ => 24,
                    });
                }
            }
            _ => {}
        }

        let para = if BLOCK_TAGS.contains(&tag.as_str()) {
            self.flush();
            let mut para = style.para;
            if para.align.is_none() {
                para.align = self.enclosing_block().and_then(|p| p.align);
            }
            if tag == "li" {
                para.indent_left.get_or_insert(LIST_INDENT);
                para.hanging.get_or_insert(LIST_HANGING);
            }
            Some(para)
        } else {
            None
        };

        self.stack.push(Frame { tag, run, para });
        Ok(())
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if frame.para.is_some() {
                self.flush();
            }
        }
    }

    fn enclosing_block(&self) -> Option<&ParaProps> {
        self.stack.iter().rev().find_map(|f| f.para.as_ref())
    }

    fn in_list_item(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|f| f.para.is_some())
            .map(|f| f.tag == "li")
            .unwrap_or(false)
    }

    fn new_paragraph(&self) -> Paragraph {
        let mut paragraph = Paragraph {
            props: self.enclosing_block().cloned().unwrap_or_default(),
            content: Vec::new(),
        };
        if self.in_list_item() {
            paragraph
                .content
                .push(Inline::Text(BULLET.to_string(), self.run_props()));
        }
        paragraph
    }

    fn open_paragraph(&mut self) -> &mut Paragraph {
        if self.current.is_none() {
            self.current = Some(self.new_paragraph());
        }
        self.current.get_or_insert_with(Paragraph::default)
    }

    fn text(&mut self, raw: &str) {
        let collapsed = collapse_whitespace(raw);
        if collapsed.is_empty() || (collapsed == " " && self.current.is_none()) {
            return;
        }
        let props = self.run_props();
        let paragraph = self.open_paragraph();
        let text = if paragraph.ends_with_space() || !paragraph.has_text() {
            collapsed.trim_start().to_string()
        } else {
            collapsed
        };
        if !text.is_empty() {
            paragraph.content.push(Inline::Text(text, props));
        }
    }

    fn line_break(&mut self) {
        self.open_paragraph().content.push(Inline::Break);
    }

    fn flush(&mut self) {
        let Some(mut paragraph) = self.current.take() else {
            return;
        };
        if let Some(Inline::Text(last, _)) = paragraph.content.last_mut() {
            let trimmed = last.trim_end().len();
            last.truncate(trimmed);
        }
        if paragraph.has_text() {
            self.paragraphs.push(paragraph);
        }
    }
}

/// Whether `c` may appear in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (c >= '\u{20}' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

/// Drops characters XML 1.0 forbids. Borrowed when nothing needs removing.
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            if is_xml_char(c) {
                out.push(c);
                in_space = false;
            }
        }
    }
    out
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).to_ascii_lowercase()
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ConvertError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_paragraphs(html: &str) -> Result<Vec<Paragraph>, ConvertError> {
    let mut reader = Reader::from_str(html);
    let mut builder = Builder::default();
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = local_name(&e);
                if skip_depth > 0 || SKIPPED_TAGS.contains(&tag.as_str()) {
                    skip_depth += 1;
                    continue;
                }
                builder.push(tag, &e)?;
            }
            Event::End(_) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    builder.pop();
                }
            }
            Event::Empty(e) => {
                if skip_depth == 0 && local_name(&e) == "br" {
                    builder.line_break();
                }
            }
            Event::Text(t) => {
                if skip_depth == 0 {
                    builder.text(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if skip_depth == 0 {
                    builder.text(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    builder.flush();
    Ok(builder.paragraphs)
}

// ────────────────────────────────────────────────────────────────────────────
// Serialization
// ────────────────────────────────────────────────────────────────────────────

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn document_xml(paragraphs: &[Paragraph], page: &PageSetup) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<w:document xmlns:w="{WORD_NS}"><w:body>"#));
    for paragraph in paragraphs {
        write_paragraph(&mut xml, paragraph);
    }
    xml.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
        w = page.width,
        h = page.height,
        m = page.margin,
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    let props = &paragraph.props;
    xml.push_str("<w:p><w:pPr>");
    if let Some(border) = props.border {
        xml.push_str(&format!(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="{}" w:space="1" w:color="{}"/></w:pBdr>"#,
            border.size,
            hex_string(border.color_hex)
        ));
    }
    xml.push_str(&format!(
        r#"<w:spacing w:before="{}" w:after="{}"/>"#,
        props.space_before.unwrap_or(0),
        props.space_after.unwrap_or(DEFAULT_SPACE_AFTER)
    ));
    if props.indent_left.is_some() || props.hanging.is_some() {
        xml.push_str(&format!(
            r#"<w:ind w:left="{}" w:hanging="{}"/>"#,
            props.indent_left.unwrap_or(0),
            props.hanging.unwrap_or(0)
        ));
    }
    if let Some(align) = props.align {
        xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, align.as_ooxml()));
    }
    xml.push_str("</w:pPr>");

    for inline in &paragraph.content {
        match inline {
            Inline::Text(text, run) => {
                xml.push_str("<w:r>");
                write_run_props(xml, run);
                xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
                    escape(text.as_str())
                ));
            }
            Inline::Break => xml.push_str("<w:r><w:br/></w:r>"),
        }
    }
    xml.push_str("</w:p>");
}

fn write_run_props(xml: &mut String, run: &RunProps) {
    if *run == RunProps::default() {
        return;
    }
    xml.push_str("<w:rPr>");
    if let Some(font) = &run.font {
        let font = escape(font.as_str());
        xml.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
        ));
    }
    if run.bold {
        xml.push_str("<w:b/>");
    }
    if run.italic {
        xml.push_str("<w:i/>");
    }
    if let Some(color) = &run.color {
        xml.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
    }
    if let Some(size) = run.size {
        xml.push_str(&format!(r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#));
    }
    xml.push_str("</w:rPr>");
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

fn core_properties(title: &str) -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"{XML_DECLARATION}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>resume-api</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#,
        escape(&xml_safe(title))
    )
}

fn package(document: &str, title: &str) -> Result<Vec<u8>, ConvertError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("docProps/core.xml", core_properties(title)),
        ("word/document.xml", document.to_string()),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        let mut part = archive.by_name(name).expect("part exists");
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = OoxmlConverter::default()
            .convert("<html><body><p>Hello</p></body></html>")
            .unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/document.xml",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("Hello"));
        assert!(document.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    }

    #[test]
    fn test_inline_styles_become_run_and_paragraph_properties() {
        let html = r#"<body style="font-family: Georgia, serif; font-size: 8pt">
            <div style="font-size: 10pt; font-weight: bold; color: #2c3e50; border-bottom: 2px solid #2c3e50; text-align: center">EXPERIENCE</div>
        </body>"#;
        let paragraphs = parse_paragraphs(html).unwrap();
        assert_eq!(paragraphs.len(), 1);
        let mut xml = String::new();
        write_paragraph(&mut xml, &paragraphs[0]);
        assert!(xml.contains(r#"<w:bottom w:val="single" w:sz="12" w:space="1" w:color="2C3E50"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
        assert!(xml.contains(r#"<w:rFonts w:ascii="Georgia""#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:color w:val="2C3E50"/>"#));
        assert!(xml.contains(r#"<w:sz w:val="20"/>"#));
    }

    #[test]
    fn test_list_items_get_bullets_and_indent() {
        let paragraphs = parse_paragraphs("<ul><li>First</li><li>Second</li></ul>").unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].plain_text(), "• First");
        assert_eq!(paragraphs[1].props.indent_left, Some(LIST_INDENT));
    }

    #[test]
    fn test_whitespace_collapses_and_spans_stay_inline() {
        let paragraphs = parse_paragraphs(
            "<div>\n  <span style=\"font-weight: bold\">Languages:</span>   Rust,\n Go  </div>",
        )
        .unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].plain_text(), "Languages: Rust, Go");
        match &paragraphs[0].content[0] {
            Inline::Text(text, run) => {
                assert_eq!(text, "Languages:");
                assert!(run.bold);
            }
            other => panic!("expected text run, got {other:?}"),
        }
    }

    #[test]
    fn test_head_content_is_ignored() {
        let paragraphs = parse_paragraphs(
            "<html><head><title>T</title><style>.x { color: red; }</style></head><body><p>Body</p></body></html>",
        )
        .unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].plain_text(), "Body");
    }

    #[test]
    fn test_malformed_markup_is_an_error() {
        let err = OoxmlConverter::default()
            .convert("<html><body><p>Unclosed</div></body></html>")
            .unwrap_err();
        assert!(matches!(err, ConvertError::Markup(_)), "got {err:?}");
    }

    #[test]
    fn test_document_without_text_is_rejected() {
        let err = OoxmlConverter::default()
            .convert("<html><body><div>  </div></body></html>")
            .unwrap_err();
        assert!(matches!(err, ConvertError::EmptyDocument));
    }

    #[test]
    fn test_text_is_escaped_in_document_xml() {
        let bytes = OoxmlConverter::default()
            .convert("<p>R&amp;D &lt;team&gt;</p>")
            .unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("R&amp;D &lt;team&gt;"));
    }

    #[test]
    fn test_control_characters_never_reach_document_xml() {
        let bytes = OoxmlConverter::default()
            .convert("<p>Jane\u{1}\u{B}Doe\u{FFFF}</p>")
            .unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.chars().all(is_xml_char));
        assert!(document.contains("Jane Doe"));
        assert_eq!(xml_safe("tab\tok"), "tab\tok");
        assert_eq!(xml_safe("a\u{0}b\u{1F}c"), "abc");
    }
}
