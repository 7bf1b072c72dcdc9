//! Serializes laid-out pages into a PDF with lopdf.
//!
//! Text uses the standard Type1 fonts with WinAnsiEncoding, so nothing is
//! embedded. Characters WinAnsi cannot represent are written as `?`.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::layout::{DrawOp, FontFace, Page, PageGeometry, Rgb, TextRun};
use crate::models::ResumeDocument;
use crate::render::RenderError;

/// Distance from the top of a line box to its baseline, as a multiple of
/// the font size.
const BASELINE_RATIO: f32 = 0.9;

/// Values for the document Info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
}

impl DocumentInfo {
    pub fn for_resume(doc: &ResumeDocument) -> Self {
        let name = doc.name().unwrap_or("Resume");
        Self {
            title: format!("Resume - {name}"),
            author: name.to_string(),
            subject: doc.title().unwrap_or("Professional Resume").to_string(),
            keywords: "resume, cv, professional".to_string(),
        }
    }
}

/// Assigns resource names (`F1`, `F2`, ...) to the faces a document uses.
#[derive(Default)]
struct FontResources {
    keys: HashMap<FontFace, String>,
    order: Vec<FontFace>,
}

impl FontResources {
    fn key(&mut self, face: FontFace) -> String {
        if let Some(key) = self.keys.get(&face) {
            return key.clone();
        }
        let key = format!("F{}", self.order.len() + 1);
        self.keys.insert(face, key.clone());
        self.order.push(face);
        key
    }
}

pub fn write_pdf(
    pages: &[Page],
    geometry: &PageGeometry,
    info: &DocumentInfo,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut fonts = FontResources::default();

    let mut contents = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page, geometry, &mut fonts);
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        contents.push(encoded);
    }

    let mut font_dict = Dictionary::new();
    for face in &fonts.order {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        if let Some(key) = fonts.keys.get(face) {
            font_dict.set(key.as_bytes().to_vec(), Object::Reference(font_id));
        }
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_dict,
    });

    let mut kids = Vec::with_capacity(contents.len());
    for encoded in contents {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&info.title)),
        "Author" => Object::string_literal(encode_win_ansi(&info.author)),
        "Subject" => Object::string_literal(encode_win_ansi(&info.subject)),
        "Keywords" => Object::string_literal(encode_win_ansi(&info.keywords)),
        "Creator" => Object::string_literal("resume-api"),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

fn page_content(page: &Page, geometry: &PageGeometry, fonts: &mut FontResources) -> Content {
    let mut operations = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text(run) => text_operations(run, geometry, fonts, &mut operations),
            DrawOp::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                let pdf_y = geometry.height - y;
                operations.push(Operation::new("w", vec![(*width).into()]));
                operations.push(stroke_color(*color));
                operations.push(Operation::new("m", vec![(*x1).into(), pdf_y.into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), pdf_y.into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    Content { operations }
}

fn text_operations(
    run: &TextRun,
    geometry: &PageGeometry,
    fonts: &mut FontResources,
    operations: &mut Vec<Operation>,
) {
    let key = fonts.key(run.face);
    let baseline = geometry.height - (run.y + run.size * BASELINE_RATIO);
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![Object::Name(key.into_bytes()), run.size.into()],
    ));
    operations.push(fill_color(run.color));
    operations.push(Operation::new("Tw", vec![run.word_spacing.into()]));
    operations.push(Operation::new("Td", vec![run.x.into(), baseline.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
}

fn fill_color(color: Rgb) -> Operation {
    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()])
}

fn stroke_color(color: Rgb) -> Operation {
    Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()])
}

/// Encodes text as WinAnsi (Windows-1252) bytes.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}
