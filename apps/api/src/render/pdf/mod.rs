//! Paginated PDF resume.
//!
//! Content is flowed onto A4 pages by [`FlowLayout`]; page overlays (footer,
//! repeated name header, multi-page note) are stamped afterwards once the
//! page count is known; [`writer`] serializes the draw lists with lopdf.

pub mod writer;

use tracing::debug;

use crate::layout::{
    font_metrics::get_metrics, Align, DrawOp, FlowLayout, FontFace, Page, PageGeometry, Rgb,
    TextRun, TextStyle,
};
use crate::models::resume::{present, ResumeDocument};
use crate::render::dates::{format_date, format_range};
use crate::render::{RenderError, RenderTarget, Renderer, Theme};

use writer::{write_pdf, DocumentInfo};

// Height estimates used to keep blocks together, in points.
const SECTION_LEAD: f32 = 50.0;
const LANGUAGE_LEAD: f32 = 30.0;
const ENTRY_BASE: f32 = 50.0;
const PROJECT_BASE: f32 = 30.0;
const PROJECT_DESCRIPTION: f32 = 20.0;
const CERTIFICATION_BLOCK: f32 = 40.0;
const SKILL_ROW: f32 = 15.0;

const BULLET_INDENT: f32 = 15.0;
const BULLET_GAP: f32 = 5.0;
const ENTRY_GAP: f32 = 5.0;
const SECTION_GAP: f32 = 10.0;
const SKILLS_PER_ROW: usize = 3;
const MAX_SKILL_ITEMS: usize = 5;

const FOOTER_OFFSET: f32 = 30.0;
const NOTE_OFFSET: f32 = 50.0;
const FOOTER_SIZE: f32 = 8.0;
const NOTE_SIZE: f32 = 7.0;
const RUNNING_HEADER_Y: f32 = 20.0;
const RUNNING_HEADER_SIZE: f32 = 10.0;
const RUNNING_RULE_Y: f32 = 35.0;
const MULTI_PAGE_NOTE: &str = "This resume spans multiple pages with all content included.";

pub struct PdfRenderer;

impl Renderer for PdfRenderer {
    fn render(
        &self,
        doc: &ResumeDocument,
        theme: &Theme,
        target: &RenderTarget,
    ) -> Result<(), RenderError> {
        let bytes = render_pdf(doc, theme)?;
        target.write_output(&bytes)
    }
}

pub fn render_pdf(doc: &ResumeDocument, theme: &Theme) -> Result<Vec<u8>, RenderError> {
    let geometry = PageGeometry::a4();
    let pages = layout_resume(doc, theme, geometry);
    debug!("PDF layout produced {} page(s)", pages.len());
    write_pdf(&pages, &geometry, &DocumentInfo::for_resume(doc))
}

/// Flows the whole resume and applies page overlays.
pub fn layout_resume(doc: &ResumeDocument, theme: &Theme, geometry: PageGeometry) -> Vec<Page> {
    let mut composer = Composer::new(theme, geometry);
    composer.header(doc);
    composer.summary(doc);
    composer.experience(doc);
    composer.education(doc);
    composer.skills(doc);
    composer.projects(doc);
    composer.certifications(doc);
    composer.languages(doc);
    composer.achievements(doc);

    let mut pages = composer.flow.finish();
    apply_overlays(&mut pages, doc.name().unwrap_or("No Name"), theme, &geometry);
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Content flow
// ────────────────────────────────────────────────────────────────────────────

struct Styles {
    name: TextStyle,
    title: TextStyle,
    section: TextStyle,
    entry: TextStyle,
    body: TextStyle,
}

struct Composer {
    flow: FlowLayout,
    styles: Styles,
}

impl Composer {
    fn new(theme: &Theme, geometry: PageGeometry) -> Self {
        let family = theme.pdf_family();
        let scale = theme.scale;
        let style = |bold: bool, size: f32, color: Rgb| TextStyle {
            face: FontFace { family, bold },
            size,
            color,
        };
        Self {
            flow: FlowLayout::new(geometry),
            styles: Styles {
                name: style(true, scale.name, Rgb::BLACK),
                title: style(false, scale.title, Rgb::BLACK),
                section: style(true, scale.section, theme.configured_accent),
                entry: style(true, scale.entry, Rgb::BLACK),
                body: style(false, scale.body, Rgb::BLACK),
            },
        }
    }

    fn left(&self) -> f32 {
        self.flow.geometry().margin
    }

    fn width(&self) -> f32 {
        self.flow.geometry().content_width()
    }

    fn text(&mut self, text: &str, style: TextStyle) {
        let (x, width) = (self.left(), self.width());
        self.flow.place_paragraph(text, &style, x, width, Align::Left);
    }

    fn section_header(&mut self, title: &str, lead: f32) {
        self.flow.ensure_space(lead);
        let style = self.styles.section;
        self.text(title, style);
        self.flow.advance(3.0);
    }

    fn bullet_height(&self, text: &str) -> f32 {
        self.flow
            .measure_paragraph(&format!("• {text}"), &self.styles.body, self.width() - BULLET_INDENT)
    }

    /// Keeps an entry together when it fits on a page; oversized entries
    /// only reserve room for their head and first block.
    fn reserve_entry(&mut self, estimate: f32, head: f32) {
        let page_capacity = self.flow.geometry().content_bottom() - self.flow.geometry().margin;
        if estimate <= page_capacity {
            self.flow.ensure_space(estimate);
        } else {
            self.flow.ensure_space(head);
        }
    }

    /// Bullet list with a context line when a bullet lands on a new page.
    fn bullets(&mut self, items: &[String], context: &str) {
        let body = self.styles.body;
        let entry = self.styles.entry;
        let x = self.left() + BULLET_INDENT;
        let width = self.width() - BULLET_INDENT;

        for item in items {
            let height = self.bullet_height(item);
            if self.flow.ensure_space(height) {
                self.text(&format!("{context} (continued)"), entry);
                self.flow.advance(2.0);
            }
            self.flow
                .place_paragraph(&format!("• {item}"), &body, x, width, Align::Left);
            self.flow.advance(BULLET_GAP);
        }
    }

    fn header(&mut self, doc: &ResumeDocument) {
        let (name, title, body) = (self.styles.name, self.styles.title, self.styles.body);
        self.flow.place_centered(doc.name().unwrap_or("No Name"), &name);
        self.flow.advance(2.0);
        self.flow.place_centered(doc.title().unwrap_or("No Title"), &title);

        let location = doc.location();
        let contact: Vec<String> = [
            ("Email", doc.email()),
            ("Phone", doc.phone()),
            ("Location", location.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
        .collect();
        if !contact.is_empty() {
            self.flow.advance(3.0);
            self.flow.place_centered(&contact.join(" | "), &body);
        }
        self.flow.advance(SECTION_GAP);
    }

    fn summary(&mut self, doc: &ResumeDocument) {
        let Some(summary) = doc.summary() else {
            return;
        };
        self.section_header("SUMMARY", SECTION_LEAD);
        let (x, width, body) = (self.left(), self.width(), self.styles.body);
        self.flow.place_paragraph(summary, &body, x, width, Align::Justify);
        self.flow.advance(SECTION_GAP);
    }

    fn experience(&mut self, doc: &ResumeDocument) {
        if doc.experience.is_empty() {
            return;
        }
        self.section_header("EXPERIENCE", SECTION_LEAD);
        let (entry, body) = (self.styles.entry, self.styles.body);

        for exp in &doc.experience {
            let title = present(&exp.title).unwrap_or("Position");
            let company = present(&exp.company).unwrap_or("Company");

            let first_block = match exp.highlights.first() {
                Some(first) => self.bullet_height(first) + BULLET_GAP,
                None => present(&exp.description)
                    .map(|d| self.flow.measure_paragraph(d, &body, self.width()) + BULLET_GAP)
                    .unwrap_or(0.0),
            };
            let rest: f32 = exp
                .highlights
                .iter()
                .skip(1)
                .map(|h| self.bullet_height(h) + BULLET_GAP)
                .sum();
            self.reserve_entry(ENTRY_BASE + first_block + rest, ENTRY_BASE + first_block);

            self.text(&format!("{title} at {company}"), entry);
            let range = format_range(present(&exp.start_date), present(&exp.end_date));
            self.text(&range, body);
            if let Some(location) = exp.location_text() {
                self.text(&location, body);
            }
            self.flow.advance(3.0);

            if !exp.highlights.is_empty() {
                self.bullets(&exp.highlights, title);
            } else if let Some(description) = present(&exp.description) {
                self.text(description, body);
                self.flow.advance(BULLET_GAP);
            }
            self.flow.advance(ENTRY_GAP);
        }
        self.flow.advance(SECTION_GAP);
    }

    fn education(&mut self, doc: &ResumeDocument) {
        if doc.education.is_empty() {
            return;
        }
        self.section_header("EDUCATION", SECTION_LEAD);
        let (entry, body) = (self.styles.entry, self.styles.body);

        for edu in &doc.education {
            self.flow.ensure_space(ENTRY_BASE);
            if let Some(degree) = edu.degree_line() {
                self.text(&degree, entry);
            }
            if let Some(institution) = edu.institution_name() {
                self.text(institution, body);
            }
            if present(&edu.start_date).is_some() || present(&edu.end_date).is_some() {
                let range = format_range(present(&edu.start_date), present(&edu.end_date));
                self.text(&range, body);
            }
            if let Some(gpa) = present(&edu.gpa) {
                self.text(&format!("GPA: {gpa}"), body);
            }
            self.flow.advance(ENTRY_GAP);
        }
        self.flow.advance(SECTION_GAP);
    }

    fn skills(&mut self, doc: &ResumeDocument) {
        let labels: Vec<String> = doc
            .skills
            .iter()
            .filter_map(|s| s.label(Some(MAX_SKILL_ITEMS)))
            .collect();
        if labels.is_empty() {
            return;
        }
        self.section_header("SKILLS", SECTION_LEAD);
        let body = self.styles.body;

        for row in labels.chunks(SKILLS_PER_ROW) {
            let line = row.join(" | ");
            let height = self.flow.measure_paragraph(&line, &body, self.width());
            self.flow.ensure_space(height.max(SKILL_ROW));
            self.text(&line, body);
            self.flow.advance(3.0);
        }
        self.flow.advance(SECTION_GAP);
    }

    fn projects(&mut self, doc: &ResumeDocument) {
        if doc.projects.is_empty() {
            return;
        }
        self.section_header("PROJECTS", SECTION_LEAD);
        let (entry, body) = (self.styles.entry, self.styles.body);

        for project in &doc.projects {
            let name = present(&project.name).unwrap_or("Project");
            let description = present(&project.description);

            let described = if description.is_some() { PROJECT_DESCRIPTION } else { 0.0 };
            let bullets: f32 = project
                .highlights
                .iter()
                .map(|h| self.bullet_height(h) + BULLET_GAP)
                .sum();
            self.reserve_entry(PROJECT_BASE + described + bullets, PROJECT_BASE + described);

            self.text(name, entry);
            if present(&project.start_date).is_some() || present(&project.end_date).is_some() {
                let range = format_range(present(&project.start_date), present(&project.end_date));
                self.text(&range, body);
            }
            if let Some(description) = description {
                self.text(description, body);
            }
            self.flow.advance(3.0);
            self.bullets(&project.highlights, name);
            self.flow.advance(ENTRY_GAP);
        }
        self.flow.advance(SECTION_GAP);
    }

    fn certifications(&mut self, doc: &ResumeDocument) {
        if doc.certifications.is_empty() {
            return;
        }
        self.section_header("CERTIFICATIONS", SECTION_LEAD);
        let (entry, body) = (self.styles.entry, self.styles.body);

        for cert in &doc.certifications {
            self.flow.ensure_space(CERTIFICATION_BLOCK);
            self.text(present(&cert.name).unwrap_or("Certification"), entry);
            let mut details = Vec::new();
            if let Some(issuer) = present(&cert.issuer) {
                details.push(format!("Issuer: {issuer}"));
            }
            if let Some(date) = present(&cert.date) {
                details.push(format!("Date: {}", format_date(date)));
            }
            if !details.is_empty() {
                self.text(&details.join(" | "), body);
            }
            self.flow.advance(ENTRY_GAP);
        }
        self.flow.advance(SECTION_GAP);
    }

    fn languages(&mut self, doc: &ResumeDocument) {
        if doc.languages.is_empty() {
            return;
        }
        self.section_header("LANGUAGES", LANGUAGE_LEAD);
        let line = doc
            .languages
            .iter()
            .map(|l| l.label())
            .collect::<Vec<_>>()
            .join(" | ");
        let body = self.styles.body;
        self.text(&line, body);
        self.flow.advance(SECTION_GAP);
    }

    fn achievements(&mut self, doc: &ResumeDocument) {
        if doc.achievements.is_empty() {
            return;
        }
        self.section_header("ACHIEVEMENTS", SECTION_LEAD);
        let (entry, body) = (self.styles.entry, self.styles.body);

        for achievement in &doc.achievements {
            self.flow.ensure_space(CERTIFICATION_BLOCK);
            self.text(present(&achievement.title).unwrap_or("Achievement"), entry);
            let meta: Vec<String> = [
                present(&achievement.organization).map(str::to_string),
                present(&achievement.date).map(format_date),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !meta.is_empty() {
                self.text(&meta.join(" | "), body);
            }
            if let Some(description) = present(&achievement.description) {
                self.text(description, body);
            }
            self.flow.advance(ENTRY_GAP);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Overlays
// ────────────────────────────────────────────────────────────────────────────

/// Stamps footers, the running name header and the multi-page note. Does
/// nothing for single-page output.
fn apply_overlays(pages: &mut [Page], name: &str, theme: &Theme, geometry: &PageGeometry) {
    let total = pages.len();
    if total <= 1 {
        return;
    }
    let family = theme.pdf_family();
    let centered = |text: &str, face: FontFace, size: f32, y: f32, color: Rgb| {
        let width = get_metrics(face).width_pt(text, size);
        DrawOp::Text(TextRun {
            x: ((geometry.width - width) / 2.0).max(0.0),
            y,
            text: text.to_string(),
            face,
            size,
            color,
            word_spacing: 0.0,
        })
    };

    for (idx, page) in pages.iter_mut().enumerate() {
        let footer = format!("Page {} of {}", idx + 1, total);
        page.ops.push(centered(
            &footer,
            FontFace::regular(family),
            FOOTER_SIZE,
            geometry.height - FOOTER_OFFSET,
            Rgb::BLACK,
        ));

        if idx == 0 {
            page.ops.push(centered(
                MULTI_PAGE_NOTE,
                FontFace::regular(family),
                NOTE_SIZE,
                geometry.height - NOTE_OFFSET,
                Rgb::GRAY,
            ));
        } else {
            page.ops.push(DrawOp::Text(TextRun {
                x: geometry.margin,
                y: RUNNING_HEADER_Y,
                text: name.to_string(),
                face: FontFace::bold(family),
                size: RUNNING_HEADER_SIZE,
                color: theme.configured_accent,
                word_spacing: 0.0,
            }));
            page.ops.push(DrawOp::Rule {
                x1: geometry.margin,
                x2: geometry.width - geometry.margin,
                y: RUNNING_RULE_Y,
                width: 0.5,
                color: theme.configured_accent,
            });
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontFamily;
    use crate::models::DesignSettings;
    use crate::normalize::normalize;
    use serde_json::{json, Value};

    fn theme() -> Theme {
        Theme::resolve(None, &DesignSettings::default())
    }

    fn layout(raw: Value) -> Vec<Page> {
        layout_resume(&normalize(&raw), &theme(), PageGeometry::a4())
    }

    fn long_bullets(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                format!(
                    "Item {i}: led the migration of a latency-sensitive billing pipeline to an \
                     event-driven architecture, cutting reconciliation time from hours to minutes \
                     across four regions"
                )
            })
            .collect()
    }

    fn all_text(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.texts().map(|r| r.text.clone()).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_single_page_has_no_overlays() {
        let pages = layout(json!({
            "basics": { "name": "Jane Doe", "title": "Engineer", "email": "jane@example.com" },
            "experience": [{ "title": "Dev", "company": "Acme", "highlights": ["Shipped it"] }]
        }));
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].contains_text("Page 1 of"));
        assert!(!pages[0].contains_text(MULTI_PAGE_NOTE));
        assert!(pages[0].contains_text("Email: jane@example.com"));
        assert!(pages[0].contains_text("Dev at Acme"));
        assert!(pages[0].contains_text("• Shipped it"));
    }

    #[test]
    fn test_placeholders_for_missing_name_and_title() {
        let pages = layout(json!({}));
        assert!(pages[0].contains_text("No Name"));
        assert!(pages[0].contains_text("No Title"));
    }

    #[test]
    fn test_forty_highlights_spill_onto_more_pages_with_footers() {
        let pages = layout(json!({
            "basics": { "name": "Jane Doe" },
            "experience": [{ "title": "Engineer", "company": "Acme", "highlights": long_bullets(40) }]
        }));
        let total = pages.len();
        assert!(total > 1, "expected multiple pages, got {total}");

        for (idx, page) in pages.iter().enumerate() {
            let footer = format!("Page {} of {}", idx + 1, total);
            assert!(page.contains_text(&footer), "page {} missing footer", idx + 1);
        }
        assert!(pages[0].contains_text(MULTI_PAGE_NOTE));
        for page in &pages[1..] {
            assert!(page.contains_text("Jane Doe"), "running header missing");
            assert!(page.ops.iter().any(|op| matches!(op, DrawOp::Rule { .. })));
        }
    }

    #[test]
    fn test_bullet_after_break_gets_continued_line() {
        let pages = layout(json!({
            "experience": [{ "title": "Engineer", "company": "Acme", "highlights": long_bullets(40) }]
        }));
        assert!(pages.len() > 1);
        assert!(pages[1].contains_text("Engineer (continued)"));
        // Every bullet made it into the output.
        let text = all_text(&pages);
        for i in 0..40 {
            let prefix = format!("• Item {i}:");
            assert!(text.iter().any(|t| t.starts_with(&prefix)), "bullet {i} missing");
        }
    }

    #[test]
    fn test_flowed_content_stays_inside_content_area() {
        let geometry = PageGeometry::a4();
        let pages = layout(json!({
            "experience": [
                { "title": "A", "highlights": long_bullets(25) },
                { "title": "B", "highlights": long_bullets(25) }
            ],
            "projects": [{ "name": "P", "highlights": long_bullets(10) }]
        }));
        for page in &pages {
            for run in page.texts() {
                let is_overlay = run.text.starts_with("Page ") || run.text == MULTI_PAGE_NOTE;
                if !is_overlay {
                    assert!(
                        run.y + run.size * 1.2 <= geometry.content_bottom() + 1e-3,
                        "{:?} at y={} overflows",
                        run.text,
                        run.y
                    );
                }
            }
        }
    }

    #[test]
    fn test_skills_grouped_three_per_row_and_truncated() {
        let pages = layout(json!({
            "skills": [
                { "name": "Langs", "keywords": ["a", "b", "c", "d", "e", "f"] },
                "SQL",
                { "name": "Go", "level": "Expert" },
                "Bash"
            ]
        }));
        assert!(pages[0].contains_text("Langs: a, b, c, d, e, ... | SQL | Go: Expert"));
        assert!(pages[0].texts().any(|r| r.text == "Bash"));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let pages = layout(json!({ "basics": { "name": "J" } }));
        for header in ["SUMMARY", "EXPERIENCE", "EDUCATION", "SKILLS", "PROJECTS", "LANGUAGES"] {
            assert!(!pages[0].contains_text(header), "unexpected {header}");
        }
    }

    #[test]
    fn test_section_headers_use_accent_color() {
        let pages = layout(json!({ "summary": "Hello" }));
        let header = pages[0].texts().find(|r| r.text == "SUMMARY").unwrap();
        assert_eq!(header.color, theme().configured_accent);
        assert!(header.face.bold);
    }

    #[test]
    fn test_named_template_keeps_configured_accent_and_font() {
        let design: DesignSettings = serde_json::from_value(json!({
            "font": "Helvetica",
            "colors": { "primary": "#112233" }
        }))
        .unwrap();
        let expected = Rgb::from_hex("#112233").unwrap();
        for template in ["professional", "elegant", "creative"] {
            let theme = Theme::resolve(Some(template), &design);
            let doc = normalize(&json!({
                "basics": { "name": "Jane Doe" },
                "summary": "Hello",
                "experience": [{ "title": "Engineer", "highlights": long_bullets(40) }]
            }));
            let pages = layout_resume(&doc, &theme, PageGeometry::a4());
            assert!(pages.len() > 1);

            let header = pages[0].texts().find(|r| r.text == "SUMMARY").unwrap();
            assert_eq!(header.color, expected, "{template} section header");
            assert_eq!(header.face.family, FontFamily::Helvetica, "{template} font");

            let running = pages[1].texts().find(|r| r.text == "Jane Doe").unwrap();
            assert_eq!(running.color, expected, "{template} running header");
        }
    }

    #[test]
    fn test_render_pdf_produces_loadable_document() {
        let doc = normalize(&json!({
            "basics": { "name": "Jane Doe" },
            "experience": [{ "title": "Engineer", "highlights": long_bullets(40) }]
        }));
        let bytes = render_pdf(&doc, &theme()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let loaded = lopdf::Document::load_mem(&bytes).expect("valid PDF");
        let expected = layout_resume(&doc, &theme(), PageGeometry::a4()).len();
        assert_eq!(loaded.get_pages().len(), expected);
    }
}
