//! Styled XHTML for the DOCX path.
//!
//! The document is well-formed XML so the converter can read it with a
//! strict parser. Every element carries its styling inline; the `<style>`
//! block in the head only documents the classes for people opening the
//! intermediate file in a browser.

use quick_xml::escape::escape;

use crate::models::resume::{present, ResumeDocument};
use crate::render::dates::{format_date, format_range};
use crate::render::docx::convert::xml_safe;
use crate::render::Theme;

const TEXT_COLOR: &str = "#333333";
const MUTED_COLOR: &str = "#666666";

/// Inline CSS for each element class, resolved from a theme.
struct HtmlStyles {
    body: String,
    name: String,
    title: String,
    contact: String,
    section_header: String,
    item_header: String,
    item_subheader: String,
    item_date: String,
    description: String,
    list_item: String,
    skill_item: String,
    skill_name: String,
}

impl HtmlStyles {
    fn from_theme(theme: &Theme) -> Self {
        let accent = theme.accent_css();
        let scale = theme.scale;
        let header_style = if theme.italic_headers() {
            "font-style: italic; "
        } else {
            ""
        };
        Self {
            body: format!(
                "font-family: {}; font-size: {}pt; color: {TEXT_COLOR}",
                theme.css_font_stack(),
                scale.body
            ),
            name: format!(
                "font-size: {}pt; font-weight: bold; color: {accent}; text-align: center; margin-bottom: 2pt",
                scale.name
            ),
            title: format!(
                "font-size: {}pt; text-align: center; margin-bottom: 4pt",
                scale.title
            ),
            contact: format!(
                "font-size: {}pt; text-align: center; margin-bottom: 10pt",
                scale.body
            ),
            section_header: format!(
                "font-size: {}pt; font-weight: bold; {header_style}color: {accent}; \
                 border-bottom: {}px solid {accent}; margin-top: 12pt; margin-bottom: 4pt",
                scale.section,
                theme.header_rule_px()
            ),
            item_header: format!(
                "font-size: {}pt; font-weight: bold; margin-top: 6pt",
                scale.entry
            ),
            item_subheader: format!("font-size: {}pt; font-style: italic", scale.body),
            item_date: format!("font-size: {}pt; color: {MUTED_COLOR}", scale.body),
            description: format!(
                "font-size: {}pt; text-align: justify; margin-bottom: 4pt",
                scale.body
            ),
            list_item: format!("font-size: {}pt; margin-bottom: 2pt", scale.body),
            skill_item: format!("font-size: {}pt; margin-bottom: 2pt", scale.body),
            skill_name: format!("font-weight: bold; color: {accent}"),
        }
    }
}

/// Appends escaped markup to a buffer.
#[derive(Default)]
struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    fn raw(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    fn open(&mut self, tag: &str, class: &str, style: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        if !class.is_empty() {
            self.out.push_str(&format!(" class=\"{class}\""));
        }
        if !style.is_empty() {
            self.out.push_str(&format!(" style=\"{}\"", escape(style)));
        }
        self.out.push('>');
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str(&format!("</{tag}>"));
    }

    fn text(&mut self, text: &str) {
        self.out.push_str(&escape(&xml_safe(text)));
    }

    fn element(&mut self, tag: &str, class: &str, style: &str, text: &str) {
        self.open(tag, class, style);
        self.text(text);
        self.close(tag);
    }
}

pub fn build_html(doc: &ResumeDocument, theme: &Theme) -> String {
    let styles = HtmlStyles::from_theme(theme);
    let mut html = HtmlWriter::default();

    html.raw("<!DOCTYPE html>\n");
    html.raw("<html xmlns=\"http://www.w3.org/1999/xhtml\"><head><meta charset=\"utf-8\"/>");
    html.element("title", "", "", &format!("Resume - {}", doc.name().unwrap_or("Resume")));
    html.element("style", "", "", &stylesheet(theme));
    html.raw("</head>");
    html.open("body", "", &styles.body);

    header(&mut html, &styles, doc);
    summary(&mut html, &styles, doc);
    experience(&mut html, &styles, doc);
    education(&mut html, &styles, doc);
    skills(&mut html, &styles, doc);
    projects(&mut html, &styles, doc);
    certifications(&mut html, &styles, doc);
    languages(&mut html, &styles, doc);
    achievements(&mut html, &styles, doc);

    html.close("body");
    html.raw("</html>\n");
    html.out
}

fn stylesheet(theme: &Theme) -> String {
    let accent = theme.accent_css();
    format!(
        "body {{ font-family: {font}; line-height: 1.4; }} \
         .name {{ font-weight: bold; color: {accent}; text-align: center; }} \
         .title, .contact-info {{ text-align: center; }} \
         .section-header {{ color: {accent}; border-bottom: {rule}px solid {accent}; }} \
         .item-header {{ font-weight: bold; }} \
         .item-date {{ color: {MUTED_COLOR}; }} \
         .skill-name {{ font-weight: bold; }}",
        font = theme.css_font_stack(),
        rule = theme.header_rule_px(),
    )
}

fn section_header(html: &mut HtmlWriter, styles: &HtmlStyles, title: &str) {
    html.element("div", "section-header", &styles.section_header, title);
}

fn bullet_list(html: &mut HtmlWriter, styles: &HtmlStyles, items: &[String]) {
    if items.is_empty() {
        return;
    }
    html.open("ul", "", "");
    for item in items {
        html.element("li", "", &styles.list_item, item);
    }
    html.close("ul");
}

fn header(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    html.open("div", "header", "");
    html.element("div", "name", &styles.name, doc.name().unwrap_or("No Name"));
    if let Some(title) = doc.title() {
        html.element("div", "title", &styles.title, title);
    }
    let location = doc.location();
    let contact: Vec<&str> = [doc.email(), doc.phone(), location.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !contact.is_empty() {
        html.element("div", "contact-info", &styles.contact, &contact.join(" | "));
    }
    html.close("div");
}

fn summary(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if let Some(summary) = doc.summary() {
        section_header(html, styles, "SUMMARY");
        html.element("p", "item-description", &styles.description, summary);
    }
}

fn experience(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if doc.experience.is_empty() {
        return;
    }
    section_header(html, styles, "EXPERIENCE");
    for exp in &doc.experience {
        html.element(
            "div",
            "item-header",
            &styles.item_header,
            present(&exp.title).unwrap_or("Position"),
        );
        let company = [present(&exp.company).map(str::to_string), exp.location_text()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        if !company.is_empty() {
            html.element("div", "item-subheader", &styles.item_subheader, &company);
        }
        let range = format_range(present(&exp.start_date), present(&exp.end_date));
        html.element("div", "item-date", &styles.item_date, &range);
        if !exp.highlights.is_empty() {
            bullet_list(html, styles, &exp.highlights);
        } else if let Some(description) = present(&exp.description) {
            html.element("p", "item-description", &styles.description, description);
        }
    }
}

fn education(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if doc.education.is_empty() {
        return;
    }
    section_header(html, styles, "EDUCATION");
    for edu in &doc.education {
        html.element(
            "div",
            "item-header",
            &styles.item_header,
            &edu.degree_line().unwrap_or_else(|| "Degree".to_string()),
        );
        if let Some(institution) = edu.institution_name() {
            html.element("div", "item-subheader", &styles.item_subheader, institution);
        }
        if present(&edu.start_date).is_some() || present(&edu.end_date).is_some() {
            let range = format_range(present(&edu.start_date), present(&edu.end_date));
            html.element("div", "item-date", &styles.item_date, &range);
        }
        if let Some(gpa) = present(&edu.gpa) {
            html.element("div", "item-date", &styles.item_date, &format!("GPA: {gpa}"));
        }
    }
}

fn skills(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    let labels: Vec<String> = doc.skills.iter().filter_map(|s| s.label(None)).collect();
    if labels.is_empty() {
        return;
    }
    section_header(html, styles, "SKILLS");
    for label in labels {
        html.open("div", "skill-item", &styles.skill_item);
        match label.split_once(": ") {
            Some((name, rest)) => {
                html.element("span", "skill-name", &styles.skill_name, &format!("{name}:"));
                html.text(&format!(" {rest}"));
            }
            None => html.text(&label),
        }
        html.close("div");
    }
}

fn projects(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if doc.projects.is_empty() {
        return;
    }
    section_header(html, styles, "PROJECTS");
    for project in &doc.projects {
        html.element(
            "div",
            "item-header",
            &styles.item_header,
            present(&project.name).unwrap_or("Project"),
        );
        if present(&project.start_date).is_some() || present(&project.end_date).is_some() {
            let range = format_range(present(&project.start_date), present(&project.end_date));
            html.element("div", "item-date", &styles.item_date, &range);
        }
        if let Some(description) = present(&project.description) {
            html.element("p", "item-description", &styles.description, description);
        }
        bullet_list(html, styles, &project.highlights);
    }
}

fn certifications(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if doc.certifications.is_empty() {
        return;
    }
    section_header(html, styles, "CERTIFICATIONS");
    for cert in &doc.certifications {
        html.element(
            "div",
            "item-header",
            &styles.item_header,
            present(&cert.name).unwrap_or("Certification"),
        );
        if let Some(issuer) = present(&cert.issuer) {
            html.element("div", "item-subheader", &styles.item_subheader, issuer);
        }
        if let Some(date) = present(&cert.date) {
            html.element("div", "item-date", &styles.item_date, &format_date(date));
        }
    }
}

fn languages(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if doc.languages.is_empty() {
        return;
    }
    section_header(html, styles, "LANGUAGES");
    let line = doc
        .languages
        .iter()
        .map(|l| l.label())
        .collect::<Vec<_>>()
        .join(" | ");
    html.element("p", "item-description", &styles.description, &line);
}

fn achievements(html: &mut HtmlWriter, styles: &HtmlStyles, doc: &ResumeDocument) {
    if doc.achievements.is_empty() {
        return;
    }
    section_header(html, styles, "ACHIEVEMENTS");
    for achievement in &doc.achievements {
        html.element(
            "div",
            "item-header",
            &styles.item_header,
            present(&achievement.title).unwrap_or("Achievement"),
        );
        let meta = [
            present(&achievement.organization).map(str::to_string),
            present(&achievement.date).map(format_date),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" | ");
        if !meta.is_empty() {
            html.element("div", "item-date", &styles.item_date, &meta);
        }
        if let Some(description) = present(&achievement.description) {
            html.element("p", "item-description", &styles.description, description);
        }
    }
}
