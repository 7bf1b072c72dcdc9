//! Rich Text Format fallback for when DOCX conversion fails.
//!
//! Visually plain, but carries the same sections and entries as the HTML
//! document.

use crate::models::resume::{present, ResumeDocument};
use crate::render::dates::{format_date, format_range};
use crate::render::Theme;

/// Escapes RTF control characters. Non-ASCII becomes `\uN?`.
pub fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\line "),
            '\t' => out.push_str("\\tab "),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if c.is_ascii() => {}
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    // RTF wants signed 16-bit values.
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

struct RtfWriter {
    out: String,
    /// Half-points.
    body_size: u32,
    heading_size: u32,
    name_size: u32,
}

impl RtfWriter {
    fn new(theme: &Theme) -> Self {
        let half_points = |pt: f32| (pt * 2.0).round() as u32;
        let accent = theme.accent;
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut out = String::from("{\\rtf1\\ansi\\ansicpg1252\\deff0\\deflang1033");
        let (family, font) = if theme.italic_headers() {
            ("froman", "Times New Roman")
        } else {
            ("fswiss", "Calibri")
        };
        out.push_str(&format!(
            "{{\\fonttbl{{\\f0\\{family}\\fcharset0 {font};}}}}"
        ));
        out.push_str(&format!(
            "{{\\colortbl;\\red0\\green0\\blue0;\\red{}\\green{}\\blue{};}}\n",
            channel(accent.r),
            channel(accent.g),
            channel(accent.b)
        ));
        Self {
            out,
            body_size: half_points(theme.scale.body),
            heading_size: half_points(theme.scale.section),
            name_size: half_points(theme.scale.name),
        }
    }

    fn paragraph(&mut self, text: &str) {
        self.out.push_str(&format!(
            "{{\\pard\\fs{} {}\\par}}\n",
            self.body_size,
            escape_rtf(text)
        ));
    }

    fn bold(&mut self, text: &str) {
        self.out.push_str(&format!(
            "{{\\pard\\b\\fs{} {}\\b0\\par}}\n",
            self.body_size,
            escape_rtf(text)
        ));
    }

    fn centered(&mut self, text: &str, size: u32, bold: bool) {
        let weight = if bold { "\\b" } else { "" };
        self.out.push_str(&format!(
            "{{\\pard\\qc{weight}\\fs{size} {}\\par}}\n",
            escape_rtf(text)
        ));
    }

    fn heading(&mut self, title: &str) {
        self.out.push_str(&format!(
            "{{\\pard\\sb240\\sa80\\b\\cf2\\fs{} {}\\b0\\cf1\\par}}\n",
            self.heading_size,
            escape_rtf(title)
        ));
    }

    fn bullet(&mut self, text: &str) {
        self.out.push_str(&format!(
            "{{\\pard\\fi-180\\li360\\fs{} \\bullet  {}\\par}}\n",
            self.body_size,
            escape_rtf(text)
        ));
    }

    fn finish(mut self) -> String {
        self.out.push('}');
        self.out
    }
}

fn range_of(start: &Option<String>, end: &Option<String>) -> Option<String> {
    (present(start).is_some() || present(end).is_some())
        .then(|| format_range(present(start), present(end)))
}

pub fn render_rtf(doc: &ResumeDocument, theme: &Theme) -> String {
    let mut rtf = RtfWriter::new(theme);

    let name_size = rtf.name_size;
    rtf.centered(doc.name().unwrap_or("No Name"), name_size, true);
    if let Some(title) = doc.title() {
        let size = rtf.heading_size;
        rtf.centered(title, size, false);
    }
    let location = doc.location();
    let contact: Vec<&str> = [doc.email(), doc.phone(), location.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !contact.is_empty() {
        let size = rtf.body_size;
        rtf.centered(&contact.join(" | "), size, false);
    }

    if let Some(summary) = doc.summary() {
        rtf.heading("SUMMARY");
        rtf.paragraph(summary);
    }

    if !doc.experience.is_empty() {
        rtf.heading("EXPERIENCE");
        for exp in &doc.experience {
            let title = present(&exp.title).unwrap_or("Position");
            match present(&exp.company) {
                Some(company) => rtf.bold(&format!("{title} at {company}")),
                None => rtf.bold(title),
            }
            let range = format_range(present(&exp.start_date), present(&exp.end_date));
            let meta: Vec<String> = [Some(range), exp.location_text()]
                .into_iter()
                .flatten()
                .collect();
            if !meta.is_empty() {
                rtf.paragraph(&meta.join(" | "));
            }
            if !exp.highlights.is_empty() {
                for highlight in &exp.highlights {
                    rtf.bullet(highlight);
                }
            } else if let Some(description) = present(&exp.description) {
                rtf.paragraph(description);
            }
        }
    }

    if !doc.education.is_empty() {
        rtf.heading("EDUCATION");
        for edu in &doc.education {
            rtf.bold(&edu.degree_line().unwrap_or_else(|| "Degree".to_string()));
            if let Some(institution) = edu.institution_name() {
                rtf.paragraph(institution);
            }
            if let Some(range) = range_of(&edu.start_date, &edu.end_date) {
                rtf.paragraph(&range);
            }
            if let Some(gpa) = present(&edu.gpa) {
                rtf.paragraph(&format!("GPA: {gpa}"));
            }
        }
    }

    let skills: Vec<String> = doc.skills.iter().filter_map(|s| s.label(None)).collect();
    if !skills.is_empty() {
        rtf.heading("SKILLS");
        for skill in &skills {
            rtf.bullet(skill);
        }
    }

    if !doc.projects.is_empty() {
        rtf.heading("PROJECTS");
        for project in &doc.projects {
            rtf.bold(present(&project.name).unwrap_or("Project"));
            if let Some(range) = range_of(&project.start_date, &project.end_date) {
                rtf.paragraph(&range);
            }
            if let Some(description) = present(&project.description) {
                rtf.paragraph(description);
            }
            for highlight in &project.highlights {
                rtf.bullet(highlight);
            }
        }
    }

    if !doc.certifications.is_empty() {
        rtf.heading("CERTIFICATIONS");
        for cert in &doc.certifications {
            rtf.bold(present(&cert.name).unwrap_or("Certification"));
            let meta: Vec<String> = [
                present(&cert.issuer).map(|i| format!("Issuer: {i}")),
                present(&cert.date).map(|d| format!("Date: {}", format_date(d))),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !meta.is_empty() {
                rtf.paragraph(&meta.join(" | "));
            }
        }
    }

    if !doc.languages.is_empty() {
        rtf.heading("LANGUAGES");
        let line = doc
            .languages
            .iter()
            .map(|l| l.label())
            .collect::<Vec<_>>()
            .join(" | ");
        rtf.paragraph(&line);
    }

    if !doc.achievements.is_empty() {
        rtf.heading("ACHIEVEMENTS");
        for achievement in &doc.achievements {
            rtf.bold(present(&achievement.title).unwrap_or("Achievement"));
            let meta: Vec<String> = [
                present(&achievement.organization).map(str::to_string),
                present(&achievement.date).map(format_date),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !meta.is_empty() {
                rtf.paragraph(&meta.join(" | "));
            }
            if let Some(description) = present(&achievement.description) {
                rtf.paragraph(description);
            }
        }
    }

    rtf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DesignSettings;
    use crate::normalize::normalize;
    use serde_json::json;

    fn theme() -> Theme {
        Theme::resolve(None, &DesignSettings::default())
    }

    #[test]
    fn test_escape_control_characters_and_unicode() {
        assert_eq!(escape_rtf(r"a\b{c}"), r"a\\b\{c\}");
        assert_eq!(escape_rtf("é"), "\\u233?");
        assert_eq!(escape_rtf("😀"), "\\u-10179?\\u-8704?");
    }

    #[test]
    fn test_document_is_balanced_and_has_header() {
        let rtf = render_rtf(&normalize(&json!({ "basics": { "name": "A {B}" } })), &theme());
        assert!(rtf.starts_with("{\\rtf1\\ansi\\ansicpg1252"));
        let opens = rtf.matches('{').count() - rtf.matches("\\{").count();
        let closes = rtf.matches('}').count() - rtf.matches("\\}").count();
        assert_eq!(opens, closes, "unbalanced groups in {rtf}");
        assert!(rtf.contains("A \\{B\\}"));
    }

    #[test]
    fn test_fallback_is_content_complete() {
        let doc = normalize(&json!({
            "basics": { "name": "Jane Roe", "title": "Engineer", "email": "jane@example.com" },
            "summary": "Builds reliable systems",
            "experience": [{ "title": "SRE", "company": "Acme", "startDate": "2020-01",
                             "highlights": ["Cut paging volume in half"] }],
            "education": [{ "institution": "State U", "studyType": "BSc", "area": "CS" }],
            "skills": [{ "category": "Languages", "items": ["Rust"] }],
            "projects": [{ "name": "Tracer", "highlights": ["Open source"] }],
            "certifications": [{ "name": "CKA", "issuer": "CNCF" }],
            "languages": [{ "language": "English", "fluency": "Native" }],
            "achievements": [{ "title": "Hackathon winner" }]
        }));
        let rtf = render_rtf(&doc, &theme());
        for needle in [
            "Jane Roe",
            "jane@example.com",
            "SUMMARY",
            "EXPERIENCE",
            "SRE at Acme",
            "January 2020 - Present",
            "\\bullet  Cut paging volume in half",
            "EDUCATION",
            "BSc in CS",
            "SKILLS",
            "Languages: Rust",
            "PROJECTS",
            "Tracer",
            "CERTIFICATIONS",
            "Issuer: CNCF",
            "LANGUAGES",
            "English: Native",
            "ACHIEVEMENTS",
            "Hackathon winner",
        ] {
            assert!(rtf.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn test_accent_color_in_color_table() {
        let elegant = Theme::resolve(Some("elegant"), &DesignSettings::default());
        let rtf = render_rtf(&ResumeDocument::default(), &elegant);
        assert!(rtf.contains("\\red51\\green51\\blue51;"));
        assert!(rtf.contains("Times New Roman"));
    }
}
