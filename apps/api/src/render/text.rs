//! Plain-text resume.
//!
//! Single deterministic pass in a fixed section order. Every section header
//! is underlined with dashes of the same length and only appears when the
//! section has content.

use tracing::debug;

use crate::models::resume::{present, ResumeDocument};
use crate::render::dates::{format_date, format_range};
use crate::render::{RenderError, RenderTarget, Renderer, Theme};

const BULLET: &str = "• ";

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(
        &self,
        doc: &ResumeDocument,
        _theme: &Theme,
        target: &RenderTarget,
    ) -> Result<(), RenderError> {
        let text = render_text(doc);
        debug!("Rendered TXT resume ({} bytes)", text.len());
        target.write_output(text.as_bytes())
    }
}

/// Small line buffer with section helpers.
#[derive(Default)]
struct TextWriter {
    lines: Vec<String>,
}

impl TextWriter {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn labeled(&mut self, label: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.lines.push(format!("{label}: {value}"));
        }
    }

    fn optional(&mut self, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.lines.push(value.to_string());
        }
    }

    fn header(&mut self, title: &str) {
        self.lines.push(title.to_string());
        self.lines.push("-".repeat(title.chars().count()));
    }

    fn bullets<'a>(&mut self, items: impl IntoIterator<Item = &'a String>) {
        for item in items {
            self.lines.push(format!("{BULLET}{item}"));
        }
    }

    fn finish(mut self) -> String {
        while self.lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            self.lines.pop();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn joined(first: Option<&str>, connector: &str, second: Option<&str>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{a} {connector} {b}")),
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (None, None) => None,
    }
}

pub fn render_text(doc: &ResumeDocument) -> String {
    let mut w = TextWriter::default();

    w.line(doc.name().unwrap_or("Name"));
    w.line(doc.title().unwrap_or("Title"));
    w.blank();

    let location = doc.location();
    let contact = [
        ("Email", doc.email()),
        ("Phone", doc.phone()),
        ("Location", location.as_deref()),
        ("Website", doc.website()),
        ("LinkedIn", doc.linkedin()),
    ];
    if contact.iter().any(|(_, v)| v.is_some()) {
        w.header("CONTACT INFORMATION");
        for (label, value) in contact {
            w.labeled(label, value);
        }
        w.blank();
    }

    if let Some(summary) = doc.summary() {
        w.header("SUMMARY");
        w.line(summary);
        w.blank();
    }

    if !doc.experience.is_empty() {
        w.header("EXPERIENCE");
        for exp in &doc.experience {
            w.optional(
                joined(present(&exp.title), "at", present(&exp.company)).as_deref(),
            );
            w.line(format_range(present(&exp.start_date), present(&exp.end_date)));
            w.labeled("Location", exp.location_text().as_deref());
            w.blank();
            if !exp.highlights.is_empty() {
                w.bullets(&exp.highlights);
            } else {
                w.optional(present(&exp.description));
            }
            w.blank();
        }
    }

    if !doc.education.is_empty() {
        w.header("EDUCATION");
        for edu in &doc.education {
            w.optional(edu.degree_line().as_deref());
            w.optional(edu.institution_name());
            if present(&edu.start_date).is_some() || present(&edu.end_date).is_some() {
                w.line(format_range(present(&edu.start_date), present(&edu.end_date)));
            }
            w.labeled("GPA", present(&edu.gpa));
            w.blank();
        }
    }

    let skills: Vec<String> = doc.skills.iter().filter_map(|s| s.label(None)).collect();
    if !skills.is_empty() {
        w.header("SKILLS");
        w.bullets(&skills);
        w.blank();
    }

    if !doc.projects.is_empty() {
        w.header("PROJECTS");
        for project in &doc.projects {
            w.line(present(&project.name).unwrap_or("Project"));
            if present(&project.start_date).is_some() || present(&project.end_date).is_some() {
                w.line(format_range(
                    present(&project.start_date),
                    present(&project.end_date),
                ));
            }
            w.optional(present(&project.description));
            if !project.highlights.is_empty() {
                w.blank();
                w.bullets(&project.highlights);
            }
            w.blank();
        }
    }

    if !doc.certifications.is_empty() {
        w.header("CERTIFICATIONS");
        for cert in &doc.certifications {
            w.line(present(&cert.name).unwrap_or("Certification"));
            w.labeled("Issuer", present(&cert.issuer));
            w.labeled("Date", present(&cert.date).map(format_date).as_deref());
            w.labeled("URL", present(&cert.url));
            w.blank();
        }
    }

    if !doc.languages.is_empty() {
        w.header("LANGUAGES");
        let labels: Vec<String> = doc.languages.iter().map(|l| l.label()).collect();
        w.bullets(&labels);
        w.blank();
    }

    if !doc.achievements.is_empty() {
        w.header("ACHIEVEMENTS");
        for achievement in &doc.achievements {
            w.line(present(&achievement.title).unwrap_or("Achievement"));
            w.labeled("Organization", present(&achievement.organization));
            w.labeled("Date", present(&achievement.date).map(format_date).as_deref());
            w.optional(present(&achievement.description));
            w.blank();
        }
    }

    if !doc.volunteer.is_empty() {
        w.header("VOLUNTEER EXPERIENCE");
        for vol in &doc.volunteer {
            w.optional(
                joined(present(&vol.position), "at", present(&vol.organization)).as_deref(),
            );
            if present(&vol.start_date).is_some() || present(&vol.end_date).is_some() {
                w.line(format_range(present(&vol.start_date), present(&vol.end_date)));
            }
            w.optional(present(&vol.summary));
            w.bullets(&vol.highlights);
            w.blank();
        }
    }

    if !doc.publications.is_empty() {
        w.header("PUBLICATIONS");
        for publication in &doc.publications {
            w.line(present(&publication.name).unwrap_or("Publication"));
            w.labeled("Publisher", present(&publication.publisher));
            w.labeled(
                "Date",
                present(&publication.release_date).map(format_date).as_deref(),
            );
            w.labeled("URL", present(&publication.website));
            w.optional(present(&publication.summary));
            w.blank();
        }
    }

    if !doc.interests.is_empty() {
        w.header("INTERESTS");
        for interest in &doc.interests {
            w.line(format!("{BULLET}{}", present(&interest.name).unwrap_or("Interest")));
            if !interest.keywords.is_empty() {
                w.line(format!("  {}", interest.keywords.join(", ")));
            }
        }
        w.blank();
    }

    if !doc.references.is_empty() {
        w.header("REFERENCES");
        w.line("Available upon request");
        w.blank();
    }

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn render(raw: serde_json::Value) -> String {
        render_text(&normalize(&raw))
    }

    #[test]
    fn test_minimal_resume_has_no_section_headers() {
        let out = render(json!({ "basics": { "name": "Jane Doe" } }));
        assert_eq!(out, "Jane Doe\nTitle\n");
        for header in ["EXPERIENCE", "EDUCATION", "SKILLS", "PROJECTS", "CONTACT"] {
            assert!(!out.contains(header), "unexpected {header} in {out:?}");
        }
    }

    #[test]
    fn test_placeholders_when_name_and_title_missing() {
        let out = render(json!({}));
        assert!(out.starts_with("Name\nTitle\n"));
    }

    #[test]
    fn test_headers_are_underlined_to_their_length() {
        let out = render(json!({
            "basics": { "name": "Jane", "email": "j@x.io" },
            "summary": "Hi"
        }));
        assert!(out.contains("CONTACT INFORMATION\n-------------------\nEmail: j@x.io\n"));
        assert!(out.contains("SUMMARY\n-------\nHi\n"));
    }

    #[test]
    fn test_experience_entry_layout() {
        let out = render(json!({
            "experience": [{
                "title": "Engineer",
                "company": "Acme",
                "startDate": "2020-03",
                "location": "Remote",
                "highlights": ["Built the thing", "Ran the thing"]
            }]
        }));
        let expected = "EXPERIENCE\n----------\nEngineer at Acme\nMarch 2020 - Present\n\
                        Location: Remote\n\n• Built the thing\n• Ran the thing\n";
        assert!(out.contains(expected), "got:\n{out}");
    }

    #[test]
    fn test_description_used_when_highlights_empty() {
        let doc = ResumeDocument {
            experience: vec![crate::models::resume::Experience {
                title: Some("Dev".into()),
                description: Some("Wrote code".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = render_text(&doc);
        assert!(out.contains("Dev\n - Present\n\nWrote code\n"), "got:\n{out}");
    }

    #[test]
    fn test_jane_doe_end_to_end() {
        let out = render(json!({
            "basics": { "name": "Jane Doe", "title": "Engineer", "email": "jane@x.com" },
            "experience": [{
                "title": "Dev",
                "company": "Acme",
                "startDate": "2020-01",
                "highlights": ["Built X"]
            }]
        }));
        let lines: Vec<&str> = out.lines().collect();
        for expected in [
            "Jane Doe",
            "Engineer",
            "Email: jane@x.com",
            "Dev at Acme",
            "January 2020 - Present",
            "• Built X",
        ] {
            assert!(lines.contains(&expected), "missing line {expected:?} in:\n{out}");
        }
    }

    #[test]
    fn test_date_lines_for_partial_ranges() {
        let out = render(json!({
            "experience": [{ "title": "Dev", "company": "Acme" }],
            "projects": [
                { "name": "Finished", "endDate": "2021-06" },
                { "name": "Undated" }
            ]
        }));
        assert!(out.contains("Dev at Acme\n - Present\n"), "got:\n{out}");
        assert!(out.contains("Finished\n - June 2021\n"), "got:\n{out}");
        assert!(!out.contains("Undated\n - "), "got:\n{out}");
    }

    #[test]
    fn test_contact_block_resolves_website_and_linkedin() {
        let out = render(json!({
            "basics": {
                "url": "https://jane.dev",
                "location": { "city": "Austin", "region": "TX" },
                "profiles": [{ "network": "LinkedIn", "url": "https://linkedin.com/in/jane" }]
            }
        }));
        assert!(out.contains("Location: Austin, TX\n"));
        assert!(out.contains("Website: https://jane.dev\n"));
        assert!(out.contains("LinkedIn: https://linkedin.com/in/jane\n"));
    }

    #[test]
    fn test_skill_shapes_render_as_bullets() {
        let out = render(json!({
            "skills": [
                { "name": "Languages", "keywords": ["Rust", "Go"] },
                { "name": "Docker", "level": "Advanced" },
                "SQL"
            ]
        }));
        assert!(out.contains("• Languages: Rust, Go\n• Docker: Advanced\n• SQL\n"));
    }

    #[test]
    fn test_education_lines_do_not_run_together() {
        let out = render(json!({
            "education": [{
                "studyType": "BSc", "area": "Physics", "institution": "ETH",
                "startDate": "2012-09", "endDate": "2016-06", "gpa": 3.7
            }]
        }));
        assert!(
            out.contains("BSc in Physics\nETH\nSeptember 2012 - June 2016\nGPA: 3.7\n"),
            "got:\n{out}"
        );
    }

    #[test]
    fn test_trailing_sections_render() {
        let out = render(json!({
            "languages": [{ "language": "Spanish", "fluency": "Native" }, { "language": "Dutch" }],
            "awards": [{ "title": "Hackathon Winner", "date": "2019-11", "awarder": "MLH" }],
            "volunteer": [{ "position": "Mentor", "organization": "Code Club", "highlights": ["Taught kids"] }],
            "publications": [{ "name": "On Lifetimes", "publisher": "ACM", "releaseDate": "2021-02" }],
            "interests": [{ "name": "Climbing", "keywords": ["bouldering", "alpine"] }],
            "references": [{ "name": "Bob" }]
        }));
        assert!(out.contains("• Spanish: Native\n• Dutch: Fluent\n"));
        assert!(out.contains("ACHIEVEMENTS\n------------\nHackathon Winner\nOrganization: MLH\nDate: November 2019\n"));
        assert!(out.contains("Mentor at Code Club\n• Taught kids\n"));
        assert!(out.contains("On Lifetimes\nPublisher: ACM\nDate: February 2021\n"));
        assert!(out.contains("• Climbing\n  bouldering, alpine\n"));
        assert!(out.ends_with("REFERENCES\n----------\nAvailable upon request\n"));
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let out = render(json!({
            "basics": { "name": "J", "email": "e" },
            "summary": "s",
            "experience": [{ "title": "t" }],
            "education": [{ "institution": "i" }],
            "skills": ["k"],
            "projects": [{ "name": "p" }],
            "certifications": [{ "name": "c" }],
            "languages": ["l"],
            "achievements": [{ "title": "a" }]
        }));
        let order = [
            "CONTACT INFORMATION", "SUMMARY", "EXPERIENCE", "EDUCATION", "SKILLS",
            "PROJECTS", "CERTIFICATIONS", "LANGUAGES", "ACHIEVEMENTS",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|h| out.find(&format!("{h}\n")).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "order: {positions:?}");
    }
}
