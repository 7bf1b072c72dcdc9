//! Template and design-settings resolution.
//!
//! PDF and DOCX share one `Theme` for the type scale. Template overrides
//! (fixed accents, serif styling) only apply to the HTML and RTF documents;
//! the PDF follows the design settings alone.

use crate::layout::{FontFamily, Rgb};
use crate::models::DesignSettings;

pub const DEFAULT_ACCENT: &str = "#4a6cf7";
pub const DEFAULT_BASE_SIZE: f32 = 12.0;

const MIN_BASE_SIZE: f32 = 6.0;
const MAX_BASE_SIZE: f32 = 36.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateName {
    #[default]
    Modern,
    Professional,
    Creative,
    Elegant,
}

impl TemplateName {
    /// Unknown or missing names resolve to the modern template.
    pub fn parse(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("professional") => TemplateName::Professional,
            Some("creative") => TemplateName::Creative,
            Some("elegant") => TemplateName::Elegant,
            _ => TemplateName::Modern,
        }
    }

    fn fixed_accent(self) -> Option<&'static str> {
        match self {
            TemplateName::Modern => None,
            TemplateName::Professional => Some("#2c3e50"),
            TemplateName::Creative => Some("#e74c3c"),
            TemplateName::Elegant => Some("#333333"),
        }
    }
}

/// Font sizes derived from one base size.
///
/// At the default base of 12pt: name 18, title 12, section 10, entry 9,
/// body 8.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeScale {
    pub name: f32,
    pub title: f32,
    pub section: f32,
    pub entry: f32,
    pub body: f32,
}

impl TypeScale {
    pub fn from_base(base: f32) -> Self {
        Self {
            name: base * 1.5,
            title: base,
            section: base * 10.0 / 12.0,
            entry: base * 0.75,
            body: base * 2.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub template: TemplateName,
    /// Accent after template overrides, used by HTML and RTF.
    pub accent: Rgb,
    /// Accent from the design settings, used by the PDF.
    pub configured_accent: Rgb,
    /// Requested font name, if any.
    pub font: Option<String>,
    pub scale: TypeScale,
}

impl Theme {
    pub fn resolve(template: Option<&str>, design: &DesignSettings) -> Self {
        let template = TemplateName::parse(template);
        let configured_accent = design
            .colors
            .primary
            .as_deref()
            .and_then(Rgb::from_hex)
            .or_else(|| Rgb::from_hex(DEFAULT_ACCENT))
            .unwrap_or(Rgb::BLACK);
        let accent = template
            .fixed_accent()
            .and_then(Rgb::from_hex)
            .unwrap_or(configured_accent);

        let base = design
            .font_size
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(MIN_BASE_SIZE, MAX_BASE_SIZE))
            .unwrap_or(DEFAULT_BASE_SIZE);

        Self {
            template,
            accent,
            configured_accent,
            font: design.font.clone().filter(|f| !f.trim().is_empty()),
            scale: TypeScale::from_base(base),
        }
    }

    /// Standard PDF family from the requested font. The template plays no part.
    pub fn pdf_family(&self) -> FontFamily {
        self.font
            .as_deref()
            .map(FontFamily::from_request)
            .unwrap_or(FontFamily::Helvetica)
    }

    /// CSS font stack for the HTML document.
    pub fn css_font_stack(&self) -> String {
        match (self.template, self.font.as_deref()) {
            (TemplateName::Elegant, _) => "Georgia, 'Times New Roman', serif".to_string(),
            (_, Some(font)) => format!("{font}, Arial, sans-serif"),
            (_, None) => "Calibri, Arial, sans-serif".to_string(),
        }
    }

    pub fn accent_css(&self) -> String {
        format!("#{}", self.accent.to_hex())
    }

    pub fn italic_headers(&self) -> bool {
        self.template == TemplateName::Elegant
    }

    /// Thickness of the rule under section headers, in CSS pixels.
    pub fn header_rule_px(&self) -> f32 {
        if self.template == TemplateName::Modern {
            2.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::request::ColorSettings;

    fn design(primary: Option<&str>, font: Option<&str>, size: Option<f32>) -> DesignSettings {
        DesignSettings {
            font: font.map(str::to_string),
            font_size: size,
            colors: ColorSettings {
                primary: primary.map(str::to_string),
                secondary: None,
            },
        }
    }

    #[test]
    fn test_default_accent_when_nothing_configured() {
        let theme = Theme::resolve(None, &DesignSettings::default());
        assert_eq!(theme.accent_css(), "#4A6CF7");
        assert_eq!(theme.pdf_family(), FontFamily::Helvetica);
        assert_eq!(theme.scale.body, 8.0);
    }

    #[test]
    fn test_primary_color_used_by_modern_template() {
        let theme = Theme::resolve(Some("modern"), &design(Some("#112233"), None, None));
        assert_eq!(theme.accent_css(), "#112233");
    }

    #[test]
    fn test_named_templates_fix_their_accent() {
        let d = design(Some("#112233"), None, None);
        assert_eq!(Theme::resolve(Some("professional"), &d).accent_css(), "#2C3E50");
        assert_eq!(Theme::resolve(Some("Creative"), &d).accent_css(), "#E74C3C");
        assert_eq!(Theme::resolve(Some("elegant"), &d).accent_css(), "#333333");
    }

    #[test]
    fn test_elegant_is_serif_with_italic_headers() {
        let theme = Theme::resolve(Some("elegant"), &design(None, Some("Arial"), None));
        assert!(theme.css_font_stack().starts_with("Georgia"));
        assert!(theme.italic_headers());
    }

    #[test]
    fn test_pdf_settings_ignore_template_overrides() {
        let d = design(Some("#112233"), Some("Helvetica"), None);
        let elegant = Theme::resolve(Some("elegant"), &d);
        assert_eq!(elegant.pdf_family(), FontFamily::Helvetica);
        assert_eq!(elegant.configured_accent.to_hex(), "112233");
        assert_eq!(elegant.accent_css(), "#333333");

        let serif = Theme::resolve(Some("modern"), &design(None, Some("Times New Roman"), None));
        assert_eq!(serif.pdf_family(), FontFamily::Times);

        let fallback = Theme::resolve(Some("professional"), &DesignSettings::default());
        assert_eq!(fallback.configured_accent.to_hex(), "4A6CF7");
    }

    #[test]
    fn test_font_size_scales_and_clamps() {
        let theme = Theme::resolve(None, &design(None, None, Some(9.0)));
        assert_eq!(theme.scale.body, 6.0);
        assert_eq!(theme.scale.title, 9.0);
        let huge = Theme::resolve(None, &design(None, None, Some(400.0)));
        assert_eq!(huge.scale.title, 36.0);
    }

    #[test]
    fn test_invalid_primary_falls_back_to_default() {
        let theme = Theme::resolve(None, &design(Some("not-a-color"), None, None));
        assert_eq!(theme.accent_css(), "#4A6CF7");
    }
}
