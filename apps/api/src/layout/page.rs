//! Page geometry and the draw list produced by the flow engine.
//!
//! Coordinates are top-down: `y = 0` is the top edge of the page. The PDF
//! writer flips them into PDF user space.

use crate::layout::font_metrics::FontFace;

/// A4 in points.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;
pub const DEFAULT_MARGIN: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin: DEFAULT_MARGIN,
        }
    }

    /// Lowest y a flowed block may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Color
// ────────────────────────────────────────────────────────────────────────────

/// RGB color with components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const GRAY: Rgb = Rgb { r: 0.5, g: 0.5, b: 0.5 };

    /// Parses `#rrggbb`, `rrggbb` or `#rgb`. Returns `None` for anything else.
    pub fn from_hex(color: &str) -> Option<Rgb> {
        let hex = color.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map(|v| v as f32 / 255.0)
        };
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Uppercase `RRGGBB` without the leading `#`.
    pub fn to_hex(self) -> String {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "{:02X}{:02X}{:02X}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Draw list
// ────────────────────────────────────────────────────────────────────────────

/// One line of text. `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
    /// Extra space added to each ASCII space, for justified lines.
    pub word_spacing: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            DrawOp::Rule { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|run| run.text.contains(needle))
    }
}
