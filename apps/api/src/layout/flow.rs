//! Manual flow layout over fixed-size pages.
//!
//! `FlowLayout` owns the vertical cursor and the page list. Content code asks
//! it to reserve space (`ensure_space`) before a block that should stay
//! together, then places wrapped text at the cursor. All page-break decisions
//! live here so they can be tested without any resume content.
//!
//! Overflow policy:
//! - a block that does not fit in the space left on a page that already has
//!   content starts a new page;
//! - a page with no flowed content never breaks again, so a block taller than
//!   a whole page cannot produce blank pages;
//! - paragraphs that still overflow continue line by line on the next page.

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::page::{DrawOp, Page, PageGeometry, Rgb, TextRun};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Justify,
}

pub struct FlowLayout {
    geometry: PageGeometry,
    pages: Vec<Page>,
    cursor_y: f32,
    page_has_content: bool,
}

impl FlowLayout {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            cursor_y: geometry.margin,
            page_has_content: false,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    #[cfg(test)]
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Reserves `height` points. Breaks to a new page when the block does not
    /// fit and the current page already holds content. Returns whether a
    /// break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor_y + height > self.geometry.content_bottom() && self.page_has_content {
            self.break_page();
            true
        } else {
            false
        }
    }

    pub fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.geometry.margin;
        self.page_has_content = false;
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor_y += dy;
    }

    /// Height `text` would take when wrapped at `width`.
    pub fn measure_paragraph(&self, text: &str, style: &TextStyle, width: f32) -> f32 {
        let lines = get_metrics(style.face).wrap(text, style.size, width).len();
        lines as f32 * style.line_height()
    }

    /// Places wrapped text at the cursor and advances past it. Returns the
    /// number of lines placed.
    pub fn place_paragraph(
        &mut self,
        text: &str,
        style: &TextStyle,
        x: f32,
        width: f32,
        align: Align,
    ) -> usize {
        let metrics = get_metrics(style.face);
        let mut placed = 0;

        for paragraph in text.split('\n') {
            let lines = metrics.wrap(paragraph, style.size, width);
            let last = lines.len().saturating_sub(1);

            for (idx, line) in lines.into_iter().enumerate() {
                let line_width = metrics.width_pt(&line, style.size);
                let (line_x, word_spacing) = match align {
                    Align::Left => (x, 0.0),
                    Align::Center => (x + ((width - line_width) / 2.0).max(0.0), 0.0),
                    Align::Justify => {
                        let spaces = line.matches(' ').count();
                        if idx < last && spaces > 0 && line_width < width {
                            (x, (width - line_width) / spaces as f32)
                        } else {
                            (x, 0.0)
                        }
                    }
                };
                self.place_line(line, style, line_x, word_spacing);
                placed += 1;
            }
        }
        placed
    }

    /// Convenience for a centered block spanning the content width.
    pub fn place_centered(&mut self, text: &str, style: &TextStyle) -> usize {
        let x = self.geometry.margin;
        let width = self.geometry.content_width();
        self.place_paragraph(text, style, x, width, Align::Center)
    }

    fn place_line(&mut self, text: String, style: &TextStyle, x: f32, word_spacing: f32) {
        let line_height = style.line_height();
        // A paragraph that outgrows the page continues on the next one.
        self.ensure_space(line_height);
        let run = TextRun {
            x,
            y: self.cursor_y,
            text,
            face: style.face,
            size: style.size,
            color: style.color,
            word_spacing,
        };
        self.push(DrawOp::Text(run));
        self.cursor_y += line_height;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
        self.page_has_content = true;
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
