//! Static glyph-width tables for the PDF standard fonts.
//!
//! Widths are in em units (1/1000 of the AFM advance widths) for ASCII
//! 0x20..=0x7E. Index = (char as usize) - 32. Characters outside that range
//! fall back to a per-face average, except for the bullet which resumes use
//! on nearly every line.

// ────────────────────────────────────────────────────────────────────────────
// Font selection
// ────────────────────────────────────────────────────────────────────────────

/// Standard-14 families available without embedding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

impl FontFamily {
    /// Maps a CSS-ish font request onto the closest standard family.
    ///
    /// `"Georgia, serif"` and `"Times New Roman"` map to Times, anything
    /// monospaced to Courier, everything else to Helvetica.
    pub fn from_request(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("courier") || name.contains("mono") {
            FontFamily::Courier
        } else if name.contains("times")
            || name.contains("georgia")
            || name.contains("garamond")
            || (name.contains("serif") && !name.contains("sans"))
        {
            FontFamily::Times
        } else {
            FontFamily::Helvetica
        }
    }
}

/// A family plus weight. This is what gets measured and what the PDF writer
/// maps to a font resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFace {
    pub family: FontFamily,
    pub bold: bool,
}

impl FontFace {
    pub fn regular(family: FontFamily) -> Self {
        Self { family, bold: false }
    }

    pub fn bold(family: FontFamily) -> Self {
        Self { family, bold: true }
    }

    /// PostScript base font name.
    pub fn base_font(&self) -> &'static str {
        match (self.family, self.bold) {
            (FontFamily::Helvetica, false) => "Helvetica",
            (FontFamily::Helvetica, true) => "Helvetica-Bold",
            (FontFamily::Times, false) => "Times-Roman",
            (FontFamily::Times, true) => "Times-Bold",
            (FontFamily::Courier, false) => "Courier",
            (FontFamily::Courier, true) => "Courier-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside printable ASCII.
    pub average_char_width: f32,
    pub space_width: f32,
    pub bullet_width: f32,
}

impl FontMetricTable {
    /// Width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else if c == '•' {
                    self.bullet_width
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width of a string in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    /// Greedy word wrap at `max_width_pt`.
    ///
    /// Explicit newlines always break. A single word wider than the line is
    /// kept whole on its own line. Blank input yields no lines.
    pub fn wrap(&self, s: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let max_width = if size_pt > 0.0 { max_width_pt / size_pt } else { f32::MAX };
        let mut lines = Vec::new();

        for paragraph in s.split('\n') {
            let mut current = String::new();
            let mut current_width = 0.0_f32;

            for word in paragraph.split_whitespace() {
                let word_w = self.measure_str(word);
                if current.is_empty() {
                    current.push_str(word);
                    current_width = word_w;
                } else if current_width + self.space_width + word_w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                    current_width = word_w;
                } else {
                    current.push(' ');
                    current.push_str(word);
                    current_width += self.space_width + word_w;
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
    bullet_width: 0.350,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.590,
    space_width: 0.278,
    bullet_width: 0.350,
};

static TIMES_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.500,
    space_width: 0.250,
    bullet_width: 0.350,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.555, 0.500, 0.500, 1.000, 0.833, 0.278, 0.333, 0.333, 0.500, 0.570, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.570, 0.570, 0.570, 0.500, 0.930,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.778, 0.389, 0.500, 0.778, 0.667, 0.944,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.611, 0.778, 0.722, 0.556, 0.667, 0.722, 0.722, 1.000, 0.722, 0.722, 0.667,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.581, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.500, 0.556, 0.444, 0.556, 0.444, 0.333, 0.500, 0.556, 0.278, 0.333, 0.556, 0.278, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.500, 0.556, 0.556, 0.444, 0.389, 0.333, 0.556, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.394, 0.220, 0.394, 0.520,
    ],
    average_char_width: 0.530,
    space_width: 0.250,
    bullet_width: 0.350,
};

/// Courier is monospaced; bold shares the same advance widths.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.600; 95],
    average_char_width: 0.600,
    space_width: 0.600,
    bullet_width: 0.600,
};

/// Returns the static metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match (face.family, face.bold) {
        (FontFamily::Helvetica, false) => &HELVETICA_TABLE,
        (FontFamily::Helvetica, true) => &HELVETICA_BOLD_TABLE,
        (FontFamily::Times, false) => &TIMES_TABLE,
        (FontFamily::Times, true) => &TIMES_BOLD_TABLE,
        (FontFamily::Courier, _) => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica() -> &'static FontMetricTable {
        get_metrics(FontFace::regular(FontFamily::Helvetica))
    }

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(helvetica().measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = helvetica().measure_str("Rust");
        assert!(
            (width - 2.056).abs() < 1e-3,
            "Rust width should be ~2.056, got {width}"
        );
    }

    #[test]
    fn test_bullet_and_non_ascii_widths() {
        let metrics = helvetica();
        assert!((metrics.measure_str("•") - metrics.bullet_width).abs() < 1e-4);
        assert!((metrics.measure_str("é") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Senior Platform Engineer";
        let regular = get_metrics(FontFace::regular(FontFamily::Helvetica)).measure_str(text);
        let bold = get_metrics(FontFace::bold(FontFamily::Helvetica)).measure_str(text);
        assert!(bold > regular, "bold {bold} should exceed regular {regular}");
    }

    #[test]
    fn test_courier_is_monospaced() {
        let metrics = get_metrics(FontFace::bold(FontFamily::Courier));
        assert!((metrics.measure_str("iiii") - metrics.measure_str("MMMM")).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = helvetica().wrap("Rust", 8.0, 500.0);
        assert_eq!(lines, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_wrap_long_text_breaks_within_width() {
        let text = "Architected a distributed caching layer using consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load across three regions \
                    while keeping the operational footprint flat";
        let metrics = helvetica();
        let lines = metrics.wrap(text, 8.0, 300.0);
        assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
        for line in &lines {
            assert!(
                metrics.width_pt(line, 8.0) <= 300.0,
                "line exceeds width: {line}"
            );
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_keeps_oversized_word_whole() {
        let lines = helvetica().wrap("a supercalifragilisticexpialidocious b", 12.0, 40.0);
        assert_eq!(lines, vec!["a", "supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn test_wrap_honours_newlines_and_blank_input() {
        let lines = helvetica().wrap("first\nsecond", 8.0, 500.0);
        assert_eq!(lines, vec!["first", "second"]);
        assert!(helvetica().wrap("   ", 8.0, 500.0).is_empty());
    }

    #[test]
    fn test_font_requests_map_to_standard_families() {
        assert_eq!(FontFamily::from_request("Georgia, serif"), FontFamily::Times);
        assert_eq!(FontFamily::from_request("Times New Roman"), FontFamily::Times);
        assert_eq!(FontFamily::from_request("Roboto Mono"), FontFamily::Courier);
        assert_eq!(FontFamily::from_request("Open Sans, sans-serif"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_request("Calibri"), FontFamily::Helvetica);
    }
}
