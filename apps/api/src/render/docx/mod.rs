// DOCX output.
// Implements: styled XHTML document, HTML → WordprocessingML conversion, RTF fallback.
// The intermediate HTML is written next to the output and removed with the scratch directory.

pub mod convert;
pub mod html;
pub mod rtf;

use std::fs;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::ResumeDocument;
use crate::render::{RenderError, RenderTarget, Renderer, Theme};

pub use convert::{HtmlToDocx, OoxmlConverter};

pub struct DocxRenderer {
    converter: Arc<dyn HtmlToDocx>,
}

impl DocxRenderer {
    pub fn new(converter: Arc<dyn HtmlToDocx>) -> Self {
        Self { converter }
    }
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self::new(Arc::new(OoxmlConverter::default()))
    }
}

impl Renderer for DocxRenderer {
    fn render(
        &self,
        doc: &ResumeDocument,
        theme: &Theme,
        target: &RenderTarget,
    ) -> Result<(), RenderError> {
        let markup = html::build_html(doc, theme);
        let html_path = target.artifact("html");
        fs::write(&html_path, &markup)?;
        debug!("Wrote intermediate HTML to {}", html_path.display());

        match self.converter.convert(&markup) {
            Ok(bytes) => {
                debug!("Converted HTML to DOCX ({} bytes)", bytes.len());
                target.write_output(&bytes)
            }
            Err(e) => {
                warn!("DOCX conversion failed, writing RTF fallback: {}", e);
                target.write_output(rtf::render_rtf(doc, theme).as_bytes())
            }
        }
    }
}
