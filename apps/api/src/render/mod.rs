// Resume renderers.
// Implements: date formatting, theme resolution, TXT, paginated PDF, and HTML-based DOCX output.
// Renderers are synchronous and CPU-bound; the dispatcher runs them inside spawn_blocking.

pub mod dates;
pub mod docx;
pub mod pdf;
pub mod text;
pub mod theme;

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::models::ResumeDocument;
pub use theme::Theme;

// ────────────────────────────────────────────────────────────────────────────
// Output format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Pdf,
    Docx,
    Txt,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::Txt => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Txt => "text/plain; charset=utf-8",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF",
            OutputFormat::Docx => "DOCX",
            OutputFormat::Txt => "TXT",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            "txt" => Ok(OutputFormat::Txt),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer seam
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// Where a renderer writes. `output` is the deliverable; intermediate
/// artifacts go next to it in the same scratch directory.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub output: PathBuf,
}

impl RenderTarget {
    pub fn new(dir: &Path, stem: &str, format: OutputFormat) -> Self {
        Self {
            output: dir.join(format!("{stem}.{}", format.extension())),
        }
    }

    /// Sibling path with a different extension, for intermediate files.
    pub fn artifact(&self, extension: &str) -> PathBuf {
        self.output.with_extension(extension)
    }

    /// Writes the deliverable and flushes it to storage.
    pub fn write_output(&self, bytes: &[u8]) -> Result<(), RenderError> {
        let mut file = File::create(&self.output)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(())
    }
}

/// A format backend. Implementations are stateless and shared across
/// requests.
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        doc: &ResumeDocument,
        theme: &Theme,
        target: &RenderTarget,
    ) -> Result<(), RenderError>;
}

/// One renderer per output format.
#[derive(Clone)]
pub struct RendererRegistry {
    pdf: Arc<dyn Renderer>,
    docx: Arc<dyn Renderer>,
    txt: Arc<dyn Renderer>,
}

impl RendererRegistry {
    pub fn standard() -> Self {
        Self {
            pdf: Arc::new(pdf::PdfRenderer),
            docx: Arc::new(docx::DocxRenderer::default()),
            txt: Arc::new(text::TextRenderer),
        }
    }

    /// Replaces the renderer for one format.
    #[cfg(test)]
    pub fn with_renderer(mut self, format: OutputFormat, renderer: Arc<dyn Renderer>) -> Self {
        match format {
            OutputFormat::Pdf => self.pdf = renderer,
            OutputFormat::Docx => self.docx = renderer,
            OutputFormat::Txt => self.txt = renderer,
        }
        self
    }

    pub fn get(&self, format: OutputFormat) -> Arc<dyn Renderer> {
        match format {
            OutputFormat::Pdf => Arc::clone(&self.pdf),
            OutputFormat::Docx => Arc::clone(&self.docx),
            OutputFormat::Txt => Arc::clone(&self.txt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_is_case_insensitive() {
        assert_eq!("PDF".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert_eq!(" docx ".parse::<OutputFormat>(), Ok(OutputFormat::Docx));
        assert_eq!("Txt".parse::<OutputFormat>(), Ok(OutputFormat::Txt));
        assert_eq!("odt".parse::<OutputFormat>(), Err("odt".to_string()));
    }

    #[test]
    fn test_target_paths() {
        let target = RenderTarget::new(Path::new("/tmp/x"), "resume", OutputFormat::Docx);
        assert_eq!(target.output, PathBuf::from("/tmp/x/resume.docx"));
        assert_eq!(target.artifact("html"), PathBuf::from("/tmp/x/resume.html"));
    }

    #[test]
    fn test_write_output_persists_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = RenderTarget::new(dir.path(), "out", OutputFormat::Txt);
        target.write_output(b"hello").unwrap();
        assert_eq!(std::fs::read(&target.output).unwrap(), b"hello");
    }
}
