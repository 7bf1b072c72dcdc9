// Page layout for the PDF renderer.
// Implements: standard-font metrics, page geometry and draw lists, flow layout with page breaks.
// Layout is pure CPU work; callers run it inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font_metrics;
pub mod page;

// Re-export the public API consumed by the PDF renderer.
pub use flow::{Align, FlowLayout, TextStyle};
pub use font_metrics::{FontFace, FontFamily};
pub use page::{DrawOp, Page, PageGeometry, Rgb, TextRun};
