use std::sync::Arc;

use crate::config::Config;
use crate::render::RendererRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// One renderer per output format. Tests swap individual entries.
    pub renderers: Arc<RendererRegistry>,
}
