//! Request resolution and rendering.
//!
//! `generate` validates the payload, normalizes the resume, picks a
//! renderer and runs it on the blocking pool inside a fresh scratch
//! directory. Input errors are reported before any directory is created.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde_json::Value;
use tracing::info;

use crate::dispatch::scratch::ScratchDir;
use crate::errors::AppError;
use crate::models::{DesignSettings, GenerateRequest};
use crate::normalize::normalize;
use crate::render::{OutputFormat, RenderTarget, RendererRegistry, Theme};

const DEFAULT_FILE_NAME: &str = "resume";

/// A rendered file waiting to be streamed.
///
/// Dropping `scratch` deletes `path`, so the two must travel together.
#[derive(Debug)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub scratch: ScratchDir,
    pub format: OutputFormat,
    pub content_type: &'static str,
    /// `<sanitized name>.<extension>`
    pub download_name: String,
    pub size: u64,
}

/// A request with every field validated.
#[derive(Debug)]
struct RenderJob {
    resume: Value,
    template: Option<String>,
    design: DesignSettings,
    format: OutputFormat,
    file_name: String,
}

pub async fn generate(
    renderers: &RendererRegistry,
    scratch_root: &Path,
    request: GenerateRequest,
) -> Result<GeneratedFile, AppError> {
    let job = resolve(request)?;
    let doc = normalize(&job.resume);
    let theme = Theme::resolve(job.template.as_deref(), &job.design);
    info!(
        "Generating {} resume ({:?} template) as {}",
        job.format.label(),
        theme.template,
        job.file_name
    );

    let scratch = ScratchDir::create(scratch_root)?;
    let target = RenderTarget::new(scratch.path(), &job.file_name, job.format);
    let renderer = renderers.get(job.format);
    let render_target = target.clone();

    // CPU-bound rendering goes to the blocking pool.
    tokio::task::spawn_blocking(move || renderer.render(&doc, &theme, &render_target))
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in render: {e}")))?
        .map_err(|e| AppError::Generation {
            format: job.format,
            message: e.to_string(),
        })?;

    let size = match tokio::fs::metadata(&target.output).await {
        Ok(meta) => meta.len(),
        Err(_) => {
            return Err(AppError::Generation {
                format: job.format,
                message: "Failed to create the output file".to_string(),
            })
        }
    };
    if size == 0 {
        return Err(AppError::EmptyOutput(job.format));
    }
    info!("Generated {} ({} bytes)", target.output.display(), size);

    Ok(GeneratedFile {
        path: target.output,
        scratch,
        format: job.format,
        content_type: job.format.content_type(),
        download_name: format!("{}.{}", job.file_name, job.format.extension()),
        size,
    })
}

/// Unwraps the `data` envelope when present, then validates the fields.
fn resolve(request: GenerateRequest) -> Result<RenderJob, AppError> {
    match request.data {
        Some(Value::Null) | None => resolve_fields(request),
        Some(data) => {
            let inner: GenerateRequest = match data {
                Value::String(text) => serde_json::from_str(&text),
                other => serde_json::from_value(other),
            }
            .map_err(|e| AppError::InvalidData(format!("Could not parse form data: {e}")))?;
            resolve_fields(inner)
        }
    }
}

fn resolve_fields(request: GenerateRequest) -> Result<RenderJob, AppError> {
    let resume = match request.resume_data {
        None | Some(Value::Null) => {
            return Err(AppError::MissingData("Resume data is required".to_string()))
        }
        Some(Value::String(text)) => serde_json::from_str::<Value>(&text).map_err(|e| {
            AppError::InvalidData(format!("resumeData is not valid JSON: {e}"))
        })?,
        Some(value) => value,
    };
    match &resume {
        Value::Object(map) if map.is_empty() => {
            return Err(AppError::MissingData("Resume data is empty".to_string()))
        }
        Value::Object(_) => {}
        _ => {
            return Err(AppError::InvalidData(
                "Resume data must be a JSON object".to_string(),
            ))
        }
    }

    let format = request
        .format
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or("pdf")
        .parse::<OutputFormat>()
        .map_err(AppError::UnsupportedFormat)?;

    Ok(RenderJob {
        resume,
        template: request.template,
        design: DesignSettings::from_value(request.design_settings.as_ref()),
        format,
        file_name: sanitize_file_name(request.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)),
    })
}

/// Replaces every character outside `[a-zA-Z0-9]` with `-` and lowercases.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if sanitized.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        sanitized
    }
}
