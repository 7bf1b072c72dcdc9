//! Axum route handler for resume generation.

use axum::{
    body::Body,
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    response::Response,
    Form,
};
use bytes::Bytes;
use futures::stream;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::dispatch::dispatcher::generate;
use crate::dispatch::scratch::ScratchDir;
use crate::errors::AppError;
use crate::models::GenerateRequest;
use crate::state::AppState;

const CHUNK_SIZE: usize = 64 * 1024;

/// Form posts carry the whole request JSON-encoded in one field.
#[derive(Debug, Deserialize)]
struct FormSubmission {
    data: Option<String>,
}

/// POST /generate
/// POST /api/v1/resumes/generate
///
/// Renders the resume and streams the file back as an attachment. The
/// scratch directory goes away once the body has been fully read.
pub async fn handle_generate(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let payload = read_payload(request, &state).await?;
    let generated = generate(&state.renderers, &state.config.scratch_dir, payload).await?;

    info!(
        "Streaming {} file {} ({} bytes)",
        generated.format.label(),
        generated.download_name,
        generated.size
    );
    let file = tokio::fs::File::open(&generated.path).await?;
    let body = Body::from_stream(file_chunks(file, generated.scratch));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, generated.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", generated.download_name),
        )
        .header(header::CONTENT_LENGTH, generated.size)
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {e}")))
}

/// Reads the file in fixed-size chunks. The scratch guard is dropped after
/// the file handle, at end of stream or when the stream itself is dropped.
fn file_chunks(
    file: tokio::fs::File,
    scratch: ScratchDir,
) -> impl futures::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    stream::unfold(Some((file, scratch)), |state| async move {
        let (mut file, scratch) = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => {
                drop(file);
                drop(scratch);
                None
            }
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Bytes::from(buf)), Some((file, scratch))))
            }
            Err(e) => {
                warn!("Failed to stream {}: {}", scratch.path().display(), e);
                Some((Err(e), None))
            }
        }
    })
}

async fn read_payload(request: Request, state: &AppState) -> Result<GenerateRequest, AppError> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        let Form(form) = Form::<FormSubmission>::from_request(request, state)
            .await
            .map_err(|e| AppError::Rejected {
                status: e.status(),
                message: e.body_text(),
            })?;
        return Ok(GenerateRequest {
            data: form.data.map(Value::String),
            ..Default::default()
        });
    }

    let body = Bytes::from_request(request, state)
        .await
        .map_err(|e| AppError::Rejected {
            status: e.status(),
            message: e.body_text(),
        })?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::MissingData("Request body is required".to_string()));
    }
    serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidData(format!("Request body is not valid JSON: {e}")))
}
