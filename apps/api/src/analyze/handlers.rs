//! Axum route handlers for the analysis endpoint.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analyze::pdf_text::extract_text;
use crate::errors::AppError;
use crate::session::inputs::PDF_CONTENT_TYPE;
use crate::session::transport::AnalyzeResponse;
use crate::state::AppState;

/// Parts of an `/analyze/` upload.
struct Upload {
    content_type: Option<String>,
    bytes: Bytes,
    role: String,
}

/// POST /analyze/
///
/// Multipart body: `file` (PDF) and `role` (free text).
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;

    if upload.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        return Err(AppError::Validation(
            "Only PDF files are supported.".to_string(),
        ));
    }

    let max_mb = state.config.max_file_size_mb;
    if upload.bytes.len() > state.config.max_file_size_bytes() {
        let size_mb = upload.bytes.len() as f64 / (1024.0 * 1024.0);
        return Err(AppError::PayloadTooLarge(format!(
            "File too large ({size_mb:.1} MB). Max is {max_mb} MB."
        )));
    }

    info!(
        "Analyzing resume ({} bytes) for role '{}'",
        upload.bytes.len(),
        upload.role
    );

    let text = extract_text(upload.bytes).await?;
    let analysis = state.analyzer.analyze(&text, &upload.role).await?;

    Ok(Json(AnalyzeResponse { analysis }))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut role: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((content_type, bytes));
            }
            "role" => role = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let (content_type, bytes) = file.ok_or_else(|| {
        AppError::UnprocessableEntity("Missing 'file' field.".to_string())
    })?;
    let role = role
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::UnprocessableEntity("Missing 'role' field.".to_string()))?;

    Ok(Upload {
        content_type,
        bytes,
        role,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size.".to_string())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}
