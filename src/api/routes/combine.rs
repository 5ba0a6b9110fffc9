//! Combine handler: POST /api/combine.

use super::{RECORDS_COUNT_HEADER, SKIPPED_COUNT_HEADER};
use crate::api::AppState;
use crate::combiner::{CombineOutcome, RawInput};
use crate::error::Error;
use axum::{
    extract::{Multipart, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};

/// POST /api/combine - Combine uploaded guest account files
///
/// Every multipart part that carries a filename is one input, in upload
/// order. Other parts are ignored. The response body is the combined
/// `combined_guest.json` artifact.
#[utoipa::path(
    post,
    path = "/api/combine",
    tag = "combine",
    request_body(content = String, description = "Guest account files (multipart/form-data, one part per file)", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Combined artifact", body = Vec<crate::types::ParsedRecord>, content_type = "application/json",
            headers(
                ("Content-Disposition" = String, description = "attachment; filename=\"combined_guest.json\""),
                ("X-Records-Count" = usize, description = "Number of combined records"),
                ("X-Skipped-Count" = usize, description = "Number of skipped uploads")
            )
        ),
        (status = 400, description = "No files uploaded or malformed upload", body = crate::error::ApiError),
        (status = 422, description = "No uploaded file contained valid data", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn combine_files(State(state): State<AppState>, multipart: Multipart) -> Response {
    let inputs = match collect_uploads(multipart).await {
        Ok(inputs) => inputs,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(files = inputs.len(), "received combine upload");

    match state.hub.combine_files(inputs).await {
        Ok(CombineOutcome::Ready { artifact, result }) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.filename),
                ),
                (
                    HeaderName::from_static(RECORDS_COUNT_HEADER),
                    result.len().to_string(),
                ),
                (
                    HeaderName::from_static(SKIPPED_COUNT_HEADER),
                    result.skipped().to_string(),
                ),
            ],
            artifact.bytes,
        )
            .into_response(),
        Ok(CombineOutcome::NoValidData(result)) => Error::NoValidData {
            skipped: result.skipped(),
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Read every file part of `multipart` into memory, preserving upload order
async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<RawInput>, Error> {
    let mut inputs = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(Error::InvalidUpload(e.to_string())),
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidUpload(format!("failed to read {}: {}", filename, e)))?;

        inputs.push(RawInput::from_bytes(filename, bytes.to_vec()));
    }

    Ok(inputs)
}
