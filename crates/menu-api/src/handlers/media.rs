use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /media/{*path}
pub async fn serve_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state
        .objects
        .fetch(&path)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No image at {}", path)))?;

    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, content_type.to_string())], bytes).into_response())
}
