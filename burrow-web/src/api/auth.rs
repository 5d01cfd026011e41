//! Upload-key middleware
//!
//! Write routes compare the `X-Upload-Key` header against the key from
//! configuration. Running without a configured key disables the check,
//! which suits a journal served only on the home network.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use burrow_common::auth::verify_upload_key;
use tracing::warn;

use crate::{ApiError, AppState};

/// Header carrying the upload key
pub const UPLOAD_KEY_HEADER: &str = "x-upload-key";

/// Middleware for the write routes
///
/// **Note:** applied to POST routes only. Reads and /health stay open.
pub async fn upload_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(UPLOAD_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if !verify_upload_key(state.upload_key.as_deref(), provided.as_deref()) {
        warn!(
            "Rejected write to {} (missing or wrong upload key)",
            request.uri().path()
        );
        return Err(ApiError::Unauthorized(
            "Missing or invalid upload key".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
