//! Download route - the last combined document of the session.

use axum::{
    Extension,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::helpers::{ResultExt, RouteResult, nothing_to_download};
use crate::list_cookie::ListId;
use crate::state::AppState;

/// Serve the last combined PDF as an attachment.
///
/// Returns 404 until a combine has succeeded in this session.
pub async fn download_combined(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
) -> RouteResult<Response> {
    let session = state.session_by_id(list_id.0).await;
    let bytes = session
        .with_session(|s| s.last_combined.clone())
        .await
        .flatten()
        .ok_or_else(nothing_to_download)?;

    debug!("Session {}: serving {} bytes", session.id(), bytes.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.config.output_filename),
        )
        .body(Body::from(bytes))
        .or_internal_error()
}
