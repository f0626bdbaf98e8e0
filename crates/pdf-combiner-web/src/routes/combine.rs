//! Combine route - merges the pending list in list order.

use axum::{Extension, extract::State, http::StatusCode};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::helpers::{OptionExt, RouteResult};
use crate::list_cookie::ListId;
use crate::state::AppState;
use crate::templates::CombineResultTemplate;

/// Combine the pending list.
///
/// On success the result is kept for `/api/download` and the combined files
/// leave the list; files uploaded while the merge ran stay listed. On failure
/// the list is left as it is so the user can fix it and retry.
pub async fn combine(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
) -> RouteResult<CombineResultTemplate> {
    let session = state.session_by_id(list_id.0).await;
    let list = session
        .with_session(|s| s.list.clone())
        .await
        .or_not_found("Session not found")?;

    if list.is_empty() {
        return Ok(CombineResultTemplate::warning(
            "Add at least one PDF before combining",
            &list,
        ));
    }

    // Decoding and re-encoding PDFs is CPU-bound
    let worker = Arc::clone(&state);
    let snapshot = list.clone();
    let result = tokio::task::spawn_blocking(move || list.combine(&worker.combiner))
        .await
        .map_err(|e| {
            error!("Combine task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Combine failed".to_string(),
            )
        })?;

    match result {
        Ok(combined) => {
            for entry in &combined.skipped {
                warn!("Session {}: skipped {}", session.id(), entry);
            }
            info!(
                "Session {}: combined {} files into {} pages ({} bytes)",
                session.id(),
                combined.files_merged,
                combined.page_count,
                combined.bytes.len()
            );

            let download_name = &state.config.output_filename;
            session
                .with_session_mut(|s| {
                    let dropped = s.finish_combine(&snapshot, combined.bytes.clone());
                    debug!("Session {}: {} combined files left the list", session.id(), dropped);
                    CombineResultTemplate::success(
                        combined.files_merged,
                        combined.page_count,
                        download_name,
                        &s.list,
                    )
                })
                .await
                .or_not_found("Session not found")
        }
        Err(e) => {
            let message = if e.is_empty_result() {
                warn!("Session {}: {}", session.id(), e);
                None
            } else {
                error!("Session {}: combine failed: {}", session.id(), e);
                Some(format!("Combine failed: {e}"))
            };
            session
                .with_session(|s| match message {
                    None => CombineResultTemplate::warning(e.to_string(), &s.list),
                    Some(message) => CombineResultTemplate::error(message, &s.list),
                })
                .await
                .or_not_found("Session not found")
        }
    }
}
