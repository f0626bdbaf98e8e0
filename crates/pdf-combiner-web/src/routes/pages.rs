//! Page routes - full HTML page renders.

use axum::{Extension, extract::State};
use std::sync::Arc;

use crate::helpers::{OptionExt, RouteResult};
use crate::list_cookie::ListId;
use crate::state::AppState;
use crate::templates::IndexTemplate;

/// Landing page with the visitor's current list.
///
/// Reloading the page keeps the list: it lives server-side under the cookie.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
) -> RouteResult<IndexTemplate> {
    let session = state.session_by_id(list_id.0).await;
    let output_filename = &state.config.output_filename;

    session
        .with_session(|s| IndexTemplate::new(&s.list, output_filename))
        .await
        .or_not_found("Session not found")
}
