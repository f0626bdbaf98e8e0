//! Pending list routes - upload, reorder, remove and snapshot.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::extract::Multipart;
use pdf_combiner_core::{Action, Direction, Upload, merge::has_pdf_extension};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::helpers::{OptionExt, ResultExt, RouteResult};
use crate::list_cookie::ListId;
use crate::state::AppState;
use crate::templates::FileListTemplate;

/// Multipart field carrying the uploaded files.
const FILES_FIELD: &str = "files";

/// One entry of the JSON snapshot.
#[derive(Serialize)]
pub struct FileEntry {
    pub name: String,
    pub key: String,
    pub size: usize,
}

/// `GET /api/files` response body.
#[derive(Serialize)]
pub struct FileSnapshot {
    pub files: Vec<FileEntry>,
}

/// Upload PDFs - appends them to the pending list, returns the list fragment.
///
/// Files without a `.pdf` extension are ignored. Re-uploads of a file already
/// in the list (same name and size) are ignored too.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
    mut multipart: Multipart,
) -> RouteResult<FileListTemplate> {
    let mut uploads = Vec::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            continue;
        }
        if !has_pdf_extension(std::path::Path::new(&filename)) {
            warn!("Ignoring non-PDF upload: {}", filename);
            continue;
        }

        let data = field.bytes().await.or_bad_request()?;
        debug!("Received {} ({} bytes)", filename, data.len());
        uploads.push(Upload::new(filename, data));
    }

    let received = uploads.len();
    let session = state.session_by_id(list_id.0).await;
    session
        .with_session_mut(|s| {
            let outcome = s.list.apply(Action::Add(uploads));
            info!(
                "Session {}: {:?} of {} uploaded, {} pending",
                session.id(),
                outcome,
                received,
                s.list.len()
            );
            FileListTemplate::new(&s.list)
        })
        .await
        .or_not_found("Session not found")
}

/// Move an entry one step toward the top.
pub async fn move_up(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
    Path(key): Path<String>,
) -> RouteResult<FileListTemplate> {
    apply(
        &state,
        list_id,
        Action::Move {
            key,
            direction: Direction::Up,
        },
    )
    .await
}

/// Move an entry one step toward the bottom.
pub async fn move_down(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
    Path(key): Path<String>,
) -> RouteResult<FileListTemplate> {
    apply(
        &state,
        list_id,
        Action::Move {
            key,
            direction: Direction::Down,
        },
    )
    .await
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
    Path(key): Path<String>,
) -> RouteResult<FileListTemplate> {
    apply(&state, list_id, Action::Remove { key }).await
}

/// Current list as JSON, in list order.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Extension(list_id): Extension<ListId>,
) -> RouteResult<Json<FileSnapshot>> {
    let session = state.session_by_id(list_id.0).await;
    let files: Vec<FileEntry> = session
        .with_session(|s| {
            s.list
                .iter()
                .map(|f| FileEntry {
                    name: f.name().to_string(),
                    key: f.key().to_string(),
                    size: f.size(),
                })
                .collect()
        })
        .await
        .or_not_found("Session not found")?;

    Ok(Json(FileSnapshot { files }))
}

/// Apply a keyed action; unknown keys leave the list unchanged.
async fn apply(
    state: &AppState,
    list_id: ListId,
    action: Action,
) -> RouteResult<FileListTemplate> {
    let session = state.session_by_id(list_id.0).await;
    session
        .with_session_mut(|s| {
            let outcome = s.list.apply(action);
            if !outcome.changed() {
                debug!("Session {}: {:?} left the list unchanged", session.id(), outcome);
            }
            FileListTemplate::new(&s.list)
        })
        .await
        .or_not_found("Session not found")
}
