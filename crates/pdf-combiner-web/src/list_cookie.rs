//! List-id cookie.
//!
//! The browser only carries the id of its pending list. Everything else lives
//! in [`AppState`](crate::state::AppState) and is evicted with it, so a visitor
//! costs no server memory beyond that map.

use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::debug;
use uuid::Uuid;

pub const LIST_COOKIE: &str = "pdf_combiner_list";

/// Id of the visitor's pending list, set by [`list_id_cookie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListId(pub Uuid);

/// Middleware: resolve the list id from the cookie, or issue a new one.
pub async fn list_id_cookie(
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> (CookieJar, Response) {
    let existing = jar
        .get(LIST_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    let id = existing.unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(ListId(id));
    let response = next.run(request).await;

    if existing.is_some() {
        return (jar, response);
    }

    debug!("Issued list id {}", id);
    let cookie = Cookie::build((LIST_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response)
}
