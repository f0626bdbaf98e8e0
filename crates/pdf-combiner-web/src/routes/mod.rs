//! HTTP route handlers for the PDF combiner web application.
//!
//! List routes return the re-rendered pending list (HTMX `outerHTML` swap on
//! `#file-list`). The combine route returns a toast plus an out-of-band list.

mod combine;
mod download;
mod files;
mod pages;

pub use combine::combine;
pub use download::download_combined;
pub use files::{delete_file, list_files, move_down, move_up, upload_files};
pub use pages::index;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::list_cookie::list_id_cookie;
use crate::state::AppState;

/// Page and API routes, behind the list-id cookie middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(index))
        // API endpoints - HTML fragments (HTMX)
        .route("/api/files", post(upload_files).get(list_files))
        .route("/api/files/{key}/up", post(move_up))
        .route("/api/files/{key}/down", post(move_down))
        .route("/api/files/{key}/delete", post(delete_file))
        .route("/api/combine", post(combine))
        // API endpoints - binary responses
        .route("/api/download", get(download_combined))
        .layer(middleware::from_fn(list_id_cookie))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Document, Object, Stream};
    use pdf_combiner_core::AppConfig;
    use tower::ServiceExt;

    const BOUNDARY: &str = "XTESTBOUNDARYX";

    fn app() -> Router {
        router(Arc::new(AppState::new(AppConfig::default())))
    }

    fn one_page_pdf(width: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content = Content {
            operations: vec![Operation::new("BT", vec![]), Operation::new("ET", vec![])],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(Dictionary::new())),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), width.into(), 792.into()]),
            ),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
            ])),
        );
        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn multipart_body(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn session_cookie(response: &Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    async fn upload(app: &Router, cookie: Option<&str>, files: &[(&str, &[u8])]) -> Response {
        let mut request = Request::post("/api/files").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::from(multipart_body(files))).unwrap())
            .await
            .unwrap()
    }

    async fn send(app: &Router, method: &str, uri: &str, cookie: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_index_renders() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("id=\"file-list\""));
        assert!(html.contains("No files added yet"));
    }

    #[tokio::test]
    async fn test_list_cookie_is_issued_once() {
        let app = app();
        let response = upload(&app, None, &[]).await;
        let cookie = session_cookie(&response);
        assert!(cookie.starts_with("pdf_combiner_list="));

        let response = send(&app, "GET", "/api/files", &cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_upload_ignores_non_pdf_and_lists_in_order() {
        let app = app();
        let a = one_page_pdf(100);
        let b = one_page_pdf(200);

        let response = upload(
            &app,
            None,
            &[("b.pdf", b.as_slice()), ("notes.txt", b"hello".as_slice()), ("a.pdf", a.as_slice())],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);

        let json = body_text(send(&app, "GET", "/api/files", &cookie).await).await;
        let snapshot: serde_json::Value = serde_json::from_str(&json).unwrap();
        let names: Vec<_> = snapshot["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    }

    #[tokio::test]
    async fn test_move_and_delete_by_key() {
        let app = app();
        let a = one_page_pdf(100);
        let b = one_page_pdf(200);
        let response = upload(&app, None, &[("a.pdf", a.as_slice()), ("b.pdf", b.as_slice())]).await;
        let cookie = session_cookie(&response);

        let b_key = format!("b.pdf-{}", b.len());
        let response = send(&app, "POST", &format!("/api/files/{b_key}/up"), &cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.find("b.pdf").unwrap() < html.find("a.pdf").unwrap());

        let a_key = format!("a.pdf-{}", a.len());
        let html = body_text(send(&app, "POST", &format!("/api/files/{a_key}/delete"), &cookie).await).await;
        assert!(!html.contains("a.pdf"));
        assert!(html.contains("b.pdf"));
    }

    #[tokio::test]
    async fn test_combine_empty_list_warns() {
        let app = app();
        let response = app
            .clone()
            .oneshot(Request::post("/api/combine").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("toast warning"));
    }

    #[tokio::test]
    async fn test_combine_clears_list_and_serves_download() {
        let app = app();
        let a = one_page_pdf(100);
        let b = one_page_pdf(200);
        let response = upload(&app, None, &[("a.pdf", a.as_slice()), ("b.pdf", b.as_slice())]).await;
        let cookie = session_cookie(&response);

        let html = body_text(send(&app, "POST", "/api/combine", &cookie).await).await;
        assert!(html.contains("toast success"));
        assert!(html.contains("No files added yet"));

        let response = send(&app, "GET", "/api/download", &cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"combined.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_combine_keeps_list() {
        let app = app();
        let response = upload(&app, None, &[("broken.pdf", b"not a pdf at all".as_slice())]).await;
        let cookie = session_cookie(&response);

        let html = body_text(send(&app, "POST", "/api/combine", &cookie).await).await;
        assert!(html.contains("toast error"));
        assert!(html.contains("broken.pdf"));

        let response = send(&app, "GET", "/api/download", &cookie).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
