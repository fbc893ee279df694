//! Browser view assets embedded at compile time.

use actix_web::{HttpResponse, web};
use include_dir::{Dir, include_dir};

/// The single-page dashboard (`static/`).
static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

/// Content type for an asset path, by extension.
fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Looks up an embedded asset. The empty path maps to `index.html`.
fn lookup(path: &str) -> Option<(&'static str, &'static [u8])> {
    let path = if path.is_empty() { "index.html" } else { path };
    STATIC_DIR
        .get_file(path)
        .map(|file| (content_type(path), file.contents()))
}

/// `GET /` and `GET /{path}`
pub async fn serve(path: Option<web::Path<String>>) -> HttpResponse {
    let path = path.map(web::Path::into_inner).unwrap_or_default();
    match lookup(&path) {
        Some((content_type, body)) => HttpResponse::Ok().content_type(content_type).body(body),
        None => HttpResponse::NotFound().finish(),
    }
}
