//! Embedded landing page and its static files

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "web"]
struct Assets;

/// Serve a file from the embedded `web/` folder
pub async fn serve_static(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// The landing page, if it was embedded
pub fn index_html() -> Option<String> {
    let content = Assets::get("index.html")?;
    String::from_utf8(content.data.into_owned()).ok()
}
