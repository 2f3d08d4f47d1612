// src/api/assets.rs
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder};
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "static/"]
struct FormAssets;

/// Serves the embedded form; `/` maps to `index.html`.
pub async fn static_file_handler(req: HttpRequest) -> impl Responder {
    let path = match req.path().trim_start_matches('/') {
        "" => "index.html",
        other => other,
    };

    let Some(asset) = FormAssets::get(path) else {
        log::debug!("No embedded asset for '{}'", path);
        return HttpResponse::NotFound().body("404 Not Found");
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    HttpResponse::Ok()
        .content_type(mime.as_ref())
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(Cow::into_owned(asset.data))
}
