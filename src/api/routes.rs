// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/sessions")
                    .route("", web::post().to(handlers::create_session))
                    .route("/{id}", web::get().to(handlers::get_session))
                    .route("/{id}", web::delete().to(handlers::delete_session))
                    .route("/{id}/file", web::post().to(handlers::upload_file))
                    .route("/{id}/drop", web::post().to(handlers::drop_file))
                    .route("/{id}/drag", web::post().to(handlers::drag))
                    .route("/{id}/submit", web::post().to(handlers::submit))
                    .route("/{id}/reset", web::post().to(handlers::reset))
            )
    );
}
