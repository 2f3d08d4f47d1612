// src/api/handlers/health.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "mangovate",
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": {
            "endpoint_url": state.config.classifier.endpoint_url,
            "timeout_ms": state.config.classifier.timeout_ms,
        },
        "sessions": state.sessions.len().await,
    })))
}
