// src/api/handlers/sessions.rs
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::sessions::Session;
use crate::errors::ClassifyError;
use crate::intake::{Candidate, DragEvent};
use crate::workflow::WorkflowView;

#[derive(Deserialize)]
pub struct UploadParams {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct DragRequest {
    pub event: DragEvent,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub view: WorkflowView,
    /// Machine-readable kind of the error this request produced, if any.
    pub error_kind: Option<&'static str>,
}

fn status_for(err: &ClassifyError) -> StatusCode {
    match err {
        ClassifyError::InvalidFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ClassifyError::NoFileSelected => StatusCode::BAD_REQUEST,
        ClassifyError::SubmissionInProgress => StatusCode::CONFLICT,
        ClassifyError::ServerReported(_) | ClassifyError::ConnectionOrServerError { .. } => {
            StatusCode::BAD_GATEWAY
        }
        ClassifyError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(session: &Session, outcome: std::result::Result<(), ClassifyError>) -> HttpResponse {
    let (status, error_kind) = match &outcome {
        Ok(()) => (StatusCode::OK, None),
        Err(e) => (status_for(e), Some(e.kind())),
    };
    HttpResponse::build(status).json(SessionResponse {
        id: session.id.to_string(),
        created_at: session.created_at.to_rfc3339(),
        view: session.workflow.view(),
        error_kind,
    })
}

fn session_not_found(id: &Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": format!("Session {} not found", id)
    }))
}

/// Body-limit rejections happen in the extractor, before any handler runs, and
/// would otherwise reach the form as plain text.
pub fn upload_error_pages<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::PAYLOAD_TOO_LARGE, payload_too_large)
}

fn payload_too_large<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    log::warn!("Rejected oversized upload to {}", req.path());
    let res = HttpResponse::PayloadTooLarge().json(json!({
        "error": "The selected image is too large to upload",
        "error_kind": "payload_too_large"
    }));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, res).map_into_right_body(),
    ))
}

fn candidate_from(req: &HttpRequest, params: UploadParams, body: web::Bytes) -> Candidate {
    let mime_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "upload".to_string());
    Candidate::new(name, mime_type, body.to_vec())
}

pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.sessions.create(state.classifier.clone()).await;
    log::info!("Opened session {}", session.id);

    Ok(HttpResponse::Created().json(SessionResponse {
        id: session.id.to_string(),
        created_at: session.created_at.to_rfc3339(),
        view: session.workflow.view(),
        error_kind: None,
    }))
}

pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match state.sessions.get(&id).await {
        Some(session) => Ok(respond(&session, Ok(()))),
        None => Ok(session_not_found(&id)),
    }
}

pub async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if state.sessions.remove(&id).await {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(session_not_found(&id))
    }
}

/// Manual picker path. The body is the raw file; `Content-Type` is its declared type.
pub async fn upload_file(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    params: web::Query<UploadParams>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let Some(session) = state.sessions.get(&id).await else {
        return Ok(session_not_found(&id));
    };

    let candidate = candidate_from(&req, params.into_inner(), body);
    let outcome = session.workflow.select(candidate).await.map(|_| ());
    Ok(respond(&session, outcome))
}

/// Drag-and-drop path; same contract as `upload_file`.
pub async fn drop_file(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    params: web::Query<UploadParams>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let Some(session) = state.sessions.get(&id).await else {
        return Ok(session_not_found(&id));
    };

    let candidate = candidate_from(&req, params.into_inner(), body);
    let outcome = session.workflow.drop_file(candidate).await.map(|_| ());
    Ok(respond(&session, outcome))
}

pub async fn drag(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<DragRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let Some(session) = state.sessions.get(&id).await else {
        return Ok(session_not_found(&id));
    };

    session.workflow.drag(req.event);
    Ok(respond(&session, Ok(())))
}

pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let Some(session) = state.sessions.get(&id).await else {
        return Ok(session_not_found(&id));
    };

    let outcome = session.workflow.submit().await.map(|_| ());
    Ok(respond(&session, outcome))
}

pub async fn reset(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let Some(session) = state.sessions.get(&id).await else {
        return Ok(session_not_found(&id));
    };

    session.workflow.reset();
    Ok(respond(&session, Ok(())))
}
