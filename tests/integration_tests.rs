// tests/integration_tests.rs
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use mangovate::classifier::{Classifier, HttpClassifier};
use mangovate::config::ClassifierConfig;
use mangovate::errors::ClassifyError;
use mangovate::intake::{accept, Candidate};
use mangovate::models::{MaturityClass, PredictedClass};
use mangovate::presenter::{self, ColorToken};
use mangovate::workflow::{ClassificationWorkflow, Phase};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake inference service saw.
struct Seen {
    content_type: String,
    body: Vec<u8>,
}

/// Canned reply of the fake inference service.
struct Mock {
    status: u16,
    body: serde_json::Value,
    delay_ms: u64,
    seen: Mutex<Vec<Seen>>,
}

impl Mock {
    fn replying(status: u16, body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self { status, body, delay_ms: 0, seen: Mutex::new(Vec::new()) })
    }

    fn slow(delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            status: 200,
            body: json!({"predicted_class": "Ripe"}),
            delay_ms,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

async fn predicted(mock: web::Data<Mock>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.seen.lock().unwrap().push(Seen { content_type, body: body.to_vec() });

    if mock.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(mock.delay_ms)).await;
    }
    HttpResponse::build(StatusCode::from_u16(mock.status).unwrap()).json(&mock.body)
}

/// Starts the fake service on an ephemeral port and returns its `/predicted/` URL.
fn spawn_service(mock: Arc<Mock>) -> String {
    let data = web::Data::from(mock);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/predicted/", web::post().to(predicted))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}/predicted/", addr)
}

fn classifier_for(url: String, timeout_ms: u64) -> Arc<HttpClassifier> {
    Arc::new(HttpClassifier::new(ClassifierConfig { endpoint_url: url, timeout_ms }).unwrap())
}

fn mango() -> Candidate {
    Candidate::new("mango.jpg", "image/jpeg", b"\xff\xd8\xff\xe0fake-jpeg".to_vec())
}

#[actix_web::test]
async fn test_multipart_upload_and_result_rendering() {
    let mock = Mock::replying(
        200,
        json!({
            "predicted_class": "Ripe",
            "confidence": "87.5",
            "all_confidences": {"Ripe": 87.5, "Unripe": 5.0}
        }),
    );
    let url = spawn_service(mock.clone());
    let workflow = ClassificationWorkflow::new(classifier_for(url, 5_000));

    workflow.select(mango()).await.unwrap();
    let result = workflow.submit().await.unwrap();

    assert_eq!(result.confidence, Some(87.5));
    assert_eq!(result.predicted_class, PredictedClass::Known(MaturityClass::Ripe));
    assert_eq!(presenter::display_label(&result.predicted_class), "Ripe");
    assert_eq!(presenter::color_token(&result.predicted_class), ColorToken::Ripe);
    assert!(presenter::recommendation(&result.predicted_class).contains("within 24h"));
    assert_eq!(workflow.phase(), Phase::Result);

    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&seen[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"mango.jpg\""));
    assert!(body.contains("fake-jpeg"));
}

#[actix_web::test]
async fn test_in_band_error_field() {
    let url = spawn_service(Mock::replying(200, json!({"error": "No mango detected"})));
    let workflow = ClassificationWorkflow::new(classifier_for(url, 5_000));

    workflow.select(mango()).await.unwrap();
    let err = workflow.submit().await.unwrap_err();

    assert!(matches!(err, ClassifyError::ServerReported(ref m) if m == "No mango detected"));
    assert_eq!(workflow.error_message().as_deref(), Some("No mango detected"));
    assert!(workflow.result().is_none());
}

#[actix_web::test]
async fn test_error_status_with_and_without_message() {
    let url = spawn_service(Mock::replying(422, json!({"error": "Unsupported image"})));
    let file = accept(mango()).unwrap();
    let err = classifier_for(url, 5_000).classify(&file).await.unwrap_err();
    assert!(matches!(err, ClassifyError::ServerReported(ref m) if m == "Unsupported image"));

    let url = spawn_service(Mock::replying(500, json!({"detail": "boom"})));
    let err = classifier_for(url, 5_000).classify(&file).await.unwrap_err();
    assert!(matches!(err, ClassifyError::ConnectionOrServerError { .. }));
}

#[actix_web::test]
async fn test_timeout_is_distinct_from_connection_failure() {
    let url = spawn_service(Mock::slow(2_000));
    let workflow = ClassificationWorkflow::new(classifier_for(url, 200));

    workflow.select(mango()).await.unwrap();
    let err = workflow.submit().await.unwrap_err();
    assert!(matches!(err, ClassifyError::Timeout { .. }), "{:?}", err);
    let timeout_message = workflow.error_message().unwrap();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}/predicted/", listener.local_addr().unwrap());
    drop(listener);
    let workflow = ClassificationWorkflow::new(classifier_for(dead, 2_000));

    workflow.select(mango()).await.unwrap();
    let err = workflow.submit().await.unwrap_err();
    assert!(matches!(err, ClassifyError::ConnectionOrServerError { .. }), "{:?}", err);
    let connection_message = workflow.error_message().unwrap();

    assert!(!timeout_message.is_empty());
    assert_ne!(timeout_message, connection_message);
    assert_eq!(workflow.phase(), Phase::Error);
}

#[actix_web::test]
async fn test_single_submission_in_flight() {
    let mock = Mock::slow(300);
    let url = spawn_service(mock.clone());
    let workflow = Arc::new(ClassificationWorkflow::new(classifier_for(url, 5_000)));
    workflow.select(mango()).await.unwrap();

    let first = actix_web::rt::spawn({
        let workflow = workflow.clone();
        async move { workflow.submit().await }
    });
    while !workflow.is_loading() {
        tokio::task::yield_now().await;
    }

    let second = workflow.submit().await;
    assert!(matches!(second, Err(ClassifyError::SubmissionInProgress)));

    first.await.unwrap().unwrap();
    assert_eq!(mock.requests(), 1);
    assert_eq!(workflow.phase(), Phase::Result);
}

#[actix_web::test]
async fn test_no_file_means_no_request() {
    let mock = Mock::replying(200, json!({"predicted_class": "Ripe"}));
    let url = spawn_service(mock.clone());
    let workflow = ClassificationWorkflow::new(classifier_for(url, 5_000));

    let err = workflow.submit().await.unwrap_err();
    assert!(matches!(err, ClassifyError::NoFileSelected));
    assert_eq!(mock.requests(), 0);
}

#[test]
fn test_unknown_label_defaults() {
    let unknown = PredictedClass::from_label("Unknown");
    assert_eq!(presenter::display_label(&unknown), "Unknown");
    assert_eq!(presenter::color_token(&unknown), ColorToken::Neutral);
    assert_eq!(presenter::recommendation(&unknown), presenter::UNKNOWN_RECOMMENDATION);
}
