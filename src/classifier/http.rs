// src/classifier/http.rs

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Instant;

use crate::classifier::Classifier;
use crate::config::ClassifierConfig;
use crate::errors::{ClassifyError, Result};
use crate::intake::SelectedFile;
use crate::models::{ClassConfidence, ClassificationResult, PredictedClass, PredictionResponse};

/// Talks to the remote `POST /predicted/` endpoint.
pub struct HttpClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    /// Creates a classifier with its own client, bounded by `config.timeout_ms`.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClassifyError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, file: &SelectedFile) -> Result<ClassificationResult> {
        let url = &self.config.endpoint_url;

        log::info!(
            "📡 Submitting '{}' ({} bytes, {}) to {}",
            file.name(),
            file.size(),
            file.mime_type(),
            url
        );

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|_| ClassifyError::InvalidFileType {
                mime_type: file.mime_type().to_string(),
            })?;
        let form = Form::new().part("file", part);

        let start = Instant::now();

        let resp = self
            .client
            .post(url)
            .timeout(self.config.timeout())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(transport_error)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Classifier response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            return Err(match server_error_message(&body) {
                Some(message) => ClassifyError::ServerReported(message),
                None => ClassifyError::ConnectionOrServerError {
                    detail: format!("status {}: {}", status.as_u16(), body_excerpt(&body)),
                },
            });
        }

        parse_prediction(&body, latency_ms)
    }
}

/// Maps a reqwest failure onto the two transport error kinds.
fn transport_error(err: reqwest::Error) -> ClassifyError {
    if err.is_timeout() {
        ClassifyError::Timeout { detail: err.to_string() }
    } else {
        ClassifyError::ConnectionOrServerError { detail: err.to_string() }
    }
}

fn server_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<PredictionResponse>(body)
        .ok()
        .and_then(|resp| resp.error_message())
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    text.chars().take(200).collect()
}

/// Turns a 2xx body into a result, honouring an in-band `error` field.
pub fn parse_prediction(body: &[u8], latency_ms: u64) -> Result<ClassificationResult> {
    let resp: PredictionResponse =
        serde_json::from_slice(body).map_err(|e| ClassifyError::ConnectionOrServerError {
            detail: format!("invalid response body ({}): {}", e, body_excerpt(body)),
        })?;

    if let Some(message) = resp.error_message() {
        return Err(ClassifyError::ServerReported(message));
    }

    let label = resp
        .predicted_class
        .as_deref()
        .ok_or_else(|| ClassifyError::ConnectionOrServerError {
            detail: format!("response has no predicted_class: {}", body_excerpt(body)),
        })?;

    let confidence = resp.confidence.as_ref().and_then(|raw| {
        let value = raw.as_f64();
        if value.is_none() {
            log::warn!("Ignoring unparseable confidence {:?}", raw);
        }
        value
    });

    let all_confidences = resp
        .all_confidences
        .iter()
        .flatten()
        .filter_map(|(label, value)| {
            let percent = match value {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            if percent.is_none() {
                log::warn!("Ignoring confidence for '{}': {}", label, value);
            }
            percent.map(|percent| ClassConfidence {
                label: PredictedClass::from_label(label),
                percent,
            })
        })
        .collect();

    Ok(ClassificationResult {
        predicted_class: PredictedClass::from_label(label),
        confidence,
        all_confidences,
        annotated_image: resp.annotated_image.filter(|img| !img.is_empty()),
        classified_at: chrono::Utc::now().to_rfc3339(),
        latency_ms,
    })
}
