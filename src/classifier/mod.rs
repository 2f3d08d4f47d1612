// src/classifier/mod.rs

use async_trait::async_trait;

use crate::errors::Result;
use crate::intake::SelectedFile;
use crate::models::ClassificationResult;

pub mod http;

pub use http::HttpClassifier;

/// Anything that can turn an accepted image into a classification.
///
/// The workflow only talks to this trait, so the HTTP service can be swapped
/// for an in-process double in tests.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies one image.
    ///
    /// # Errors
    /// `ServerReported` when the service answered with an `error` field,
    /// `Timeout` when the configured deadline expired, and
    /// `ConnectionOrServerError` for every other failure.
    async fn classify(&self, file: &SelectedFile) -> Result<ClassificationResult>;
}
