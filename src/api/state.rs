// src/api/state.rs
use crate::api::sessions::SessionStore;
use crate::classifier::{Classifier, HttpClassifier};
use crate::config::AppConfig;
use crate::errors::Result;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub classifier: Arc<dyn Classifier>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let classifier = HttpClassifier::new(config.classifier.clone())?;
        Ok(Self::with_classifier(config, Arc::new(classifier)))
    }

    pub fn with_classifier(config: AppConfig, classifier: Arc<dyn Classifier>) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session_idle_secs));
        Self {
            config: Arc::new(config),
            classifier,
            sessions,
        }
    }
}
