// src/api/sessions.rs
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::workflow::ClassificationWorkflow;

/// One open form in one browser tab.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub workflow: ClassificationWorkflow,
    last_seen: Mutex<Instant>,
}

impl Session {
    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
    idle_limit: Duration,
}

impl SessionStore {
    pub fn new(idle_limit: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_limit,
        }
    }

    /// Opens a session, evicting ones nobody has touched within the idle limit.
    pub async fn create(&self, classifier: Arc<dyn Classifier>) -> Arc<Session> {
        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            workflow: ClassificationWorkflow::new(classifier),
            last_seen: Mutex::new(Instant::now()),
        });

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for() < self.idle_limit || s.workflow.is_loading());
        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} idle session(s)", evicted);
        }
        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id).cloned()?;
        session.touch();
        Some(session)
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
