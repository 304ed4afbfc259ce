//! Session registry
//!
//! Tracks live sessions by id. Every session sits behind its own
//! `tokio::sync::Mutex`, which is what serializes utterances within a
//! session while leaving distinct citizens fully independent.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use intake_agent::Session;
use intake_core::CityProfile;

type SharedSession = Arc<Mutex<Session>>;

/// In-memory registry of live sessions
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session on the given city profile, returning its id
    pub fn create(&self, profile: CityProfile) -> (String, SharedSession) {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new(id.clone(), profile)));
        self.sessions.write().insert(id.clone(), session.clone());
        tracing::info!(session = %id, "session created");
        (id, session)
    }

    /// Fetch a live session
    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().get(id).cloned()
    }

    /// Discard a session; returns whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "session discarded");
        }
        removed
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CityProfile {
        intake_config::adapt("Raleigh", "North Carolina")
    }

    #[tokio::test]
    async fn test_create_get_remove() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create(profile());

        assert_eq!(registry.count(), 1);
        assert!(registry.get(&id).is_some());
        assert!(registry.remove(&id));
        assert!(registry.get(&id).is_none());
        assert!(!registry.remove(&id));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let (id_a, session_a) = registry.create(profile());
        let (id_b, session_b) = registry.create(profile());
        assert_ne!(id_a, id_b);

        session_a.lock().await.active_intent = Some("pothole".to_string());
        assert!(session_b.lock().await.active_intent.is_none());
    }
}
