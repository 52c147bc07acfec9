//! In-memory registry of live story sessions
//!
//! Sessions share nothing with each other. The registry lock is only held
//! to look a session up; each session then has its own mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::application::ports::outbound::{SessionStorePort, SharedStory};
use crate::domain::entities::StoryState;
use crate::domain::value_objects::SessionId;

#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, SharedStory>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorePort for SessionManager {
    async fn insert(&self, state: StoryState) -> (SessionId, SharedStory) {
        let session_id = SessionId::new();
        let shared = Arc::new(Mutex::new(state));
        self.sessions
            .write()
            .await
            .insert(session_id, Arc::clone(&shared));
        tracing::debug!(session_id = %session_id, "Session registered");
        (session_id, shared)
    }

    async fn get(&self, id: SessionId) -> Option<SharedStory> {
        self.sessions.read().await.get(&id).cloned()
    }

    async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
