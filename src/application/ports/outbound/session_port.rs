//! Session store port - Where live story sessions are kept

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::StoryState;
use crate::domain::value_objects::SessionId;

/// A session's state, locked independently of every other session
pub type SharedStory = Arc<Mutex<StoryState>>;

#[async_trait]
pub trait SessionStorePort: Send + Sync {
    async fn insert(&self, state: StoryState) -> (SessionId, SharedStory);

    async fn get(&self, id: SessionId) -> Option<SharedStory>;

    /// Returns false if the session did not exist
    async fn remove(&self, id: SessionId) -> bool;

    async fn count(&self) -> usize;
}
