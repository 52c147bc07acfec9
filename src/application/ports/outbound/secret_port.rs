//! Secret retrieval port

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("Secret {0} not found")]
    NotFound(String),
}

/// Port for credential lookup by name
#[async_trait]
pub trait SecretPort: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError>;
}
