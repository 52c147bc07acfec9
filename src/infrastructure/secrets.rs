//! Secret store backed by the process environment

use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::ports::outbound::{SecretError, SecretPort};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const FAL_KEY: &str = "FAL_KEY";
pub const ELEVEN_LABS_API_KEY: &str = "ELEVEN_LABS_API_KEY";

/// Looks secrets up in the environment, after any explicit overrides
#[derive(Debug, Default, Clone)]
pub struct EnvSecretStore {
    overrides: HashMap<String, String>,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretPort for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        if let Some(value) = self.overrides.get(name) {
            return Ok(value.clone());
        }
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                tracing::warn!("Secret {} is not set", name);
                SecretError::NotFound(name.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_override_is_returned() {
        let store = EnvSecretStore::new().with_secret(FAL_KEY, "fal-123");
        assert_eq!(store.get_secret(FAL_KEY).await.unwrap(), "fal-123");
    }

    #[tokio::test]
    async fn test_missing_secret_is_not_found() {
        let store = EnvSecretStore::new();
        let name = "STORYREEL_TEST_SECRET_THAT_IS_NEVER_SET";
        assert_eq!(
            store.get_secret(name).await,
            Err(SecretError::NotFound(name.to_string()))
        );
    }
}
