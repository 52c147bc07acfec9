//! ElevenLabs text-to-speech client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::ports::outbound::{SecretPort, SpeechAudio, SpeechError, TextToSpeechPort};
use crate::domain::value_objects::VoiceId;
use crate::infrastructure::secrets::ELEVEN_LABS_API_KEY;

const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

pub struct ElevenLabsClient {
    client: Client,
    base_url: String,
    model_id: String,
    secrets: Arc<dyn SecretPort>,
}

impl ElevenLabsClient {
    pub fn new(base_url: &str, secrets: Arc<dyn SecretPort>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            secrets,
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

#[async_trait]
impl TextToSpeechPort for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice: &VoiceId) -> Result<SpeechAudio, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let key = self
            .secrets
            .get_secret(ELEVEN_LABS_API_KEY)
            .await
            .map_err(|_| SpeechError::MissingCredential(ELEVEN_LABS_API_KEY.to_string()))?;

        tracing::debug!(voice = %voice, chars = text.len(), "Synthesizing speech");
        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, voice))
            .header("xi-api-key", key)
            .header("Accept", "audio/mpeg")
            .json(&SynthesisRequest {
                text,
                model_id: &self.model_id,
                voice_settings: VoiceSettings::default(),
            })
            .send()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechError::SynthesisFailed(format!("{}: {}", status, error_text)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?;

        Ok(SpeechAudio {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::secrets::EnvSecretStore;

    #[test]
    fn test_request_body_matches_api() {
        let body = serde_json::to_value(SynthesisRequest {
            text: "Hello there",
            model_id: DEFAULT_MODEL_ID,
            voice_settings: VoiceSettings::default(),
        })
        .unwrap();

        assert_eq!(body["model_id"], "eleven_monolingual_v1");
        assert_eq!(body["voice_settings"]["stability"], 0.5);
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_any_request() {
        let client = ElevenLabsClient::new("http://127.0.0.1:9", Arc::new(EnvSecretStore::new()));
        let result = client.synthesize("  ", &VoiceId::new("v")).await;
        assert!(matches!(result, Err(SpeechError::EmptyText)));
    }
}
