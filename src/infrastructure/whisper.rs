//! OpenAI-compatible speech-to-text client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;

use crate::application::ports::outbound::{RecordedAudio, SecretPort, SpeechError, SpeechToTextPort};
use crate::infrastructure::secrets::OPENAI_API_KEY;

pub struct WhisperClient {
    client: Client,
    base_url: String,
    model: String,
    secrets: Arc<dyn SecretPort>,
}

impl WhisperClient {
    pub fn new(base_url: &str, model: &str, secrets: Arc<dyn SecretPort>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            secrets,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl SpeechToTextPort for WhisperClient {
    async fn transcribe(&self, audio: RecordedAudio) -> Result<String, SpeechError> {
        let key = self
            .secrets
            .get_secret(OPENAI_API_KEY)
            .await
            .map_err(|_| SpeechError::MissingCredential(OPENAI_API_KEY.to_string()))?;

        let file_name = format!("recording.{}", audio.file_extension());
        tracing::debug!(bytes = audio.bytes.len(), file = %file_name, "Uploading recording");

        let part = multipart::Part::bytes(audio.bytes)
            .file_name(file_name)
            .mime_str(&audio.content_type)
            .map_err(|e| SpeechError::TranscriptionFailed(format!("Invalid mime type: {}", e)))?;
        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechError::TranscriptionFailed(format!("{}: {}", status, error_text)));
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::TranscriptionFailed(e.to_string()))?;
        Ok(transcription.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::SecretError;

    struct NoSecrets;

    #[async_trait]
    impl SecretPort for NoSecrets {
        async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
            Err(SecretError::NotFound(name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_by_name() {
        let client = WhisperClient::new("http://127.0.0.1:9", "whisper-1", Arc::new(NoSecrets));
        let result = client
            .transcribe(RecordedAudio::new(vec![1, 2, 3], "audio/webm"))
            .await;

        match result {
            Err(SpeechError::MissingCredential(name)) => assert_eq!(name, "OPENAI_API_KEY"),
            other => panic!("expected missing credential, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_response_text_is_read() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "  Open the gate \n"}"#).unwrap();
        assert_eq!(parsed.text.trim(), "Open the gate");
    }
}
