//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::SecretPort;
use crate::application::services::{StoryPorts, StoryService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::elevenlabs::ElevenLabsClient;
use crate::infrastructure::fal::FalImageClient;
use crate::infrastructure::llm_client::OpenAiCompatibleClient;
use crate::infrastructure::secrets::EnvSecretStore;
use crate::infrastructure::session::SessionManager;
use crate::infrastructure::whisper::WhisperClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub story_service: StoryService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        for (name, url) in [
            ("LLM_BASE_URL", &config.llm_base_url),
            ("IMAGE_BASE_URL", &config.image_base_url),
            ("TTS_BASE_URL", &config.tts_base_url),
            ("STT_BASE_URL", &config.stt_base_url),
        ] {
            reqwest::Url::parse(url).with_context(|| format!("{} is not a valid URL: {}", name, url))?;
        }

        let secrets: Arc<dyn SecretPort> = Arc::new(EnvSecretStore::new());

        let ports = StoryPorts {
            sessions: Arc::new(SessionManager::new()),
            llm: Arc::new(OpenAiCompatibleClient::new(
                &config.llm_base_url,
                &config.llm_model,
                Arc::clone(&secrets),
                config.llm_api_key_secret.clone(),
            )),
            images: Arc::new(FalImageClient::new(
                &config.image_base_url,
                &config.image_model,
                Arc::clone(&secrets),
            )),
            text_to_speech: Arc::new(ElevenLabsClient::new(&config.tts_base_url, Arc::clone(&secrets))),
            speech_to_text: Arc::new(WhisperClient::new(
                &config.stt_base_url,
                &config.stt_model,
                secrets,
            )),
        };

        let story_service = StoryService::new(ports, config.voice_assignment(), config.story_settings());
        Ok(Self::from_parts(config, story_service))
    }

    pub fn from_parts(config: AppConfig, story_service: StoryService) -> Self {
        Self {
            config,
            story_service,
        }
    }
}
