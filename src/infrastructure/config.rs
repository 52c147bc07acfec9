//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::StorySettings;
use crate::domain::value_objects::{
    VoiceAssignment, VoiceId, DEFAULT_FEMALE_VOICE_ID, DEFAULT_MALE_VOICE_ID,
};

/// Application configuration loaded from environment
///
/// Credentials are not part of the configuration; adapters look them up by
/// name through the secret store.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenAI-compatible API base URL (Ollama or OpenAI)
    pub llm_base_url: String,
    pub llm_model: String,
    /// Name of the secret holding the LLM API key, if the endpoint needs one
    pub llm_api_key_secret: Option<String>,

    /// Fal REST API base URL
    pub image_base_url: String,
    pub image_model: String,

    /// ElevenLabs API base URL
    pub tts_base_url: String,

    /// OpenAI-compatible transcription API base URL
    pub stt_base_url: String,
    pub stt_model: String,

    pub female_voice_id: String,
    pub male_voice_id: String,

    pub generation_timeout_secs: u64,
    pub plot_supervisor_enabled: bool,
    pub plot_history_window: usize,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            // Set to an empty value for keyless endpoints such as a local Ollama
            llm_api_key_secret: Some(
                env::var("LLM_API_KEY_SECRET").unwrap_or_else(|_| "OPENAI_API_KEY".to_string()),
            )
            .filter(|name| !name.trim().is_empty()),

            image_base_url: env::var("IMAGE_BASE_URL")
                .unwrap_or_else(|_| "https://rest.fal.ai".to_string()),
            image_model: env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| "stable-diffusion-xl".to_string()),

            tts_base_url: env::var("TTS_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),

            stt_base_url: env::var("STT_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            stt_model: env::var("STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string()),

            female_voice_id: env::var("FEMALE_VOICE_ID")
                .unwrap_or_else(|_| DEFAULT_FEMALE_VOICE_ID.to_string()),
            male_voice_id: env::var("MALE_VOICE_ID")
                .unwrap_or_else(|_| DEFAULT_MALE_VOICE_ID.to_string()),

            generation_timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            plot_supervisor_enabled: env::var("PLOT_SUPERVISOR_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("PLOT_SUPERVISOR_ENABLED must be true or false")?,
            plot_history_window: env::var("PLOT_HISTORY_WINDOW")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("PLOT_HISTORY_WINDOW must be a positive number")?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }

    pub fn voice_assignment(&self) -> VoiceAssignment {
        VoiceAssignment::new(
            VoiceId::new(self.female_voice_id.clone()),
            VoiceId::new(self.male_voice_id.clone()),
        )
    }

    pub fn story_settings(&self) -> StorySettings {
        StorySettings {
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            plot_supervisor_enabled: self.plot_supervisor_enabled,
            history_window: self.plot_history_window,
        }
    }
}
