//! Errors surfaced by story orchestration

use crate::application::dto::PayloadError;
use crate::application::ports::outbound::{
    ImageGenerationError, LlmError, SecretError, SpeechError,
};
use crate::domain::entities::StateError;

/// Every failure the orchestrator reports to the presentation layer
///
/// None of these are fatal: the session stays at its last good scene.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoryError {
    #[error("Scene generation failed: {0}")]
    GenerationFailure(String),
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
    #[error("Asset generation failed: {0}")]
    AssetGenerationFailure(String),
    #[error("Secret {0} not found")]
    SecretNotFound(String),
    #[error("Recording failed: {0}")]
    RecordingFailure(String),
    #[error("A scene is already being generated")]
    Busy,
    #[error("The story has ended; restart to play again")]
    StoryEnded,
    #[error("No active story: {0}")]
    NoActiveStory(String),
    #[error("Scene generation timed out after {0} seconds")]
    Timeout(u64),
    #[error("Result discarded because the session was restarted")]
    Superseded,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<LlmError> for StoryError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingCredential(name) => Self::SecretNotFound(name),
            _ => Self::GenerationFailure(e.to_string()),
        }
    }
}

impl From<PayloadError> for StoryError {
    fn from(e: PayloadError) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

impl From<ImageGenerationError> for StoryError {
    fn from(e: ImageGenerationError) -> Self {
        match e {
            ImageGenerationError::MissingCredential(name) => Self::SecretNotFound(name),
            _ => Self::AssetGenerationFailure(e.to_string()),
        }
    }
}

impl From<SpeechError> for StoryError {
    fn from(e: SpeechError) -> Self {
        match e {
            SpeechError::MissingCredential(name) => Self::SecretNotFound(name),
            SpeechError::TranscriptionFailed(_) => Self::RecordingFailure(e.to_string()),
            SpeechError::SynthesisFailed(_) | SpeechError::EmptyText => {
                Self::AssetGenerationFailure(e.to_string())
            }
        }
    }
}

impl From<SecretError> for StoryError {
    fn from(e: SecretError) -> Self {
        match e {
            SecretError::NotFound(name) => Self::SecretNotFound(name),
        }
    }
}

impl From<StateError> for StoryError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::AlreadyGenerating => Self::Busy,
            StateError::Ended => Self::StoryEnded,
            StateError::NoGenre => Self::NoActiveStory(e.to_string()),
            StateError::StaleEpoch { .. } => Self::Superseded,
            StateError::AlreadyRecording | StateError::GenerationInProgress => {
                Self::RecordingFailure(e.to_string())
            }
            StateError::GenreLocked(_) => Self::InvalidRequest(e.to_string()),
        }
    }
}
