//! Speech ports - Text-to-speech and speech-to-text

use async_trait::async_trait;

use crate::domain::value_objects::VoiceId;

/// Encoded audio ready for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Audio captured from the user's microphone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl RecordedAudio {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// File extension the transcription service expects for this encoding
    pub fn file_extension(&self) -> &'static str {
        match self.content_type.split(';').next().map(str::trim) {
            Some("audio/wav") | Some("audio/x-wav") | Some("audio/wave") => "wav",
            Some("audio/mpeg") | Some("audio/mp3") => "mp3",
            Some("audio/ogg") => "ogg",
            Some("audio/mp4") | Some("audio/m4a") => "m4a",
            _ => "webm",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("Nothing to synthesize")]
    EmptyText,
    #[error("Secret {0} not found")]
    MissingCredential(String),
}

/// Port for the text-to-speech service
#[async_trait]
pub trait TextToSpeechPort: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceId) -> Result<SpeechAudio, SpeechError>;
}

/// Port for the speech-to-text service
#[async_trait]
pub trait SpeechToTextPort: Send + Sync {
    async fn transcribe(&self, audio: RecordedAudio) -> Result<String, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_follows_content_type() {
        assert_eq!(RecordedAudio::new(vec![], "audio/webm;codecs=opus").file_extension(), "webm");
        assert_eq!(RecordedAudio::new(vec![], "audio/wav").file_extension(), "wav");
        assert_eq!(RecordedAudio::new(vec![], "application/octet-stream").file_extension(), "webm");
    }
}
