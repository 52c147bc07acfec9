//! Outbound ports - Interfaces that the application requires from external systems

mod image_port;
mod llm_port;
mod secret_port;
mod session_port;
mod speech_port;

pub use image_port::{ImageGenerationError, ImageGenerationPort, ImagePurpose, ImageRequest};
pub use llm_port::{
    ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole,
    TokenUsage,
};
pub use secret_port::{SecretError, SecretPort};
pub use session_port::{SessionStorePort, SharedStory};
pub use speech_port::{RecordedAudio, SpeechAudio, SpeechError, SpeechToTextPort, TextToSpeechPort};
