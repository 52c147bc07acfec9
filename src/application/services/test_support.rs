//! Hand-written port doubles shared by the service tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::outbound::{
    ImageGenerationError, ImageGenerationPort, ImageRequest, LlmError, LlmPort, LlmRequest,
    LlmResponse, RecordedAudio, SpeechAudio, SpeechError, SpeechToTextPort, TextToSpeechPort,
};
use crate::domain::value_objects::{AssetRef, VoiceId};

/// Replays scripted responses in order and records every request
#[derive(Default)]
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<LlmRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Every later request waits this long before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn push(&self, response: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(response.into()));
    }

    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|r| r.messages.last().map(|m| m.content.clone()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::RequestFailed("script exhausted".to_string())));
        next.map(LlmResponse::text)
    }
}

/// Returns a fresh URL per request, or fails when told to
#[derive(Default)]
pub struct MockImages {
    calls: AtomicUsize,
    pub requests: Mutex<Vec<ImageRequest>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl MockImages {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn portrait_count(&self) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| r.is_portrait()).count()
    }

    pub fn scene_count(&self) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| !r.is_portrait()).count()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageGenerationPort for MockImages {
    async fn generate_image(&self, request: ImageRequest) -> Result<AssetRef, ImageGenerationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ImageGenerationError::GenerationFailed("mock outage".to_string()));
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let kind = if request.is_portrait() { "portrait" } else { "scene" };
        self.requests.lock().unwrap().push(request);
        Ok(AssetRef::new(format!("https://images.test/{}/{}.png", kind, n)))
    }
}

#[derive(Default)]
pub struct MockSpeech {
    pub transcript: Mutex<Option<Result<String, SpeechError>>>,
    pub voices: Mutex<Vec<VoiceId>>,
}

impl MockSpeech {
    pub fn transcribing(text: &str) -> Self {
        Self {
            transcript: Mutex::new(Some(Ok(text.to_string()))),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TextToSpeechPort for MockSpeech {
    async fn synthesize(&self, text: &str, voice: &VoiceId) -> Result<SpeechAudio, SpeechError> {
        self.voices.lock().unwrap().push(voice.clone());
        Ok(SpeechAudio {
            bytes: text.as_bytes().to_vec(),
            content_type: "audio/mpeg".to_string(),
        })
    }
}

#[async_trait]
impl SpeechToTextPort for MockSpeech {
    async fn transcribe(&self, _audio: RecordedAudio) -> Result<String, SpeechError> {
        self.transcript
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(SpeechError::TranscriptionFailed("no script".to_string())))
    }
}

pub fn scene_json(name: &str, gender: &str, dialogue: &str, background: &str) -> String {
    serde_json::json!({
        "background": background,
        "character": {
            "name": name,
            "gender": gender,
            "description": format!("{} in a worn leather jacket", name),
            "dialogue": dialogue
        },
        "choices": ["Follow", "Refuse", "Ask why"]
    })
    .to_string()
}

pub fn quiet_analysis() -> String {
    r#"{"shouldEndStory": false, "suggestedTension": 20, "suggestedPhase": "rising_action",
        "plotSuggestions": ["Reveal a secret"], "requiredCharacters": []}"#
        .to_string()
}

pub fn ending_analysis(kind: &str, reason: &str) -> String {
    serde_json::json!({
        "shouldEndStory": true,
        "endReason": reason,
        "endingType": kind,
        "achievement": "Survivor",
        "suggestedTension": 95,
        "suggestedPhase": "resolution"
    })
    .to_string()
}
