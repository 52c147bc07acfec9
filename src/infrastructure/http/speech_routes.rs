//! Text-to-speech API routes

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{error_response, parse_session_id};
use crate::application::dto::{NarrationRequestDto, SpeechRequestDto};
use crate::application::ports::outbound::SpeechAudio;
use crate::domain::value_objects::VoiceId;
use crate::infrastructure::state::AppState;

fn audio_response(audio: SpeechAudio) -> Response {
    ([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response()
}

/// Speak a character's current line in the character's voice
pub async fn narrate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NarrationRequestDto>,
) -> Result<Response, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    let audio = state
        .story_service
        .narrate(session_id, req.character_index)
        .await
        .map_err(error_response)?;
    Ok(audio_response(audio))
}

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeechRequestDto>,
) -> Result<Response, (StatusCode, String)> {
    let voice = req
        .voice_id
        .filter(|v| !v.trim().is_empty())
        .map(VoiceId::new);
    let audio = state
        .story_service
        .speak(&req.text, voice)
        .await
        .map_err(error_response)?;
    Ok(audio_response(audio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_response_carries_content_type() {
        let response = audio_response(SpeechAudio {
            bytes: vec![0xff, 0xfb],
            content_type: "audio/mpeg".to_string(),
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    }
}
