//! Story session API routes

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use super::{error_response, parse_session_id};
use crate::application::dto::{
    ChoiceRequestDto, GenreResponseDto, SessionResponseDto, StartSessionRequestDto,
};
use crate::application::ports::outbound::RecordedAudio;
use crate::domain::value_objects::{Genre, SessionId};
use crate::infrastructure::state::AppState;

/// Recordings without a declared type are assumed to come from a browser recorder
const DEFAULT_RECORDING_TYPE: &str = "audio/webm";

fn parse_genre(genre: Option<&str>) -> Result<Option<Genre>, (StatusCode, String)> {
    genre
        .map(str::parse::<Genre>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))
}

async fn session_view(
    state: &AppState,
    session_id: SessionId,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let story = state
        .story_service
        .snapshot(session_id)
        .await
        .map_err(error_response)?;
    Ok(Json(SessionResponseDto::from_state(session_id, &story)))
}

pub async fn list_genres() -> Json<Vec<GenreResponseDto>> {
    Json(Genre::ALL.iter().copied().map(GenreResponseDto::from).collect())
}

/// Start a story and return its opening scene
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSessionRequestDto>,
) -> Result<(StatusCode, Json<SessionResponseDto>), (StatusCode, String)> {
    let genre = parse_genre(req.genre.as_deref())?;
    let (session_id, _) = state
        .story_service
        .start_session(genre)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, session_view(&state, session_id).await?))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    session_view(&state, session_id).await
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    state
        .story_service
        .end_session(session_id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Choose a genre after a restart and open the new story
pub async fn select_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StartSessionRequestDto>,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    let genre = parse_genre(req.genre.as_deref())?;
    state
        .story_service
        .select_genre(session_id, genre)
        .await
        .map_err(error_response)?;
    session_view(&state, session_id).await
}

pub async fn submit_choice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ChoiceRequestDto>,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    state
        .story_service
        .submit_choice(session_id, &req.choice)
        .await
        .map_err(error_response)?;
    session_view(&state, session_id).await
}

/// Accept a raw audio recording as the player's choice
pub async fn submit_recording(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_RECORDING_TYPE);

    state
        .story_service
        .submit_recording(session_id, RecordedAudio::new(body.to_vec(), content_type))
        .await
        .map_err(error_response)?;
    session_view(&state, session_id).await
}

pub async fn restart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    state
        .story_service
        .restart(session_id)
        .await
        .map_err(error_response)?;
    session_view(&state, session_id).await
}

/// Download the story so far as plain text
pub async fn download_transcript(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 2], String), (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    let transcript = state
        .story_service
        .transcript(session_id)
        .await
        .map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"story-transcript.txt\"",
            ),
        ],
        transcript,
    ))
}
