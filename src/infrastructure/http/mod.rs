//! HTTP REST API routes

mod speech_routes;
mod story_routes;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::application::services::StoryError;
use crate::domain::value_objects::SessionId;
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/genres", get(story_routes::list_genres))
        // Session routes
        .route("/api/sessions", post(story_routes::start_session))
        .route(
            "/api/sessions/{id}",
            get(story_routes::get_session).delete(story_routes::end_session),
        )
        .route("/api/sessions/{id}/genre", post(story_routes::select_genre))
        .route("/api/sessions/{id}/choices", post(story_routes::submit_choice))
        .route("/api/sessions/{id}/voice", post(story_routes::submit_recording))
        .route("/api/sessions/{id}/restart", post(story_routes::restart))
        .route("/api/sessions/{id}/transcript", get(story_routes::download_transcript))
        // Speech routes
        .route("/api/sessions/{id}/narration", post(speech_routes::narrate))
        .route("/api/speech", post(speech_routes::synthesize))
}

fn parse_session_id(id: &str) -> Result<SessionId, (StatusCode, String)> {
    Uuid::parse_str(id)
        .map(SessionId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

fn error_response(e: StoryError) -> (StatusCode, String) {
    let status = match &e {
        StoryError::Busy | StoryError::StoryEnded | StoryError::Superseded => StatusCode::CONFLICT,
        StoryError::NoActiveStory(_) => StatusCode::NOT_FOUND,
        StoryError::GenerationFailure(_)
        | StoryError::MalformedResponse(_)
        | StoryError::AssetGenerationFailure(_) => StatusCode::BAD_GATEWAY,
        StoryError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        StoryError::SecretNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        StoryError::RecordingFailure(_) | StoryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string())
}
