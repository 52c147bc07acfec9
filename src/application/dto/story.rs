use serde::{Deserialize, Serialize};

use crate::domain::entities::{Character, CharacterState, Ending, Scene, StoryState};
use crate::domain::value_objects::{Genre, SessionId};

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequestDto {
    /// Omitted or null picks a random genre
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceRequestDto {
    pub choice: String,
}

#[derive(Debug, Deserialize)]
pub struct NarrationRequestDto {
    #[serde(default)]
    pub character_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequestDto {
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenreResponseDto {
    pub id: String,
    pub name: String,
}

impl From<Genre> for GenreResponseDto {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.as_str().to_string(),
            name: genre.display_name().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CharacterResponseDto {
    pub id: String,
    pub name: String,
    pub portrait: String,
    pub gender: String,
    pub voice_id: String,
    pub dialogue: String,
}

impl From<&Character> for CharacterResponseDto {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id.to_string(),
            name: character.name.clone(),
            portrait: character.portrait.to_string(),
            gender: character.gender.as_str().to_string(),
            voice_id: character.voice_id.to_string(),
            dialogue: character.dialogue.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelationshipResponseDto {
    pub with: String,
    pub kind: String,
    pub level: i8,
}

#[derive(Debug, Serialize)]
pub struct CharacterStateResponseDto {
    pub name: String,
    pub health: u8,
    pub mood: i8,
    pub trust: i8,
    pub relationships: Vec<RelationshipResponseDto>,
}

impl From<&CharacterState> for CharacterStateResponseDto {
    fn from(state: &CharacterState) -> Self {
        Self {
            name: state.name.clone(),
            health: state.stats.health,
            mood: state.stats.mood,
            trust: state.stats.trust,
            relationships: state
                .relationships
                .iter()
                .map(|r| RelationshipResponseDto {
                    with: r.with.clone(),
                    kind: r.kind.as_str().to_string(),
                    level: r.level,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndingResponseDto {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub achievement: Option<String>,
}

impl From<&Ending> for EndingResponseDto {
    fn from(ending: &Ending) -> Self {
        Self {
            kind: ending.kind.as_str().to_string(),
            title: ending.kind.title().to_string(),
            message: ending.display_message(),
            achievement: ending.achievement.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SceneResponseDto {
    pub id: u32,
    pub background: String,
    pub description: String,
    pub characters: Vec<CharacterResponseDto>,
    pub choices: Vec<String>,
    pub is_complete: bool,
    pub ending: Option<EndingResponseDto>,
}

impl From<&Scene> for SceneResponseDto {
    fn from(scene: &Scene) -> Self {
        Self {
            id: scene.id,
            background: scene.background.to_string(),
            description: scene.description.clone(),
            characters: scene.characters.iter().map(Into::into).collect(),
            choices: scene.choices.clone(),
            is_complete: scene.is_complete,
            ending: scene.ending.as_ref().map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponseDto {
    pub session_id: String,
    pub genre: Option<String>,
    pub scene: Option<SceneResponseDto>,
    pub scene_count: usize,
    pub tension: u8,
    pub phase: String,
    pub themes: Vec<String>,
    pub character_states: Vec<CharacterStateResponseDto>,
    pub is_generating: bool,
    pub is_recording: bool,
    pub has_shown_ending: bool,
}

impl SessionResponseDto {
    pub fn from_state(session_id: SessionId, state: &StoryState) -> Self {
        Self {
            session_id: session_id.to_string(),
            genre: state.genre().map(|g| g.as_str().to_string()),
            scene: state.current_scene().map(Into::into),
            scene_count: state.history().len() + usize::from(state.current_scene().is_some()),
            tension: state.tension().value(),
            phase: state.phase().as_str().to_string(),
            themes: state.themes().to_vec(),
            character_states: state.character_states().iter().map(Into::into).collect(),
            is_generating: state.is_generating(),
            is_recording: state.is_recording(),
            has_shown_ending: state.has_shown_ending(),
        }
    }
}
