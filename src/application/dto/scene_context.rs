//! Snapshot of story state handed to the scene generator
//!
//! Taken while the session lock is held so generation can run unlocked.

use crate::domain::entities::{Character, CharacterState, PlotEvent, Scene, StoryState};
use crate::domain::value_objects::{AssetRef, Genre, PlotDirection, StoryPhase, Tension};

#[derive(Debug, Clone)]
pub struct SceneRequestContext {
    pub genre: Genre,
    pub previous_scene: Option<Scene>,
    pub choice: Option<String>,
    pub main_character: Option<Character>,
    /// Every established identity, main character first
    pub known_characters: Vec<Character>,
    pub persisted_background: Option<AssetRef>,
    pub background_description: Option<String>,
    pub recent_events: Vec<PlotEvent>,
    pub character_states: Vec<CharacterState>,
    pub themes: Vec<String>,
    pub direction: Option<PlotDirection>,
    pub tension: Tension,
    pub phase: StoryPhase,
    pub next_scene_id: u32,
}

impl SceneRequestContext {
    /// Returns `None` when no genre has been chosen yet
    pub fn from_state(state: &StoryState, choice: Option<String>, history_window: usize) -> Option<Self> {
        Some(Self {
            genre: state.genre()?,
            previous_scene: state.current_scene().cloned(),
            choice: choice
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            main_character: state.main_character().cloned(),
            known_characters: state.known_characters(),
            persisted_background: state.persisted_background().cloned(),
            background_description: state.background_description().map(str::to_string),
            recent_events: state.recent_events(history_window).to_vec(),
            character_states: state.character_states().to_vec(),
            themes: state.themes().to_vec(),
            direction: state.direction().cloned(),
            tension: state.tension(),
            phase: state.phase(),
            next_scene_id: state.next_scene_id(),
        })
    }

    pub fn find_known(&self, name: &str) -> Option<&Character> {
        self.known_characters.iter().find(|c| c.is_same_identity(name))
    }
}
