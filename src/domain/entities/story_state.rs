//! Story state - The single mutable record of a playthrough
//!
//! `StoryState` owns every invariant of a session:
//! - scene ids increase by exactly one, starting at 1
//! - the live scene is never part of the history
//! - the main character, once established, is never replaced
//! - an ending is recorded at most once until the session is reset
//! - every established identity has exactly one character state
//! - only one generation cycle is in flight, identified by the session epoch

use crate::domain::entities::{
    Character, CharacterState, CharacterUpdate, Ending, PlotEvent, PlotEventKind, Scene,
};
use crate::domain::value_objects::{AssetRef, Genre, PlotDirection, StoryPhase, Tension};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("No genre has been selected")]
    NoGenre,
    #[error("Genre is already set to {0}")]
    GenreLocked(Genre),
    #[error("A scene is already being generated")]
    AlreadyGenerating,
    #[error("The story has ended")]
    Ended,
    #[error("Generation from epoch {stale} was superseded (current epoch {current})")]
    StaleEpoch { stale: u64, current: u64 },
    #[error("A recording is already in progress")]
    AlreadyRecording,
    #[error("Cannot record while a scene is being generated")]
    GenerationInProgress,
}

/// Proof that a generation cycle was started in a given epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

impl GenerationTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoryState {
    genre: Option<Genre>,
    current_scene: Option<Scene>,
    history: Vec<Scene>,
    persisted_background: Option<AssetRef>,
    background_description: Option<String>,
    main_character: Option<Character>,
    supporting_characters: Vec<Character>,
    plot_events: Vec<PlotEvent>,
    character_states: Vec<CharacterState>,
    themes: Vec<String>,
    tension: Tension,
    phase: StoryPhase,
    direction: Option<PlotDirection>,
    is_generating: bool,
    is_recording: bool,
    ending: Option<Ending>,
    has_shown_ending: bool,
    epoch: u64,
}

impl StoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre(genre: Genre) -> Self {
        Self {
            genre: Some(genre),
            ..Self::default()
        }
    }

    pub fn select_genre(&mut self, genre: Genre) -> Result<(), StateError> {
        match self.genre {
            Some(current) if current != genre || self.current_scene.is_some() => {
                Err(StateError::GenreLocked(current))
            }
            _ => {
                self.genre = Some(genre);
                Ok(())
            }
        }
    }

    pub fn genre(&self) -> Option<Genre> {
        self.genre
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene.as_ref()
    }

    pub fn history(&self) -> &[Scene] {
        &self.history
    }

    pub fn persisted_background(&self) -> Option<&AssetRef> {
        self.persisted_background.as_ref()
    }

    pub fn background_description(&self) -> Option<&str> {
        self.background_description.as_deref()
    }

    pub fn main_character(&self) -> Option<&Character> {
        self.main_character.as_ref()
    }

    pub fn supporting_characters(&self) -> &[Character] {
        &self.supporting_characters
    }

    /// Every character whose identity has been established, main character first
    pub fn known_characters(&self) -> Vec<Character> {
        self.main_character
            .iter()
            .chain(self.supporting_characters.iter())
            .cloned()
            .collect()
    }

    pub fn find_character(&self, name: &str) -> Option<&Character> {
        self.main_character
            .iter()
            .chain(self.supporting_characters.iter())
            .find(|c| c.is_same_identity(name))
    }

    pub fn plot_events(&self) -> &[PlotEvent] {
        &self.plot_events
    }

    /// The most recent `count` plot events, oldest first
    pub fn recent_events(&self, count: usize) -> &[PlotEvent] {
        let start = self.plot_events.len().saturating_sub(count);
        &self.plot_events[start..]
    }

    /// Mood, trust, health and relationships, in order of introduction
    pub fn character_states(&self) -> &[CharacterState] {
        &self.character_states
    }

    pub fn character_state(&self, name: &str) -> Option<&CharacterState> {
        self.character_states.iter().find(|s| s.is_same_identity(name))
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn tension(&self) -> Tension {
        self.tension
    }

    pub fn phase(&self) -> StoryPhase {
        self.phase
    }

    pub fn direction(&self) -> Option<&PlotDirection> {
        self.direction.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn ending(&self) -> Option<&Ending> {
        self.ending.as_ref()
    }

    pub fn has_shown_ending(&self) -> bool {
        self.has_shown_ending
    }

    pub fn has_ended(&self) -> bool {
        self.ending.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn next_scene_id(&self) -> u32 {
        self.current_scene.as_ref().map_or(1, |scene| scene.id + 1)
    }

    /// Claim the single generation slot
    ///
    /// Fails without touching any state when a generation is already running,
    /// the story has ended, or no genre is selected.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, StateError> {
        if self.genre.is_none() {
            return Err(StateError::NoGenre);
        }
        if self.ending.is_some() {
            return Err(StateError::Ended);
        }
        if self.is_generating {
            return Err(StateError::AlreadyGenerating);
        }
        self.is_generating = true;
        Ok(GenerationTicket { epoch: self.epoch })
    }

    /// Release the generation slot after a failed cycle
    ///
    /// Returns false when the ticket belongs to an earlier epoch, in which case
    /// nothing is changed.
    pub fn abort_generation(&mut self, ticket: GenerationTicket) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.is_generating = false;
        true
    }

    /// Make a freshly generated scene the live scene
    ///
    /// The previous scene moves into history, newly introduced characters are
    /// remembered, and the background becomes the persisted one. The scene id
    /// is assigned here so numbering cannot drift from the history.
    pub fn commit_scene(
        &mut self,
        ticket: GenerationTicket,
        mut scene: Scene,
        background_description: String,
        events: Vec<PlotEvent>,
    ) -> Result<&Scene, StateError> {
        if ticket.epoch != self.epoch {
            return Err(StateError::StaleEpoch {
                stale: ticket.epoch,
                current: self.epoch,
            });
        }

        scene.id = self.next_scene_id();

        if self.main_character.is_none() {
            self.main_character = scene.characters.first().cloned();
        }
        for character in scene.characters.iter().skip(1) {
            if self.find_character(&character.name).is_none() {
                self.supporting_characters.push(character.clone());
            }
        }
        for character in &scene.characters {
            if self.character_state(&character.name).is_none() {
                self.character_states.push(CharacterState::new(character.name.clone()));
            }
        }

        self.persisted_background = Some(scene.background.clone());
        self.background_description = Some(background_description);

        for event in events {
            self.record_event(event);
        }

        if let Some(previous) = self.current_scene.take() {
            self.history.push(previous);
        }
        self.direction = None;
        self.is_generating = false;
        Ok(&*self.current_scene.insert(scene))
    }

    pub fn record_event(&mut self, event: PlotEvent) {
        self.tension = self.tension.raise(event.severity);
        self.plot_events.push(event);
    }

    /// Tension never decreases; lower suggestions are ignored
    pub fn raise_tension_to(&mut self, suggested: Tension) {
        if suggested > self.tension {
            self.tension = suggested;
        }
    }

    pub fn advance_phase(&mut self, suggested: StoryPhase) -> StoryPhase {
        self.phase = self.phase.advance_toward(suggested);
        self.phase
    }

    /// Apply a supervisor update to an established character
    ///
    /// Returns false for unknown identities. Relationships towards characters
    /// who have not appeared yet are dropped.
    pub fn apply_character_update(&mut self, update: &CharacterUpdate) -> bool {
        let mut update = update.clone();
        update
            .relationships
            .retain(|r| self.find_character(&r.with).is_some());

        match self
            .character_states
            .iter_mut()
            .find(|s| s.is_same_identity(&update.name))
        {
            Some(state) => {
                state.apply(&update);
                true
            }
            None => false,
        }
    }

    /// Replace the story's themes, dropping blanks and duplicates
    pub fn set_themes(&mut self, themes: Vec<String>) {
        let mut cleaned: Vec<String> = Vec::with_capacity(themes.len());
        for theme in themes {
            let theme = theme.trim();
            if !theme.is_empty() && !cleaned.iter().any(|t| t.eq_ignore_ascii_case(theme)) {
                cleaned.push(theme.to_string());
            }
        }
        self.themes = cleaned;
    }

    pub fn set_direction(&mut self, direction: PlotDirection) {
        self.direction = if direction.is_empty() {
            None
        } else {
            Some(direction)
        };
    }

    /// End the story on the current scene
    ///
    /// Returns false if an ending was already shown in this session.
    pub fn conclude(&mut self, ending: Ending) -> bool {
        if self.has_shown_ending {
            return false;
        }
        if let Some(scene) = self.current_scene.as_mut() {
            scene.conclude(ending.clone());
        }
        self.record_event(PlotEvent::new(
            PlotEventKind::Decision,
            ending.message.clone(),
            "Story ended",
            PlotEvent::MAX_SEVERITY,
        ));
        self.ending = Some(ending);
        self.has_shown_ending = true;
        self.direction = None;
        true
    }

    /// Claim the capture device for a voice recording
    pub fn begin_recording(&mut self) -> Result<(), StateError> {
        if self.is_generating {
            return Err(StateError::GenerationInProgress);
        }
        if self.is_recording {
            return Err(StateError::AlreadyRecording);
        }
        self.is_recording = true;
        Ok(())
    }

    pub fn finish_recording(&mut self) {
        self.is_recording = false;
    }

    /// Return to genre selection, discarding everything
    ///
    /// The epoch moves forward so results of in-flight generations are
    /// rejected when they arrive.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::default()
        };
    }

    /// Plain-text transcript of the playthrough so far
    pub fn transcript(&self) -> String {
        let scenes: Vec<&Scene> = self
            .history
            .iter()
            .chain(self.current_scene.iter())
            .collect();

        let mut out = String::new();
        for (index, scene) in scenes.iter().enumerate() {
            out.push_str(&format!("Scene {}:\n", scene.id));
            for character in &scene.characters {
                out.push_str(&format!("{}: {}\n", character.name, character.dialogue));
            }
            if let Some(choice) = scenes.get(index + 1).and_then(|s| s.arrived_by.as_deref()) {
                out.push_str(&format!("You chose: \"{}\"\n", choice));
            }
            if let Some(ending) = &scene.ending {
                out.push_str(&format!(
                    "{} {}\n",
                    ending.kind.title(),
                    ending.display_message()
                ));
                if let Some(achievement) = &ending.achievement {
                    out.push_str(&format!("Achievement: {}\n", achievement));
                }
            }
            out.push('\n');
        }
        out
    }
}
