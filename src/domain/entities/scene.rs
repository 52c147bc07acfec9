//! Scene entity - One unit of story progression

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Character, Ending};
use crate::domain::value_objects::AssetRef;

/// A generated scene: setting, speaking characters and the next choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Sequential number within the session, starting at 1
    pub id: u32,
    /// Narrative description of the setting the background was drawn from
    pub description: String,
    pub background: AssetRef,
    /// Speaking characters; the first one is the main character
    pub characters: Vec<Character>,
    pub choices: Vec<String>,
    pub is_complete: bool,
    pub ending: Option<Ending>,
    /// The user input that led to this scene
    pub arrived_by: Option<String>,
}

impl Scene {
    pub fn new(
        id: u32,
        description: impl Into<String>,
        background: AssetRef,
        characters: Vec<Character>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            background,
            characters,
            choices,
            is_complete: false,
            ending: None,
            arrived_by: None,
        }
    }

    pub fn with_arrival(mut self, choice: Option<String>) -> Self {
        self.arrived_by = choice;
        self
    }

    pub fn main_character(&self) -> Option<&Character> {
        self.characters.first()
    }

    /// Turn this scene into the final one
    pub fn conclude(&mut self, ending: Ending) {
        self.choices.clear();
        self.is_complete = true;
        self.ending = Some(ending);
    }
}
