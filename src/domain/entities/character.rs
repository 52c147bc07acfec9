//! Character entity - A speaking character whose identity is fixed on introduction

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AssetRef, CharacterId, Gender, VoiceId};

/// A character appearing in one or more scenes
///
/// `name`, `portrait` and `gender` are set when the character is first
/// introduced and never change afterwards; `dialogue` is replaced every scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Appearance text the portrait was generated from
    pub description: String,
    pub portrait: AssetRef,
    pub gender: Gender,
    pub voice_id: VoiceId,
    /// Line spoken in the current scene
    pub dialogue: String,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        portrait: AssetRef,
        gender: Gender,
        voice_id: VoiceId,
    ) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            description: description.into(),
            portrait,
            gender,
            voice_id,
            dialogue: String::new(),
        }
    }

    pub fn with_dialogue(mut self, dialogue: impl Into<String>) -> Self {
        self.dialogue = dialogue.into();
        self
    }

    /// Same identity, new line of dialogue
    pub fn speaking(&self, dialogue: impl Into<String>) -> Self {
        self.clone().with_dialogue(dialogue)
    }

    /// Normalized lookup key for a character name
    pub fn identity_key(name: &str) -> String {
        name.split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_same_identity(&self, name: &str) -> bool {
        Self::identity_key(&self.name) == Self::identity_key(name)
    }
}
